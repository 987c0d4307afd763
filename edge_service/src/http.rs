use std::io::{BufRead, Read};

use serde::Serialize;

use crate::errors::{Result, ServiceError};

/// Largest body accepted from a client.
const MAX_BODY_BYTES: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl HttpRequest {
    pub fn new(method: &str, path: &str, body: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            body: body.to_string(),
        }
    }
}

/// Reads one HTTP/1.1 request: request line, headers, then `Content-Length`
/// bytes of body.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<HttpRequest> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut parts = line.split_whitespace();
    let (method, target) = match (parts.next(), parts.next()) {
        (Some(m), Some(t)) => (m.to_string(), t.to_string()),
        _ => return Err(ServiceError::BadRequest(format!("malformed request line {:?}", line))),
    };
    // query strings are not used by any route
    let path = target.split('?').next().unwrap_or("").to_string();

    let mut content_length = 0usize;
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().map_err(|_| {
                    ServiceError::BadRequest(format!("invalid Content-Length {:?}", value.trim()))
                })?;
            }
        }
    }
    if content_length > MAX_BODY_BYTES {
        return Err(ServiceError::BadRequest(format!(
            "body of {} bytes exceeds {} bytes",
            content_length, MAX_BODY_BYTES
        )));
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    let body = String::from_utf8(body)
        .map_err(|e| ServiceError::BadRequest(format!("body is not UTF-8: {}", e)))?;

    Ok(HttpRequest { method, path, body })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(500, &e.to_string()),
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: String::new(),
        }
    }

    /// Serializes the response with the CORS headers for `allowed_origin`.
    pub fn to_bytes(&self, allowed_origin: &str) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n\
             Access-Control-Allow-Origin: {}\r\n\
             Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
             Access-Control-Allow-Headers: Origin, Content-Type, Accept\r\n\
             Access-Control-Allow-Credentials: true\r\n\
             Access-Control-Max-Age: 43200\r\n\
             Connection: close\r\n\
             Content-Length: {}\r\n",
            self.status,
            reason_phrase(self.status),
            allowed_origin,
            self.body.len()
        );
        if !self.body.is_empty() {
            head.push_str("Content-Type: application/json\r\n");
        }
        head.push_str("\r\n");
        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        503 => "Service Unavailable",
        _ => "Internal Server Error",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_read_post_with_body() -> Result<()> {
        let raw = "POST /api/simulation/start?x=1 HTTP/1.1\r\nHost: localhost\r\ncontent-length: 13\r\n\r\n{\"years\": 5}\n";
        let request = read_request(&mut Cursor::new(raw))?;
        assert_eq!(request, HttpRequest::new("POST", "/api/simulation/start", "{\"years\": 5}\n"));
        Ok(())
    }

    #[test]
    fn test_read_get_without_body() -> Result<()> {
        let raw = "GET /api/history HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let request = read_request(&mut Cursor::new(raw))?;
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/history");
        assert!(request.body.is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_request_line() {
        assert!(matches!(
            read_request(&mut Cursor::new("\r\n")),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn test_truncated_body_is_an_error() {
        let raw = "POST / HTTP/1.1\r\nContent-Length: 50\r\n\r\n{}";
        assert!(matches!(
            read_request(&mut Cursor::new(raw)),
            Err(ServiceError::Io(_))
        ));
    }

    #[test]
    fn test_response_bytes() {
        let response = HttpResponse::error(404, "not found");
        let text = String::from_utf8(response.to_bytes("http://localhost:5173")).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Access-Control-Allow-Origin: http://localhost:5173\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"error\":\"not found\"}"));
    }
}
