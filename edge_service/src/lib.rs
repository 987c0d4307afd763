//! Thin HTTP edge around `pathsim`: fills request defaults, runs the
//! simulation and risk analysis, records run summaries and forwards scenario
//! text to an injected oracle.

use std::io::{BufReader, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{debug, info, warn};

pub mod errors;
pub mod http;
pub mod oracle;
pub mod request;
pub mod service;
pub mod store;

use errors::Result;
use http::{read_request, HttpResponse};
use service::EdgeService;

fn handle_connection(service: &EdgeService, mut stream: TcpStream) -> Result<()> {
    let response = {
        let mut reader = BufReader::new(&stream);
        match read_request(&mut reader) {
            Ok(request) => {
                debug!(method = %request.method, path = %request.path, "request");
                service.handle(&request)
            }
            Err(e) => HttpResponse::error(e.status(), &e.to_string()),
        }
    };
    stream.write_all(&response.to_bytes(service.allowed_origin()))?;
    stream.flush()?;
    Ok(())
}

/// Serves requests one connection at a time until the listener fails.
pub fn serve(addr: &str, service: EdgeService) -> Result<()> {
    let listener = TcpListener::bind(addr)?;
    info!(addr, "edge service listening");
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = handle_connection(&service, stream) {
                    warn!(error = %e, "connection failed");
                }
            }
            Err(e) => warn!(error = %e, "accept failed"),
        }
    }
    Ok(())
}
