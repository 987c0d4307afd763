use std::sync::Arc;

use pathsim::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{Result, ServiceError};
use crate::http::{HttpRequest, HttpResponse};
use crate::oracle::ScenarioOracle;
use crate::request::SimulationRequest;
use crate::store::{RunRecord, RunStore, RunSummary, HISTORY_LIMIT};

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub config: SimulationConfig,
    pub results_preview: Option<f64>,
    pub paths_count: usize,
    pub paths: Vec<Trajectory>,
    pub risk: RiskMetrics,
    pub statistics: SummaryStatistics,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<RunRecord>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub scenario: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub modifiers: Vec<YearlyModifier>,
}

/// Request handling around the simulator. Every collaborator is injected.
pub struct EdgeService {
    simulator: PathSimulator,
    store: Arc<dyn RunStore>,
    oracle: Option<Arc<dyn ScenarioOracle>>,
    allowed_origin: String,
}

impl EdgeService {
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self {
            simulator: PathSimulator::new(),
            store,
            oracle: None,
            allowed_origin: "http://localhost:5173".to_string(),
        }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn ScenarioOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_allowed_origin(mut self, origin: &str) -> Self {
        self.allowed_origin = origin.to_string();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.simulator = self.simulator.with_workers(workers);
        self
    }

    pub fn allowed_origin(&self) -> &str {
        &self.allowed_origin
    }

    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let outcome = match (request.method.as_str(), request.path.as_str()) {
            ("OPTIONS", _) => return HttpResponse::no_content(),
            ("POST", "/api/simulation/start") => self
                .start_simulation(&request.body)
                .map(|r| HttpResponse::json(200, &r)),
            ("GET", "/api/history") => self.history().map(|r| HttpResponse::json(200, &r)),
            ("POST", "/api/oracle/analyze") => self
                .analyze_scenario(&request.body)
                .map(|r| HttpResponse::json(200, &r)),
            (_, "/api/simulation/start" | "/api/history" | "/api/oracle/analyze") => {
                return HttpResponse::error(405, "method not allowed")
            }
            _ => return HttpResponse::error(404, "not found"),
        };
        outcome.unwrap_or_else(|e| {
            warn!(method = %request.method, path = %request.path, error = %e, "request failed");
            HttpResponse::error(e.status(), &e.to_string())
        })
    }

    pub fn start_simulation(&self, body: &str) -> Result<StartResponse> {
        let request: SimulationRequest = if body.trim().is_empty() {
            SimulationRequest::default()
        } else {
            serde_json::from_str(body)?
        };
        let config = request.to_config();

        let result = match request.seed {
            Some(seed) => self.simulator.clone().with_seed(seed).simulate(&config)?,
            None => self.simulator.simulate(&config)?,
        };

        let terminal = result.terminal_values();
        let risk = RiskAnalyzer::analyze(&terminal);
        let statistics = SummaryStatistics::from_values(&terminal);
        let results_preview = terminal.first().copied();
        let paths_count = result.len();

        let summary = RunSummary {
            paths_count,
            last_value_preview: results_preview,
            risk,
        };
        match self.store.save(request.scenario(), &config, summary) {
            Ok(record) => info!(id = record.id, paths = paths_count, "simulation saved"),
            Err(e) => warn!(error = %e, "failed to save simulation"),
        }

        Ok(StartResponse {
            message: "Simulation completed",
            status: "completed",
            config,
            results_preview,
            paths_count,
            paths: result.into_paths(),
            risk,
            statistics,
        })
    }

    pub fn history(&self) -> Result<HistoryResponse> {
        Ok(HistoryResponse {
            history: self.store.history(HISTORY_LIMIT)?,
        })
    }

    pub fn analyze_scenario(&self, body: &str) -> Result<AnalyzeResponse> {
        let request: AnalyzeRequest = serde_json::from_str(body)?;
        if request.scenario.trim().is_empty() {
            return Err(ServiceError::BadRequest("scenario must not be empty".to_string()));
        }
        let oracle = self.oracle.as_ref().ok_or(ServiceError::OracleUnavailable)?;
        Ok(AnalyzeResponse {
            modifiers: oracle.analyze(&request.scenario)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::oracle::parse_oracle_reply;
    use crate::store::InMemoryRunStore;

    struct CannedOracle(&'static str);

    impl ScenarioOracle for CannedOracle {
        fn analyze(&self, _scenario: &str) -> Result<Vec<YearlyModifier>> {
            parse_oracle_reply(self.0)
        }
    }

    fn service() -> EdgeService {
        EdgeService::new(Arc::new(InMemoryRunStore::new())).with_workers(2)
    }

    fn body(response: &HttpResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[test]
    fn test_start_simulation_route() {
        let service = service();
        let request = HttpRequest::new(
            "POST",
            "/api/simulation/start",
            r#"{"years": 5, "num_paths": 20, "seed": 11, "scenario": "baseline"}"#,
        );
        let response = service.handle(&request);
        assert_eq!(response.status, 200);
        let json = body(&response);
        assert_eq!(json["status"], "completed");
        assert_eq!(json["paths_count"], 20);
        assert_eq!(json["paths"].as_array().unwrap().len(), 20);
        assert_eq!(json["paths"][0].as_array().unwrap().len(), 6);
        assert_eq!(json["paths"][0][0], 1_000_000.0);
        assert_eq!(json["config"]["volatility"], 0.2);
        assert!(json["risk"]["var_95"].is_number());
        assert!(json["statistics"]["median"].is_number());
    }

    #[test]
    fn test_seeded_runs_repeat() -> Result<()> {
        let service = service();
        let body = r#"{"years": 3, "num_paths": 8, "seed": 4}"#;
        let a = service.start_simulation(body)?;
        let b = service.start_simulation(body)?;
        assert_eq!(a.paths, b.paths);
        assert_eq!(a.risk, b.risk);
        Ok(())
    }

    #[test]
    fn test_zero_paths_has_no_preview() -> Result<()> {
        let response = service().start_simulation(r#"{"num_paths": 0}"#)?;
        assert_eq!(response.paths_count, 0);
        assert_eq!(response.results_preview, None);
        assert_eq!(response.risk, RiskMetrics::default());
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_bad_request() {
        let service = service();
        let response = service.handle(&HttpRequest::new(
            "POST",
            "/api/simulation/start",
            r#"{"volatility": -0.3}"#,
        ));
        assert_eq!(response.status, 400);
        assert!(body(&response)["error"].as_str().unwrap().contains("volatility"));
        assert!(service.history().unwrap().history.is_empty());
    }

    #[test]
    fn test_invalid_json_is_bad_request() {
        let response = service().handle(&HttpRequest::new("POST", "/api/simulation/start", "{"));
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_history_records_runs() -> Result<()> {
        let service = service();
        service.start_simulation(r#"{"years": 1, "num_paths": 3, "scenario": "first"}"#)?;
        service.start_simulation(r#"{"years": 1, "num_paths": 4, "scenario": "second"}"#)?;
        let response = service.handle(&HttpRequest::new("GET", "/api/history", ""));
        assert_eq!(response.status, 200);
        let json = body(&response);
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["scenario"], "second");
        assert_eq!(history[0]["summary"]["paths_count"], 4);
        Ok(())
    }

    #[test]
    fn test_oracle_route() {
        let service = service().with_oracle(Arc::new(CannedOracle(
            "```json\n[{\"year\":1,\"drift_mod\":-0.05,\"volatility_mod\":0.1}]\n```",
        )));
        let response = service.handle(&HttpRequest::new(
            "POST",
            "/api/oracle/analyze",
            r#"{"scenario": "recession next year"}"#,
        ));
        assert_eq!(response.status, 200);
        let json = body(&response);
        assert_eq!(json["modifiers"][0]["year"], 1);
        assert_eq!(json["modifiers"][0]["drift_mod"], -0.05);
    }

    #[test]
    fn test_oracle_failure_is_server_error() {
        let service = service().with_oracle(Arc::new(CannedOracle("not json")));
        let response = service.handle(&HttpRequest::new(
            "POST",
            "/api/oracle/analyze",
            r#"{"scenario": "anything"}"#,
        ));
        assert_eq!(response.status, 500);
    }

    #[test]
    fn test_missing_oracle_is_unavailable() {
        let response = service().handle(&HttpRequest::new(
            "POST",
            "/api/oracle/analyze",
            r#"{"scenario": "anything"}"#,
        ));
        assert_eq!(response.status, 503);
    }

    #[test]
    fn test_routing_fallbacks() {
        let service = service();
        assert_eq!(service.handle(&HttpRequest::new("OPTIONS", "/api/history", "")).status, 204);
        assert_eq!(service.handle(&HttpRequest::new("GET", "/nope", "")).status, 404);
        assert_eq!(
            service.handle(&HttpRequest::new("DELETE", "/api/history", "")).status,
            405
        );
    }
}
