//! HTTP API surface, independent of the hosting runtime
//!
//! [`Api::handle`] maps a method, path and request body to an [`ApiResponse`].
//! The Lambda binary (and any other host) only translates to and from its own
//! request/response types.
//!
//! Routes:
//! - `GET  /`             service banner
//! - `POST /calculate`    run a projection for the posted inputs
//! - `POST /scenario`     fetch one preset's inputs
//! - `GET  /scenarios`    list preset names
//! - `POST /export/csv`   projection as a CSV attachment
//! - `POST /export/json`  projection as a JSON attachment
//! - `GET  /health`       liveness with a timestamp

use crate::error::{ExportError, ModelError};
use crate::export;
use crate::inputs::ModelInputs;
use crate::projection::{ProjectionEngine, ProjectionResult};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const SERVICE_NAME: &str = "Startup Projection API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CSV_FILENAME: &str = "projection_model.csv";
pub const JSON_FILENAME: &str = "projection_model.json";

/// CORS headers attached to every response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

const ROUTES: [&str; 7] = [
    "/",
    "/calculate",
    "/scenario",
    "/scenarios",
    "/export/csv",
    "/export/json",
    "/health",
];

/// A fully rendered response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    /// Download filename, sent as `Content-Disposition: attachment`
    pub attachment: Option<&'static str>,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                attachment: None,
                body,
            },
            Err(e) => {
                log::error!("failed to encode response: {}", e);
                Self::error(500, "computation_error", "failed to encode response".to_string())
            }
        }
    }

    fn error(status: u16, code: &str, message: String) -> Self {
        let body = json!({
            "success": false,
            "error": { "code": code, "message": message },
        });
        Self {
            status,
            content_type: "application/json",
            attachment: None,
            body: body.to_string(),
        }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            attachment: None,
            body: String::new(),
        }
    }

    /// Every header to send: content type, disposition and CORS
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Content-Type", self.content_type.to_string())];
        if let Some(filename) = self.attachment {
            headers.push(("Content-Disposition", format!("attachment; filename={}", filename)));
        }
        headers.extend(CORS_HEADERS.iter().map(|(k, v)| (*k, v.to_string())));
        headers
    }
}

impl From<ModelError> for ApiResponse {
    fn from(err: ModelError) -> Self {
        let status = match err {
            ModelError::Validation { .. } => 422,
            ModelError::Computation { .. } => 500,
            ModelError::UnknownScenario(_) => 404,
        };
        if status == 500 {
            log::error!("projection failed: {}", err);
        } else {
            log::warn!("request rejected: {}", err);
        }
        ApiResponse::error(status, err.code(), err.to_string())
    }
}

impl From<ExportError> for ApiResponse {
    fn from(err: ExportError) -> Self {
        log::error!("export failed: {}", err);
        ApiResponse::error(500, "computation_error", err.to_string())
    }
}

#[derive(Serialize)]
struct DataResponse<'a, T> {
    success: bool,
    data: &'a T,
}

#[derive(Serialize)]
struct ScenarioList<'a> {
    success: bool,
    scenarios: Vec<&'a str>,
}

#[derive(Serialize)]
struct Banner {
    message: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    timestamp: String,
}

/// Body of `POST /scenario`
#[derive(Debug, Deserialize)]
struct ScenarioRequest {
    #[serde(default = "default_scenario")]
    scenario: String,
}

fn default_scenario() -> String {
    "base".to_string()
}

/// Request router around a projection engine
#[derive(Debug, Clone, Default)]
pub struct Api {
    engine: ProjectionEngine,
}

impl Api {
    pub fn new() -> Self {
        Self {
            engine: ProjectionEngine::new(),
        }
    }

    /// Route one request
    pub fn handle(&self, method: &str, path: &str, body: &str) -> ApiResponse {
        let path = normalize_path(path);
        log::info!("{} {}", method, path);

        match (method, path) {
            // CORS preflight
            ("OPTIONS", _) => ApiResponse::empty(200),
            ("GET", "/") => ApiResponse::json(
                200,
                &Banner {
                    message: SERVICE_NAME,
                    version: VERSION,
                },
            ),
            ("POST", "/calculate") => self.calculate(body),
            ("POST", "/scenario") => self.scenario(body),
            ("GET", "/scenarios") => self.list_scenarios(),
            ("POST", "/export/csv") => self.export_csv(body),
            ("POST", "/export/json") => self.export_json(body),
            ("GET", "/health") => ApiResponse::json(
                200,
                &Health {
                    status: "healthy",
                    timestamp: chrono::Utc::now().to_rfc3339(),
                },
            ),
            (_, route) if ROUTES.contains(&route) => {
                ApiResponse::error(405, "method_not_allowed", format!("{} not allowed on {}", method, route))
            }
            (_, route) => ApiResponse::error(404, "not_found", format!("no route for {}", route)),
        }
    }

    fn calculate(&self, body: &str) -> ApiResponse {
        match self.project(body) {
            Ok(result) => ApiResponse::json(200, &DataResponse { success: true, data: &result }),
            Err(err) => err.into(),
        }
    }

    fn scenario(&self, body: &str) -> ApiResponse {
        let request: ScenarioRequest = match serde_json::from_str(non_empty(body)) {
            Ok(r) => r,
            Err(e) => return ModelError::validation("scenario", e.to_string()).into(),
        };

        match self.engine.scenario(&request.scenario) {
            Some(inputs) => ApiResponse::json(200, &DataResponse { success: true, data: inputs }),
            None => ModelError::UnknownScenario(request.scenario).into(),
        }
    }

    fn list_scenarios(&self) -> ApiResponse {
        let scenarios = self.engine.scenarios().keys().map(|s| s.as_str()).collect();
        ApiResponse::json(200, &ScenarioList { success: true, scenarios })
    }

    fn export_csv(&self, body: &str) -> ApiResponse {
        let result = match self.project(body) {
            Ok(r) => r,
            Err(err) => return err.into(),
        };
        match export::to_csv_string(&result) {
            Ok(csv) => ApiResponse {
                status: 200,
                content_type: "text/csv",
                attachment: Some(CSV_FILENAME),
                body: csv,
            },
            Err(err) => err.into(),
        }
    }

    fn export_json(&self, body: &str) -> ApiResponse {
        let result = match self.project(body) {
            Ok(r) => r,
            Err(err) => return err.into(),
        };
        match export::to_json_pretty(&result) {
            Ok(json) => ApiResponse {
                status: 200,
                content_type: "application/json",
                attachment: Some(JSON_FILENAME),
                body: json,
            },
            Err(err) => err.into(),
        }
    }

    /// Parse the posted inputs (empty body means all defaults) and run them
    fn project(&self, body: &str) -> Result<ProjectionResult, ModelError> {
        let inputs: ModelInputs = serde_json::from_str(non_empty(body))
            .map_err(|e| ModelError::validation("body", e.to_string()))?;
        self.engine.calculate(&inputs)
    }
}

fn non_empty(body: &str) -> &str {
    if body.trim().is_empty() {
        "{}"
    } else {
        body
    }
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
