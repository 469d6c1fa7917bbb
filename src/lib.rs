//! Startup Projection - month-by-month financial projections for a startup
//!
//! This library provides:
//! - A deterministic projection engine (users, revenue, costs, profitability)
//! - Unit economics and per-year summary metrics
//! - Base/best/worst scenario presets and a scenario runner
//! - CSV and JSON export of projection results
//! - A runtime-independent HTTP API surface

pub mod error;
pub mod inputs;
pub mod projection;
pub mod scenario;
pub mod export;
pub mod api;

// Re-export commonly used types
pub use error::{ModelError, LoadError, ExportError};
pub use inputs::{ModelInputs, Scenario};
pub use projection::{ProjectionEngine, ProjectionResult, MonthlyRecord, SummaryMetrics};
pub use scenario::ScenarioRunner;
pub use api::{Api, ApiResponse};
