//! Projection engine: monthly user, revenue and cost recurrence plus summary rollup

mod state;
mod engine;
mod records;
mod summary;

pub use state::UserBase;
pub use engine::ProjectionEngine;
pub use records::{round2, MonthlyColumns, MonthlyRecord, ProjectionResult, MONTHLY_COLUMNS};
pub use summary::SummaryMetrics;
