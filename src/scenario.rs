//! Scenario runner for preset and custom projections
//!
//! Builds the preset table once, then runs named presets (optionally with
//! parameter overrides) or arbitrary inputs against it.

use crate::error::ModelError;
use crate::inputs::{ModelInputs, Scenario};
use crate::projection::{ProjectionEngine, ProjectionResult};
use rayon::prelude::*;

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// let base = runner.run("base")?;
/// let slower = runner.run_with("base", &[("MonthlyGrowthRate", 10.0)])?;
/// for (scenario, result) in runner.run_all()? {
///     println!("{}: {:.2}", scenario, result.summary.year1_revenue);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self {
            engine: ProjectionEngine::new(),
        }
    }

    /// Create runner around an existing engine
    pub fn with_engine(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    /// Resolve a preset by name, rejecting unknown names
    pub fn preset(&self, name: &str) -> Result<ModelInputs, ModelError> {
        self.engine
            .scenario(name)
            .cloned()
            .ok_or_else(|| ModelError::UnknownScenario(name.to_string()))
    }

    /// Run a named preset as-is
    pub fn run(&self, name: &str) -> Result<ProjectionResult, ModelError> {
        self.run_with(name, &[])
    }

    /// Run a named preset after applying `(wire name, value)` overrides
    pub fn run_with(&self, name: &str, overrides: &[(&str, f64)]) -> Result<ProjectionResult, ModelError> {
        let mut inputs = self.preset(name)?;
        for (parameter, value) in overrides {
            inputs.set_parameter(parameter, *value)?;
        }
        self.engine.calculate(&inputs)
    }

    /// Run arbitrary inputs
    pub fn run_inputs(&self, inputs: &ModelInputs) -> Result<ProjectionResult, ModelError> {
        self.engine.calculate(inputs)
    }

    /// Run every preset in parallel, returned in preset order
    pub fn run_all(&self) -> Result<Vec<(Scenario, ProjectionResult)>, ModelError> {
        self.engine
            .scenarios()
            .par_iter()
            .map(|(scenario, inputs)| {
                self.engine
                    .calculate(inputs)
                    .map(|result| (*scenario, result))
            })
            .collect()
    }

    /// Get reference to the underlying engine
    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }
}
