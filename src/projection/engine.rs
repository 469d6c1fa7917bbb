//! Core projection engine for monthly startup financial projections

use super::records::{round2, MonthlyRecord, ProjectionResult};
use super::state::{truncate_users, UserBase};
use super::summary::SummaryMetrics;
use crate::error::ModelError;
use crate::inputs::{ModelInputs, Scenario};
use std::collections::BTreeMap;

/// Main projection engine.
///
/// Holds only the immutable preset table, so one value can be shared freely
/// across threads or built per request.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    scenarios: BTreeMap<Scenario, ModelInputs>,
}

impl ProjectionEngine {
    /// Create an engine with the base, best and worst presets
    pub fn new() -> Self {
        let scenarios = Scenario::ALL
            .iter()
            .map(|&scenario| (scenario, scenario.inputs()))
            .collect();
        Self { scenarios }
    }

    /// All presets, iterated base, best, worst
    pub fn scenarios(&self) -> &BTreeMap<Scenario, ModelInputs> {
        &self.scenarios
    }

    /// Look up a preset by name. Unknown names are for the caller to reject.
    pub fn scenario(&self, name: &str) -> Option<&ModelInputs> {
        name.parse::<Scenario>()
            .ok()
            .and_then(|scenario| self.scenarios.get(&scenario))
    }

    /// Run a projection over months 1..=ProjectionMonths.
    ///
    /// Inputs are validated first; nothing is computed for invalid inputs and
    /// no partial result is returned on failure.
    pub fn calculate(&self, inputs: &ModelInputs) -> Result<ProjectionResult, ModelError> {
        inputs.validate()?;

        let months = inputs.projection_months as u32;
        log::debug!(
            "projecting {} months from {} users (growth {}%, churn {}%)",
            months,
            inputs.initial_users,
            inputs.monthly_growth_rate,
            inputs.churn_rate
        );

        let mut state = UserBase::from_inputs(inputs);
        let mut monthly_data = Vec::with_capacity(months as usize);

        for _month in 1..=months {
            // Advance state to next month
            state.advance_month(inputs)?;

            let record = self.calculate_month(inputs, &state)?;
            monthly_data.push(record);
        }

        let summary = SummaryMetrics::from_records(inputs, &monthly_data);
        log::debug!(
            "projection complete: final users {}, year 1 revenue {:.2}",
            summary.final_month_users,
            summary.year1_revenue
        );

        Ok(ProjectionResult {
            monthly_data,
            summary,
            inputs: inputs.clone(),
        })
    }

    /// Segment users, then derive revenue, costs and profitability for one month
    fn calculate_month(&self, inputs: &ModelInputs, state: &UserBase) -> Result<MonthlyRecord, ModelError> {
        let month = state.projection_month;
        let active_users = state.active_users();
        let new_users = state.new_users;

        // Premium vs free split
        let premium_users = truncate_users(
            active_users as f64 * (inputs.premium_conversion_rate / 100.0),
            month,
        )?;
        let free_users = active_users.saturating_sub(premium_users);

        // Revenue comes from premium users only; ARPU_Free is not applied
        let premium = premium_users as f64;
        let revenue_premium = premium * inputs.arpu_premium;
        let revenue_stablecoin = premium * inputs.arpu_stablecoin_yield;
        let revenue_asset_fee = premium * inputs.arpu_asset_fee;
        let revenue_api = premium * inputs.arpu_api;
        let total_revenue = revenue_premium + revenue_stablecoin + revenue_asset_fee + revenue_api;

        // Costs
        let cac_cost = new_users as f64 * inputs.cac;
        let kyc_cost = new_users as f64 * inputs.variable_cost_kyc;
        let infrastructure_cost = active_users as f64 * inputs.variable_cost_infrastructure;
        let total_variable_costs = cac_cost + kyc_cost + infrastructure_cost;
        let fixed_costs = inputs.fixed_costs();
        let total_costs = total_variable_costs + fixed_costs;

        // Profitability
        let gross_profit = total_revenue - total_variable_costs;
        let gross_margin = if total_revenue > 0.0 {
            gross_profit / total_revenue * 100.0
        } else {
            0.0
        };
        let ebitda = total_revenue - total_costs;
        let net_margin = if total_revenue > 0.0 {
            ebitda / total_revenue * 100.0
        } else {
            0.0
        };

        for (name, value) in [
            ("TotalRevenue", total_revenue),
            ("TotalCosts", total_costs),
            ("EBITDA", ebitda),
            ("GrossMargin", gross_margin),
            ("NetMargin", net_margin),
        ] {
            if !value.is_finite() {
                return Err(ModelError::computation(month, format!("non-finite {}", name)));
            }
        }

        Ok(MonthlyRecord {
            month,
            total_users: state.current_users,
            active_users,
            new_users,
            churned_users: state.churned_users,
            premium_users,
            free_users,
            revenue_premium: round2(revenue_premium),
            revenue_stablecoin: round2(revenue_stablecoin),
            revenue_asset_fee: round2(revenue_asset_fee),
            revenue_api: round2(revenue_api),
            total_revenue: round2(total_revenue),
            cac_cost: round2(cac_cost),
            kyc_cost: round2(kyc_cost),
            infrastructure_cost: round2(infrastructure_cost),
            total_variable_costs: round2(total_variable_costs),
            fixed_costs: round2(fixed_costs),
            total_costs: round2(total_costs),
            gross_profit: round2(gross_profit),
            gross_margin: round2(gross_margin),
            ebitda: round2(ebitda),
            net_margin: round2(net_margin),
        })
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn base_result() -> ProjectionResult {
        ProjectionEngine::new()
            .calculate(&Scenario::Base.inputs())
            .unwrap()
    }

    #[test]
    fn test_projection_runs() {
        let result = base_result();
        assert_eq!(result.monthly_data.len(), 36);
        assert_eq!(result.monthly_data[0].month, 1);
        assert_eq!(result.monthly_data[35].month, 36);
        assert_eq!(result.inputs, Scenario::Base.inputs());
    }

    #[test]
    fn test_first_two_months_of_base() {
        let result = base_result();
        let m1 = &result.monthly_data[0];
        assert_eq!(m1.active_users, 1000);
        assert_eq!(m1.total_users, 1000);
        assert_eq!(m1.new_users, 0);
        assert_eq!(m1.churned_users, 0);
        assert_eq!(m1.premium_users, 200);
        assert_eq!(m1.free_users, 800);
        assert_eq!(m1.revenue_premium, 1400.0);
        assert_eq!(m1.total_revenue, 2800.0);
        assert_eq!(m1.cac_cost, 0.0);
        assert_eq!(m1.infrastructure_cost, 500.0);
        assert_eq!(m1.fixed_costs, 100_000.0);
        assert_eq!(m1.total_costs, 100_500.0);
        assert_eq!(m1.gross_profit, 2300.0);
        assert_eq!(m1.gross_margin, 82.14);
        assert_eq!(m1.ebitda, -97_700.0);
        assert_eq!(m1.net_margin, -3489.29);

        let m2 = &result.monthly_data[1];
        assert_eq!(m2.new_users, 150);
        assert_eq!(m2.churned_users, 50);
        assert_eq!(m2.total_users, 1100);
        assert_eq!(m2.active_users, 1100);
        assert_eq!(m2.premium_users, 220);
        assert_eq!(m2.total_revenue, 3080.0);
        assert_eq!(m2.cac_cost, 7500.0);
        assert_eq!(m2.kyc_cost, 750.0);
        assert_eq!(m2.infrastructure_cost, 550.0);
        assert_eq!(m2.total_variable_costs, 8800.0);
        assert_eq!(m2.gross_profit, -5720.0);
    }

    #[test]
    fn test_user_recurrence_holds() {
        for scenario in Scenario::ALL {
            let result = ProjectionEngine::new().calculate(&scenario.inputs()).unwrap();
            for pair in result.monthly_data.windows(2) {
                let (prev, cur) = (&pair[0], &pair[1]);
                assert_eq!(cur.total_users, prev.total_users + cur.new_users - cur.churned_users);
                assert_eq!(cur.active_users, cur.total_users);
            }
            for row in &result.monthly_data {
                assert_eq!(row.premium_users + row.free_users, row.active_users);
            }
        }
    }

    #[test]
    fn test_totals_are_consistent() {
        let result = base_result();
        for row in &result.monthly_data {
            let revenue = row.revenue_premium + row.revenue_stablecoin + row.revenue_asset_fee + row.revenue_api;
            assert_abs_diff_eq!(row.total_revenue, revenue, epsilon = 0.011);
            assert_abs_diff_eq!(row.total_costs, row.total_variable_costs + row.fixed_costs, epsilon = 0.011);
            assert_abs_diff_eq!(row.ebitda, row.total_revenue - row.total_costs, epsilon = 0.011);
        }
    }

    #[test]
    fn test_zero_revenue_margins_are_zero() {
        let inputs = ModelInputs {
            premium_conversion_rate: 0.0,
            ..Default::default()
        };
        let result = ProjectionEngine::new().calculate(&inputs).unwrap();
        for row in &result.monthly_data {
            assert_eq!(row.total_revenue, 0.0);
            assert_eq!(row.gross_margin, 0.0);
            assert_eq!(row.net_margin, 0.0);
        }
        assert_eq!(result.summary.avg_gross_margin, 0.0);
    }

    #[test]
    fn test_free_arpu_and_transaction_volume_are_inert() {
        let engine = ProjectionEngine::new();
        let base = engine.calculate(&ModelInputs::default()).unwrap();
        let tweaked = engine
            .calculate(&ModelInputs {
                arpu_free: 3.0,
                avg_transaction_volume: 10_000.0,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(base.monthly_data, tweaked.monthly_data);
        assert_eq!(base.summary, tweaked.summary);
    }

    #[test]
    fn test_horizon_length_and_short_years() {
        let engine = ProjectionEngine::new();
        for months in [1, 12, 23, 24, 35, 36, 60] {
            let inputs = ModelInputs { projection_months: months, ..Default::default() };
            let result = engine.calculate(&inputs).unwrap();
            assert_eq!(result.monthly_data.len(), months as usize);
            if months < 24 {
                assert_eq!(result.summary.year2_revenue, 0.0);
            }
            if months < 36 {
                assert_eq!(result.summary.year3_revenue, 0.0);
            }
        }
    }

    #[test]
    fn test_single_month_summary() {
        let inputs = ModelInputs { projection_months: 1, ..Default::default() };
        let result = ProjectionEngine::new().calculate(&inputs).unwrap();
        assert_eq!(result.summary.final_month_users, 1000);
        assert_eq!(result.summary.final_month_revenue, 2800.0);
        assert_eq!(result.summary.year1_revenue, 2800.0);
        assert_eq!(result.summary.avg_gross_margin, 82.14);
    }

    #[test]
    fn test_invalid_inputs_fail_validation() {
        let engine = ProjectionEngine::new();
        let err = engine
            .calculate(&ModelInputs { projection_months: 0, ..Default::default() })
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");

        let err = engine
            .calculate(&ModelInputs { churn_rate: -2.0, ..Default::default() })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_runaway_growth_is_computation_error() {
        let inputs = ModelInputs {
            initial_users: 1_000_000_000_000_000,
            monthly_growth_rate: 1000.0,
            projection_months: 12,
            ..Default::default()
        };
        let err = ProjectionEngine::new().calculate(&inputs).unwrap_err();
        assert!(matches!(err, ModelError::Computation { month, .. } if month > 1));
    }

    #[test]
    fn test_tiny_revenue_margin_overflow_is_computation_error() {
        // Revenue is positive but so small that the margins overflow
        let inputs = ModelInputs {
            arpu_premium: 1e-310,
            arpu_stablecoin_yield: 0.0,
            arpu_asset_fee: 0.0,
            arpu_api: 0.0,
            projection_months: 1,
            ..Default::default()
        };
        let err = ProjectionEngine::new().calculate(&inputs).unwrap_err();
        assert!(matches!(err, ModelError::Computation { month: 1, .. }));
        assert!(err.to_string().contains("GrossMargin"));
    }

    #[test]
    fn test_sub_cent_costs_round_on_exact_value() {
        let inputs = ModelInputs {
            initial_users: 1,
            variable_cost_infrastructure: 0.015,
            projection_months: 1,
            ..Default::default()
        };
        let result = ProjectionEngine::new().calculate(&inputs).unwrap();
        assert_eq!(result.monthly_data[0].infrastructure_cost, 0.01);
    }

    #[test]
    fn test_zero_cac_ratio() {
        let inputs = ModelInputs { cac: 0.0, ..Default::default() };
        let result = ProjectionEngine::new().calculate(&inputs).unwrap();
        assert_eq!(result.summary.ltv_cac_ratio, 0.0);
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let engine = ProjectionEngine::new();
        let inputs = Scenario::Best.inputs();
        let first = engine.calculate(&inputs).unwrap();
        let second = engine.calculate(&inputs).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_scenarios_table() {
        let engine = ProjectionEngine::new();
        let names: Vec<&str> = engine.scenarios().keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["base", "best", "worst"]);
        assert_eq!(engine.scenario("worst"), Some(&Scenario::Worst.inputs()));
        assert_eq!(engine.scenario("optimistic"), None);
    }
}
