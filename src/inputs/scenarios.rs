//! Named preset parameter bundles (base, best, worst)

use super::ModelInputs;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named preset scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Base,
    Best,
    Worst,
}

impl Scenario {
    /// Every preset, in presentation order
    pub const ALL: [Scenario; 3] = [Scenario::Base, Scenario::Best, Scenario::Worst];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Base => "base",
            Scenario::Best => "best",
            Scenario::Worst => "worst",
        }
    }

    /// Fully populated inputs for this preset.
    ///
    /// Fixed costs are identical across presets; the spread is in growth, churn,
    /// monetization and unit costs.
    pub fn inputs(&self) -> ModelInputs {
        match self {
            Scenario::Base => ModelInputs {
                initial_users: 1000,
                monthly_growth_rate: 15.0,
                churn_rate: 5.0,
                cac: 50.0,
                arpu_free: 0.0,
                arpu_premium: 7.0,
                arpu_stablecoin_yield: 2.5,
                arpu_asset_fee: 3.0,
                arpu_api: 1.5,
                premium_conversion_rate: 20.0,
                avg_transaction_volume: 500.0,
                average_lifetime_months: 24.0,
                fixed_costs_payroll: 50_000.0,
                fixed_costs_rnd: 30_000.0,
                fixed_costs_operations: 20_000.0,
                variable_cost_kyc: 5.0,
                variable_cost_infrastructure: 0.5,
                projection_months: 36,
            },
            Scenario::Best => ModelInputs {
                initial_users: 1500,
                monthly_growth_rate: 25.0,
                churn_rate: 3.0,
                cac: 40.0,
                arpu_free: 0.0,
                arpu_premium: 10.0,
                arpu_stablecoin_yield: 4.0,
                arpu_asset_fee: 5.0,
                arpu_api: 2.5,
                premium_conversion_rate: 30.0,
                avg_transaction_volume: 750.0,
                average_lifetime_months: 36.0,
                fixed_costs_payroll: 50_000.0,
                fixed_costs_rnd: 30_000.0,
                fixed_costs_operations: 20_000.0,
                variable_cost_kyc: 4.0,
                variable_cost_infrastructure: 0.4,
                projection_months: 36,
            },
            Scenario::Worst => ModelInputs {
                initial_users: 500,
                monthly_growth_rate: 8.0,
                churn_rate: 8.0,
                cac: 70.0,
                arpu_free: 0.0,
                arpu_premium: 5.0,
                arpu_stablecoin_yield: 1.5,
                arpu_asset_fee: 2.0,
                arpu_api: 1.0,
                premium_conversion_rate: 12.0,
                avg_transaction_volume: 300.0,
                average_lifetime_months: 18.0,
                fixed_costs_payroll: 50_000.0,
                fixed_costs_rnd: 30_000.0,
                fixed_costs_operations: 20_000.0,
                variable_cost_kyc: 6.0,
                variable_cost_infrastructure: 0.6,
                projection_months: 36,
            },
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Scenario::Base),
            "best" => Ok(Scenario::Best),
            "worst" => Ok(Scenario::Worst),
            other => Err(ModelError::UnknownScenario(other.to_string())),
        }
    }
}
