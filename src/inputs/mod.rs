//! Business parameters driving a projection, scenario presets, and file loading

mod scenarios;
pub mod loader;

pub use scenarios::Scenario;
pub use loader::{load_inputs, load_inputs_from_csv_reader, load_inputs_from_json_reader};

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Longest horizon accepted by validation (100 years)
pub const MAX_PROJECTION_MONTHS: i64 = 1200;

/// Wire names of every input, in declaration order
pub const PARAMETER_NAMES: [&str; 18] = [
    "InitialUsers",
    "MonthlyGrowthRate",
    "ChurnRate",
    "CAC",
    "ARPU_Free",
    "ARPU_Premium",
    "ARPU_StablecoinYield",
    "ARPU_AssetFee",
    "ARPU_API",
    "PremiumConversionRate",
    "AvgTransactionVolume",
    "AverageLifetimeMonths",
    "FixedCosts_Payroll",
    "FixedCosts_RnD",
    "FixedCosts_Operations",
    "VariableCost_KYC",
    "VariableCost_Infrastructure",
    "ProjectionMonths",
];

/// Scalar inputs for one projection run.
///
/// Percent fields are expressed as percentages (15.0 = 15%), currency fields per month.
/// Missing keys in a JSON body fall back to the base preset values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInputs {
    /// Users at month 1
    #[serde(rename = "InitialUsers")]
    pub initial_users: i64,

    /// New users per month as a percent of the current base
    #[serde(rename = "MonthlyGrowthRate")]
    pub monthly_growth_rate: f64,

    /// Users lost per month as a percent of the current base
    #[serde(rename = "ChurnRate")]
    pub churn_rate: f64,

    /// Customer acquisition cost per new user
    #[serde(rename = "CAC")]
    pub cac: f64,

    /// Free-tier ARPU. Accepted but not used by any formula.
    #[serde(rename = "ARPU_Free")]
    pub arpu_free: f64,

    #[serde(rename = "ARPU_Premium")]
    pub arpu_premium: f64,

    #[serde(rename = "ARPU_StablecoinYield")]
    pub arpu_stablecoin_yield: f64,

    #[serde(rename = "ARPU_AssetFee")]
    pub arpu_asset_fee: f64,

    #[serde(rename = "ARPU_API")]
    pub arpu_api: f64,

    /// Share of active users classified premium, in percent
    #[serde(rename = "PremiumConversionRate")]
    pub premium_conversion_rate: f64,

    /// Accepted but not used by any formula.
    #[serde(rename = "AvgTransactionVolume")]
    pub avg_transaction_volume: f64,

    /// Average customer lifetime used for LTV
    #[serde(rename = "AverageLifetimeMonths")]
    pub average_lifetime_months: f64,

    #[serde(rename = "FixedCosts_Payroll")]
    pub fixed_costs_payroll: f64,

    #[serde(rename = "FixedCosts_RnD")]
    pub fixed_costs_rnd: f64,

    #[serde(rename = "FixedCosts_Operations")]
    pub fixed_costs_operations: f64,

    /// Onboarding cost per new user
    #[serde(rename = "VariableCost_KYC")]
    pub variable_cost_kyc: f64,

    /// Infrastructure cost per active user
    #[serde(rename = "VariableCost_Infrastructure")]
    pub variable_cost_infrastructure: f64,

    /// Horizon length in months
    #[serde(rename = "ProjectionMonths")]
    pub projection_months: i64,
}

impl Default for ModelInputs {
    fn default() -> Self {
        Scenario::Base.inputs()
    }
}

impl ModelInputs {
    /// Sum of the per-premium-user revenue components
    pub fn total_arpu(&self) -> f64 {
        self.arpu_premium + self.arpu_stablecoin_yield + self.arpu_asset_fee + self.arpu_api
    }

    /// Monthly overhead, constant across the horizon
    pub fn fixed_costs(&self) -> f64 {
        self.fixed_costs_payroll + self.fixed_costs_rnd + self.fixed_costs_operations
    }

    /// Check every field against its domain.
    ///
    /// Returns the first violation found, in declaration order.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.initial_users < 0 {
            return Err(ModelError::validation("InitialUsers", "must not be negative"));
        }
        if self.projection_months < 1 || self.projection_months > MAX_PROJECTION_MONTHS {
            return Err(ModelError::validation(
                "ProjectionMonths",
                format!("must be between 1 and {}, got {}", MAX_PROJECTION_MONTHS, self.projection_months),
            ));
        }

        for (name, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(ModelError::validation(name, "must be a finite number"));
            }
            if value < 0.0 {
                return Err(ModelError::validation(name, format!("must not be negative, got {}", value)));
            }
        }

        for (name, value) in [
            ("ChurnRate", self.churn_rate),
            ("PremiumConversionRate", self.premium_conversion_rate),
        ] {
            if value > 100.0 {
                return Err(ModelError::validation(name, format!("must be between 0 and 100, got {}", value)));
            }
        }

        Ok(())
    }

    /// Assign one field by its wire name.
    ///
    /// Integer fields (`InitialUsers`, `ProjectionMonths`) reject fractional values.
    /// Domain checks are left to [`ModelInputs::validate`].
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), ModelError> {
        match name {
            "InitialUsers" => self.initial_users = integral(name, value)?,
            "MonthlyGrowthRate" => self.monthly_growth_rate = value,
            "ChurnRate" => self.churn_rate = value,
            "CAC" => self.cac = value,
            "ARPU_Free" => self.arpu_free = value,
            "ARPU_Premium" => self.arpu_premium = value,
            "ARPU_StablecoinYield" => self.arpu_stablecoin_yield = value,
            "ARPU_AssetFee" => self.arpu_asset_fee = value,
            "ARPU_API" => self.arpu_api = value,
            "PremiumConversionRate" => self.premium_conversion_rate = value,
            "AvgTransactionVolume" => self.avg_transaction_volume = value,
            "AverageLifetimeMonths" => self.average_lifetime_months = value,
            "FixedCosts_Payroll" => self.fixed_costs_payroll = value,
            "FixedCosts_RnD" => self.fixed_costs_rnd = value,
            "FixedCosts_Operations" => self.fixed_costs_operations = value,
            "VariableCost_KYC" => self.variable_cost_kyc = value,
            "VariableCost_Infrastructure" => self.variable_cost_infrastructure = value,
            "ProjectionMonths" => self.projection_months = integral(name, value)?,
            other => {
                return Err(ModelError::validation(other, "unknown parameter"));
            }
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f64); 16] {
        [
            ("MonthlyGrowthRate", self.monthly_growth_rate),
            ("ChurnRate", self.churn_rate),
            ("CAC", self.cac),
            ("ARPU_Free", self.arpu_free),
            ("ARPU_Premium", self.arpu_premium),
            ("ARPU_StablecoinYield", self.arpu_stablecoin_yield),
            ("ARPU_AssetFee", self.arpu_asset_fee),
            ("ARPU_API", self.arpu_api),
            ("PremiumConversionRate", self.premium_conversion_rate),
            ("AvgTransactionVolume", self.avg_transaction_volume),
            ("AverageLifetimeMonths", self.average_lifetime_months),
            ("FixedCosts_Payroll", self.fixed_costs_payroll),
            ("FixedCosts_RnD", self.fixed_costs_rnd),
            ("FixedCosts_Operations", self.fixed_costs_operations),
            ("VariableCost_KYC", self.variable_cost_kyc),
            ("VariableCost_Infrastructure", self.variable_cost_infrastructure),
        ]
    }
}

fn integral(name: &str, value: f64) -> Result<i64, ModelError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ModelError::validation(name, format!("must be a whole number, got {}", value)));
    }
    if value.abs() > i64::MAX as f64 {
        return Err(ModelError::validation(name, "out of range"));
    }
    Ok(value as i64)
}
