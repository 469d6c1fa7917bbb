//! Monthly output records and the complete projection result

use super::summary::SummaryMetrics;
use crate::inputs::ModelInputs;
use serde::{Deserialize, Serialize, Serializer};

/// Column names of a monthly record, in output order
pub const MONTHLY_COLUMNS: [&str; 22] = [
    "Month",
    "TotalUsers",
    "ActiveUsers",
    "NewUsers",
    "ChurnedUsers",
    "PremiumUsers",
    "FreeUsers",
    "Revenue_Premium",
    "Revenue_Stablecoin",
    "Revenue_AssetFee",
    "Revenue_API",
    "TotalRevenue",
    "CAC_Cost",
    "KYC_Cost",
    "Infrastructure_Cost",
    "TotalVariableCosts",
    "FixedCosts",
    "TotalCosts",
    "GrossProfit",
    "GrossMargin",
    "EBITDA",
    "NetMargin",
];

/// Round to cents.
///
/// Rounds the exact binary value, so `2.675` (stored just below) gives `2.67`.
/// Exact ties only occur on multiples of 1/8, where scaling by 100 is exact
/// and ties go to even.
pub fn round2(value: f64) -> f64 {
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() < EXACT_EIGHTHS {
        return (value * 100.0).round_ties_even() / 100.0;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

// Multiples of 1/8 below this scale by 100 without rounding
const EXACT_EIGHTHS: f64 = (1u64 << 48) as f64;

/// A single row of projection output for one month.
///
/// Money and percent values are already rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    // Timing
    #[serde(rename = "Month")]
    pub month: u32,

    // Users
    #[serde(rename = "TotalUsers")]
    pub total_users: u64,
    #[serde(rename = "ActiveUsers")]
    pub active_users: u64,
    #[serde(rename = "NewUsers")]
    pub new_users: u64,
    #[serde(rename = "ChurnedUsers")]
    pub churned_users: u64,
    #[serde(rename = "PremiumUsers")]
    pub premium_users: u64,
    #[serde(rename = "FreeUsers")]
    pub free_users: u64,

    // Revenue
    #[serde(rename = "Revenue_Premium")]
    pub revenue_premium: f64,
    #[serde(rename = "Revenue_Stablecoin")]
    pub revenue_stablecoin: f64,
    #[serde(rename = "Revenue_AssetFee")]
    pub revenue_asset_fee: f64,
    #[serde(rename = "Revenue_API")]
    pub revenue_api: f64,
    #[serde(rename = "TotalRevenue")]
    pub total_revenue: f64,

    // Costs
    #[serde(rename = "CAC_Cost")]
    pub cac_cost: f64,
    #[serde(rename = "KYC_Cost")]
    pub kyc_cost: f64,
    #[serde(rename = "Infrastructure_Cost")]
    pub infrastructure_cost: f64,
    #[serde(rename = "TotalVariableCosts")]
    pub total_variable_costs: f64,
    #[serde(rename = "FixedCosts")]
    pub fixed_costs: f64,
    #[serde(rename = "TotalCosts")]
    pub total_costs: f64,

    // Profitability
    #[serde(rename = "GrossProfit")]
    pub gross_profit: f64,
    #[serde(rename = "GrossMargin")]
    pub gross_margin: f64,
    #[serde(rename = "EBITDA")]
    pub ebitda: f64,
    #[serde(rename = "NetMargin")]
    pub net_margin: f64,
}

/// Column-oriented view of the monthly records, one array per field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyColumns {
    #[serde(rename = "Month")]
    pub month: Vec<u32>,
    #[serde(rename = "TotalUsers")]
    pub total_users: Vec<u64>,
    #[serde(rename = "ActiveUsers")]
    pub active_users: Vec<u64>,
    #[serde(rename = "NewUsers")]
    pub new_users: Vec<u64>,
    #[serde(rename = "ChurnedUsers")]
    pub churned_users: Vec<u64>,
    #[serde(rename = "PremiumUsers")]
    pub premium_users: Vec<u64>,
    #[serde(rename = "FreeUsers")]
    pub free_users: Vec<u64>,
    #[serde(rename = "Revenue_Premium")]
    pub revenue_premium: Vec<f64>,
    #[serde(rename = "Revenue_Stablecoin")]
    pub revenue_stablecoin: Vec<f64>,
    #[serde(rename = "Revenue_AssetFee")]
    pub revenue_asset_fee: Vec<f64>,
    #[serde(rename = "Revenue_API")]
    pub revenue_api: Vec<f64>,
    #[serde(rename = "TotalRevenue")]
    pub total_revenue: Vec<f64>,
    #[serde(rename = "CAC_Cost")]
    pub cac_cost: Vec<f64>,
    #[serde(rename = "KYC_Cost")]
    pub kyc_cost: Vec<f64>,
    #[serde(rename = "Infrastructure_Cost")]
    pub infrastructure_cost: Vec<f64>,
    #[serde(rename = "TotalVariableCosts")]
    pub total_variable_costs: Vec<f64>,
    #[serde(rename = "FixedCosts")]
    pub fixed_costs: Vec<f64>,
    #[serde(rename = "TotalCosts")]
    pub total_costs: Vec<f64>,
    #[serde(rename = "GrossProfit")]
    pub gross_profit: Vec<f64>,
    #[serde(rename = "GrossMargin")]
    pub gross_margin: Vec<f64>,
    #[serde(rename = "EBITDA")]
    pub ebitda: Vec<f64>,
    #[serde(rename = "NetMargin")]
    pub net_margin: Vec<f64>,
}

impl From<&[MonthlyRecord]> for MonthlyColumns {
    fn from(records: &[MonthlyRecord]) -> Self {
        let mut columns = MonthlyColumns::default();
        for r in records {
            columns.month.push(r.month);
            columns.total_users.push(r.total_users);
            columns.active_users.push(r.active_users);
            columns.new_users.push(r.new_users);
            columns.churned_users.push(r.churned_users);
            columns.premium_users.push(r.premium_users);
            columns.free_users.push(r.free_users);
            columns.revenue_premium.push(r.revenue_premium);
            columns.revenue_stablecoin.push(r.revenue_stablecoin);
            columns.revenue_asset_fee.push(r.revenue_asset_fee);
            columns.revenue_api.push(r.revenue_api);
            columns.total_revenue.push(r.total_revenue);
            columns.cac_cost.push(r.cac_cost);
            columns.kyc_cost.push(r.kyc_cost);
            columns.infrastructure_cost.push(r.infrastructure_cost);
            columns.total_variable_costs.push(r.total_variable_costs);
            columns.fixed_costs.push(r.fixed_costs);
            columns.total_costs.push(r.total_costs);
            columns.gross_profit.push(r.gross_profit);
            columns.gross_margin.push(r.gross_margin);
            columns.ebitda.push(r.ebitda);
            columns.net_margin.push(r.net_margin);
        }
        columns
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    /// Monthly records in chronological order
    pub monthly_data: Vec<MonthlyRecord>,

    /// Rollup over the monthly records
    pub summary: SummaryMetrics,

    /// Resolved inputs the projection ran with
    pub inputs: ModelInputs,
}

impl ProjectionResult {
    /// Column-oriented copy of the monthly records
    pub fn monthly_columns(&self) -> MonthlyColumns {
        MonthlyColumns::from(self.monthly_data.as_slice())
    }

    pub fn last_month(&self) -> Option<&MonthlyRecord> {
        self.monthly_data.last()
    }
}

#[derive(Serialize)]
struct ProjectionReport<'a> {
    monthly_data: MonthlyColumns,
    summary: &'a SummaryMetrics,
    inputs: &'a ModelInputs,
}

/// Serializes as `{"monthly_data": {column: [...]}, "summary": {...}, "inputs": {...}}`
impl Serialize for ProjectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProjectionReport {
            monthly_data: self.monthly_columns(),
            summary: &self.summary,
            inputs: &self.inputs,
        }
        .serialize(serializer)
    }
}
