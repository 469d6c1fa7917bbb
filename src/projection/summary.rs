//! Unit economics and per-year rollups over a completed projection

use super::records::{round2, MonthlyRecord};
use crate::inputs::ModelInputs;
use serde::{Deserialize, Serialize};

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    #[serde(rename = "LTV")]
    pub ltv: f64,
    /// Pass-through input, not rounded
    #[serde(rename = "CAC")]
    pub cac: f64,
    #[serde(rename = "LTV_CAC_Ratio")]
    pub ltv_cac_ratio: f64,
    #[serde(rename = "Total_ARPU")]
    pub total_arpu: f64,
    /// Pass-through input, not rounded
    #[serde(rename = "ChurnRate")]
    pub churn_rate: f64,
    /// Pass-through input, not rounded
    #[serde(rename = "AverageLifetimeMonths")]
    pub average_lifetime_months: f64,
    #[serde(rename = "Year1_Revenue")]
    pub year1_revenue: f64,
    #[serde(rename = "Year1_EBITDA")]
    pub year1_ebitda: f64,
    #[serde(rename = "Year2_Revenue")]
    pub year2_revenue: f64,
    #[serde(rename = "Year2_EBITDA")]
    pub year2_ebitda: f64,
    #[serde(rename = "Year3_Revenue")]
    pub year3_revenue: f64,
    #[serde(rename = "Year3_EBITDA")]
    pub year3_ebitda: f64,
    #[serde(rename = "Final_Month_Users")]
    pub final_month_users: u64,
    #[serde(rename = "Final_Month_Revenue")]
    pub final_month_revenue: f64,
    #[serde(rename = "Avg_Gross_Margin")]
    pub avg_gross_margin: f64,
    #[serde(rename = "Avg_Net_Margin")]
    pub avg_net_margin: f64,
}

impl SummaryMetrics {
    /// Roll up the monthly records produced for `inputs`
    pub fn from_records(inputs: &ModelInputs, records: &[MonthlyRecord]) -> Self {
        let total_arpu = inputs.total_arpu();
        let ltv = total_arpu * inputs.average_lifetime_months;
        let ltv_cac_ratio = if inputs.cac > 0.0 { ltv / inputs.cac } else { 0.0 };

        let year1 = year_totals(records, 1);
        let year2 = year_totals(records, 2);
        let year3 = year_totals(records, 3);

        let (final_month_users, final_month_revenue) = records
            .last()
            .map(|r| (r.total_users, r.total_revenue))
            .unwrap_or((0, 0.0));

        SummaryMetrics {
            ltv: round2(ltv),
            cac: inputs.cac,
            ltv_cac_ratio: round2(ltv_cac_ratio),
            total_arpu: round2(total_arpu),
            churn_rate: inputs.churn_rate,
            average_lifetime_months: inputs.average_lifetime_months,
            year1_revenue: year1.revenue,
            year1_ebitda: year1.ebitda,
            year2_revenue: year2.revenue,
            year2_ebitda: year2.ebitda,
            year3_revenue: year3.revenue,
            year3_ebitda: year3.ebitda,
            final_month_users,
            final_month_revenue,
            avg_gross_margin: round2(mean(records.iter().map(|r| r.gross_margin))),
            avg_net_margin: round2(mean(records.iter().map(|r| r.net_margin))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct YearTotals {
    revenue: f64,
    ebitda: f64,
}

/// Revenue and EBITDA summed over projection year `year` (1-indexed).
///
/// Year 1 sums whatever months exist. Later years report zero unless the
/// horizon covers the whole year.
fn year_totals(records: &[MonthlyRecord], year: usize) -> YearTotals {
    let start = (year - 1) * 12;
    let end = year * 12;
    if year > 1 && records.len() < end {
        return YearTotals::default();
    }

    let months = &records[start.min(records.len())..end.min(records.len())];
    YearTotals {
        revenue: round2(months.iter().map(|r| r.total_revenue).sum()),
        ebitda: round2(months.iter().map(|r| r.ebitda).sum()),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: u32, revenue: f64, ebitda: f64, gross_margin: f64, net_margin: f64) -> MonthlyRecord {
        MonthlyRecord {
            month,
            total_users: 100 + month as u64,
            active_users: 100 + month as u64,
            new_users: 0,
            churned_users: 0,
            premium_users: 0,
            free_users: 100 + month as u64,
            revenue_premium: revenue,
            revenue_stablecoin: 0.0,
            revenue_asset_fee: 0.0,
            revenue_api: 0.0,
            total_revenue: revenue,
            cac_cost: 0.0,
            kyc_cost: 0.0,
            infrastructure_cost: 0.0,
            total_variable_costs: 0.0,
            fixed_costs: 0.0,
            total_costs: revenue - ebitda,
            gross_profit: revenue,
            gross_margin,
            ebitda,
            net_margin,
        }
    }

    fn flat_records(months: u32) -> Vec<MonthlyRecord> {
        (1..=months).map(|m| record(m, 100.0, -10.0, 50.0, -10.0)).collect()
    }

    #[test]
    fn test_year_totals_require_full_year() {
        let inputs = ModelInputs::default();

        let summary = SummaryMetrics::from_records(&inputs, &flat_records(23));
        assert_eq!(summary.year1_revenue, 1200.0);
        assert_eq!(summary.year1_ebitda, -120.0);
        assert_eq!(summary.year2_revenue, 0.0);
        assert_eq!(summary.year2_ebitda, 0.0);
        assert_eq!(summary.year3_revenue, 0.0);

        let summary = SummaryMetrics::from_records(&inputs, &flat_records(35));
        assert_eq!(summary.year2_revenue, 1200.0);
        assert_eq!(summary.year3_revenue, 0.0);

        let summary = SummaryMetrics::from_records(&inputs, &flat_records(48));
        assert_eq!(summary.year3_revenue, 1200.0);
        assert_eq!(summary.year3_ebitda, -120.0);
    }

    #[test]
    fn test_short_horizon_year1_is_partial_sum() {
        let summary = SummaryMetrics::from_records(&ModelInputs::default(), &flat_records(5));
        assert_eq!(summary.year1_revenue, 500.0);
        assert_eq!(summary.year1_ebitda, -50.0);
    }

    #[test]
    fn test_unit_economics() {
        let summary = SummaryMetrics::from_records(&ModelInputs::default(), &flat_records(12));
        assert_eq!(summary.total_arpu, 14.0);
        assert_eq!(summary.ltv, 336.0);
        assert_eq!(summary.ltv_cac_ratio, 6.72);
        assert_eq!(summary.cac, 50.0);
        assert_eq!(summary.churn_rate, 5.0);
        assert_eq!(summary.average_lifetime_months, 24.0);
    }

    #[test]
    fn test_zero_cac_ratio_is_zero() {
        let inputs = ModelInputs { cac: 0.0, ..Default::default() };
        let summary = SummaryMetrics::from_records(&inputs, &flat_records(12));
        assert_eq!(summary.ltv_cac_ratio, 0.0);
        assert_eq!(summary.ltv, 336.0);
    }

    #[test]
    fn test_final_month_and_averages() {
        let records = vec![
            record(1, 100.0, -50.0, 40.0, -50.0),
            record(2, 300.0, 30.0, 60.0, 10.0),
            record(3, 0.0, -100.0, 0.0, 0.0),
        ];
        let summary = SummaryMetrics::from_records(&ModelInputs::default(), &records);

        assert_eq!(summary.final_month_users, 103);
        assert_eq!(summary.final_month_revenue, 0.0);
        assert_eq!(summary.avg_gross_margin, 33.33);
        assert_eq!(summary.avg_net_margin, -13.33);
    }
}
