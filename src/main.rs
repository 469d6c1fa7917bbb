//! Startup Projection CLI
//!
//! Command-line interface for running financial projections

use anyhow::{bail, Context, Result};
use clap::Parser;
use startup_projection::{
    export,
    inputs::load_inputs,
    projection::ProjectionResult,
    ModelInputs, ScenarioRunner,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "startup_projection", version, about = "Month-by-month startup financial projections")]
struct Cli {
    /// Preset to start from (base, best, worst)
    #[arg(short, long, default_value = "base")]
    scenario: String,

    /// Inputs file (.json object or Parameter,Value .csv) applied over the base preset
    #[arg(short, long, conflicts_with = "scenario")]
    inputs: Option<PathBuf>,

    /// Override one input by wire name, e.g. --set ChurnRate=4.5 (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    /// Projection horizon in months (falls back to PROJECTION_MONTHS)
    #[arg(short, long)]
    months: Option<i64>,

    /// Monthly rows to print to the console
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Write the monthly records as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Run every preset and print a side-by-side summary
    #[arg(long)]
    compare: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let runner = ScenarioRunner::new();

    println!("Startup Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");

    if cli.compare {
        if cli.inputs.is_some() || !cli.overrides.is_empty() {
            log::warn!("--inputs and --set are ignored with --compare");
        }
        return compare(&runner);
    }

    let inputs = resolve_inputs(&cli, &runner, env_months())?;
    let result = runner
        .run_inputs(&inputs)
        .context("projection failed")?;

    print_inputs(&inputs);
    print_months(&result, cli.rows);
    print_summary(&result);

    if let Some(path) = &cli.csv {
        export::write_csv_file(&result, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nMonthly results written to: {}", path.display());
    }
    if let Some(path) = &cli.json {
        export::write_json_file(&result, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Full results written to: {}", path.display());
    }

    Ok(())
}

/// Horizon from the environment, used only as the preset's default
fn env_months() -> Option<i64> {
    env::var("PROJECTION_MONTHS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Horizon precedence: `--months`, then `--set ProjectionMonths=..`, then the
/// inputs file. `PROJECTION_MONTHS` only replaces a preset's horizon.
fn resolve_inputs(cli: &Cli, runner: &ScenarioRunner, env_months: Option<i64>) -> Result<ModelInputs> {
    let mut inputs = match &cli.inputs {
        Some(path) => load_inputs(path)
            .with_context(|| format!("failed to load inputs from {}", path.display()))?,
        None => {
            let mut preset = runner.preset(&cli.scenario)?;
            if let Some(months) = env_months {
                preset.projection_months = months;
            }
            preset
        }
    };

    for assignment in &cli.overrides {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("override {:?} must look like NAME=VALUE", assignment);
        };
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("override {:?} has a non-numeric value", assignment))?;
        inputs.set_parameter(name.trim(), value)?;
    }

    if let Some(months) = cli.months {
        inputs.projection_months = months;
    }

    Ok(inputs)
}

fn print_inputs(inputs: &ModelInputs) {
    println!("Inputs:");
    println!("  Initial Users: {}", inputs.initial_users);
    println!("  Growth / Churn: {:.2}% / {:.2}% per month", inputs.monthly_growth_rate, inputs.churn_rate);
    println!("  Premium Conversion: {:.2}%", inputs.premium_conversion_rate);
    println!("  Premium ARPU: ${:.2}", inputs.total_arpu());
    println!("  CAC: ${:.2}", inputs.cac);
    println!("  Fixed Costs: ${:.2}/month", inputs.fixed_costs());
    println!("  Horizon: {} months", inputs.projection_months);
    println!();
}

fn print_months(result: &ProjectionResult, rows: usize) {
    println!("Projection Results ({} months):", result.monthly_data.len());
    println!("{:>5} {:>12} {:>10} {:>10} {:>10} {:>14} {:>14} {:>14} {:>10}",
        "Month", "Users", "New", "Churned", "Premium", "Revenue", "Costs", "EBITDA", "NetMargin");
    println!("{}", "-".repeat(107));

    for row in result.monthly_data.iter().take(rows) {
        println!("{:>5} {:>12} {:>10} {:>10} {:>10} {:>14.2} {:>14.2} {:>14.2} {:>9.2}%",
            row.month,
            row.total_users,
            row.new_users,
            row.churned_users,
            row.premium_users,
            row.total_revenue,
            row.total_costs,
            row.ebitda,
            row.net_margin,
        );
    }

    if result.monthly_data.len() > rows {
        println!("... ({} more months)", result.monthly_data.len() - rows);
    }
}

fn print_summary(result: &ProjectionResult) {
    let summary = &result.summary;
    println!("\nSummary:");
    println!("  LTV: ${:.2} (Total ARPU ${:.2} x {} months)", summary.ltv, summary.total_arpu, summary.average_lifetime_months);
    println!("  LTV/CAC: {:.2}", summary.ltv_cac_ratio);
    println!("  Year 1 Revenue: ${:.2}  EBITDA: ${:.2}", summary.year1_revenue, summary.year1_ebitda);
    println!("  Year 2 Revenue: ${:.2}  EBITDA: ${:.2}", summary.year2_revenue, summary.year2_ebitda);
    println!("  Year 3 Revenue: ${:.2}  EBITDA: ${:.2}", summary.year3_revenue, summary.year3_ebitda);
    println!("  Final Month Users: {}", summary.final_month_users);
    println!("  Final Month Revenue: ${:.2}", summary.final_month_revenue);
    println!("  Avg Gross Margin: {:.2}%", summary.avg_gross_margin);
    println!("  Avg Net Margin: {:.2}%", summary.avg_net_margin);
}

fn compare(runner: &ScenarioRunner) -> Result<()> {
    let results = runner.run_all().context("scenario comparison failed")?;

    println!("{:<8} {:>14} {:>14} {:>14} {:>14} {:>12} {:>8}",
        "Scenario", "Y1 Revenue", "Y2 Revenue", "Y3 Revenue", "Y3 EBITDA", "Final Users", "LTV/CAC");
    println!("{}", "-".repeat(90));

    for (scenario, result) in &results {
        let s = &result.summary;
        println!("{:<8} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>12} {:>8.2}",
            scenario.as_str(),
            s.year1_revenue,
            s.year2_revenue,
            s.year3_revenue,
            s.year3_ebitda,
            s.final_month_users,
            s.ltv_cac_ratio,
        );
    }

    Ok(())
}
