//! Project every tier x quantity combination without decisions
//!
//! Outputs one summary row per combination for side-by-side comparison

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use rental_projection::catalog::{load_catalog, load_default_catalog, Yen};
use rental_projection::projection::{
    ElapsedMonths, ProjectionConfig, ProjectionEngine, ProjectionInputs, MAX_QUANTITY, MIN_QUANTITY,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "run_sweep", about = "Summarize projections for every tier and quantity")]
struct Args {
    /// CSV catalog; defaults to data/tiers.csv, then the built-in tiers
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, default_value = "2024-04-01")]
    start_date: NaiveDate,

    /// Count months since purchase in calendar months instead of 30-day units
    #[arg(long)]
    calendar_months: bool,

    #[arg(long, default_value = "sweep_summary.csv")]
    output: PathBuf,
}

/// Summary of one tier/quantity projection
#[derive(Debug, Clone, Serialize)]
struct SweepRow {
    tier: String,
    quantity: u32,
    investment: Yen,
    revenue: Yen,
    total_rental: Yen,
    final_balance: Yen,
    profit_rate: String,
    break_even_month: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path).with_context(|| format!("loading catalog {}", path.display()))?,
        None => load_default_catalog().context("loading default catalog")?,
    };
    let config = ProjectionConfig {
        elapsed_months: if args.calendar_months {
            ElapsedMonths::Calendar
        } else {
            ElapsedMonths::ThirtyDayUnit
        },
        ..Default::default()
    };
    let engine = ProjectionEngine::new(catalog, config);

    let cases: Vec<(String, u32)> = engine
        .catalog()
        .tiers()
        .iter()
        .flat_map(|t| (MIN_QUANTITY..=MAX_QUANTITY).map(move |q| (t.id.clone(), q)))
        .collect();
    println!("Running {} projections...", cases.len());

    // Engine is read-only; projections share it across threads
    let rows: Vec<SweepRow> = cases
        .par_iter()
        .map(|(tier, quantity)| -> Result<SweepRow> {
            let inputs = ProjectionInputs::new(args.start_date, tier.clone(), *quantity);
            let result = engine.project(&inputs)?;
            let last = result
                .final_snapshot()
                .context("projection produced no snapshots")?;
            Ok(SweepRow {
                tier: tier.clone(),
                quantity: *quantity,
                investment: last.investment,
                revenue: last.revenue,
                total_rental: result.total_rental(),
                final_balance: last.balance,
                profit_rate: last.profit_rate.clone(),
                break_even_month: result.break_even_month(),
            })
        })
        .collect::<Result<_>>()?;

    let mut wtr = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for row in &rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    println!("Output written to {}", args.output.display());

    println!("\nSummary at quantity 1:");
    for row in rows.iter().filter(|r| r.quantity == 1) {
        let break_even = row
            .break_even_month
            .map(|m| format!("month {}", m))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  {:<8} balance={:>12} JPY  profit={:>6}%  break-even={}",
            row.tier, row.final_balance, row.profit_rate, break_even
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
