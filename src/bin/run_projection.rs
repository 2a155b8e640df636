//! Project a single rental/resale plan and print the monthly table
//!
//! Inputs come from an optional JSON scenario, overridden by flags:
//!   run_projection --tier TYPE-D --quantity 2 --decision 4:upgrade:TYPE-V --decision 8:resale

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use rental_projection::catalog::{load_catalog, load_default_catalog};
use rental_projection::plan::{load_scenario, DecisionAction, PlanSession, ScenarioParams};
use rental_projection::projection::{ElapsedMonths, ProjectionEngine, ProjectionInputs, ProjectionResult};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "run_projection", about = "Project rental income and resale payouts month by month")]
struct Args {
    /// JSON scenario file (start_date, tier, quantity, decisions, config)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// CSV catalog; defaults to data/tiers.csv, then the built-in tiers
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Tier bought on the start date
    #[arg(long)]
    tier: Option<String>,

    /// Units bought (1-20)
    #[arg(long)]
    quantity: Option<u32>,

    /// Decision taken at the next decision point, in order:
    /// "[<month>:]<upgrade|resale>[:<to-tier>]". Month and destination are
    /// optional and checked against the due month and the successor tier.
    #[arg(long = "decision")]
    decisions: Vec<String>,

    /// Count months since purchase in calendar months instead of 30-day units
    #[arg(long)]
    calendar_months: bool,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Write output here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

/// One `--decision` argument
#[derive(Debug, Clone, PartialEq)]
struct DecisionArg {
    month: Option<u32>,
    action: DecisionAction,
    to_tier: Option<String>,
}

/// Parse "[<month>:]<upgrade|resale>[:<to-tier>]"
fn parse_decision(raw: &str) -> Result<DecisionArg> {
    let parts: Vec<&str> = raw.split(':').map(str::trim).collect();
    let (month, rest) = match parts[0].parse::<u32>() {
        Ok(m) => (Some(m), &parts[1..]),
        Err(_) => (None, &parts[..]),
    };

    let (action, to_tier) = match rest {
        [action] => (*action, None),
        [action, to] if !to.is_empty() => (*action, Some(to.to_string())),
        _ => bail!("expected [<month>:]<upgrade|resale>[:<to-tier>], got '{}'", raw),
    };
    let action = action.parse::<DecisionAction>().map_err(anyhow::Error::msg)?;
    if to_tier.is_some() && action != DecisionAction::Upgrade {
        bail!("only upgrades take a destination tier: '{}'", raw);
    }

    Ok(DecisionArg { month, action, to_tier })
}

/// Check a parsed argument against the session's due month and successor tier
fn check_decision(arg: &DecisionArg, session: &PlanSession) -> Result<()> {
    let due = session.next_decision_month();
    if let Some(m) = arg.month {
        if m != due {
            bail!("decision targets month {} but the next decision is due at month {}", m, due);
        }
    }
    if let Some(to) = &arg.to_tier {
        let successor = session.quote()?.upgrade.map(|u| u.to_tier);
        if successor.as_deref() != Some(to.as_str()) {
            bail!(
                "cannot upgrade {} to {}: successor is {}",
                session.current_tier()?.id,
                to,
                successor.as_deref().unwrap_or("none")
            );
        }
    }
    Ok(())
}

fn print_table(out: &mut dyn Write, session: &PlanSession) -> Result<()> {
    let inputs = session.inputs();
    let catalog = session.engine().catalog();

    let quote = session.quote()?;
    writeln!(out, "Current tier: {} x{}", quote.name, quote.quantity)?;
    writeln!(out, "  Purchase price: {:>14} JPY", quote.purchase_price)?;
    writeln!(out, "  Monthly rental: {:>14} JPY", quote.monthly_rental)?;
    writeln!(out, "  Resale value:   {:>14} JPY", quote.resale_value)?;

    if !session.decisions().is_empty() {
        writeln!(out, "\nDecision history:")?;
        for decision in session.decisions() {
            writeln!(out, "  {}", decision.describe(catalog, inputs.start_date)?)?;
        }
    }

    if let Some(pending) = session.pending_decision()? {
        writeln!(out, "\nDecision due at month {}:", pending.month)?;
        writeln!(out, "  resale  -> +{} JPY", pending.resale_value)?;
        if let Some((to, cost)) = &pending.upgrade {
            writeln!(out, "  upgrade -> {} for {} JPY", catalog.get(to)?.name, cost)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<8} {:>5} {:<22} {:>13} {:>13} {:>14} {:>12} {:>8}",
        "Month", "No", "Tiers", "Investment", "Revenue", "Balance", "Monthly", "Profit%"
    )?;
    for s in &session.result().snapshots {
        writeln!(
            out,
            "{:<8} {:>5} {:<22} {:>13} {:>13} {:>14} {:>12} {:>8}",
            s.label, s.month_number, s.active_tiers, s.investment, s.revenue, s.balance, s.monthly_revenue, s.profit_rate
        )?;
    }

    print_summary(out, session.result())
}

fn print_summary(out: &mut dyn Write, result: &ProjectionResult) -> Result<()> {
    if let Some(last) = result.final_snapshot() {
        writeln!(out, "\nFinal balance: {} JPY ({}%)", last.balance, last.profit_rate)?;
    }
    match result.break_even_month() {
        Some(m) => writeln!(out, "Break-even at month {}", m)?,
        None => writeln!(out, "No break-even within the horizon")?,
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = match &args.scenario {
        Some(path) => load_scenario(path).with_context(|| format!("loading scenario {}", path.display()))?,
        None => ScenarioParams::default(),
    };
    if let Some(date) = args.start_date {
        params.start_date = date;
    }
    if let Some(tier) = &args.tier {
        params.tier = tier.clone();
    }
    if let Some(q) = args.quantity {
        params.quantity = q;
    }
    if args.calendar_months {
        params.config.elapsed_months = ElapsedMonths::Calendar;
    }

    let catalog = match &args.catalog {
        Some(path) => load_catalog(path).with_context(|| format!("loading catalog {}", path.display()))?,
        None => load_default_catalog().context("loading default catalog")?,
    };

    let engine = ProjectionEngine::new(catalog, params.config.clone());
    let inputs: ProjectionInputs = params.to_inputs();
    let mut session = PlanSession::new(engine, inputs).context("projecting scenario")?;

    for raw in &args.decisions {
        let arg = parse_decision(raw)?;
        check_decision(&arg, &session).with_context(|| format!("checking decision '{}'", raw))?;
        session
            .record_decision(arg.action)
            .with_context(|| format!("recording decision '{}'", raw))?;
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("creating {}", path.display()))?),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Table => print_table(&mut out, &session)?,
        OutputFormat::Csv => session.result().write_csv(&mut out)?,
        OutputFormat::Json => writeln!(out, "{}", session.result().to_json()?)?,
    }
    out.flush()?;

    if let Some(path) = &args.output {
        println!("Output written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rental_projection::plan::Decision;

    fn arg(month: Option<u32>, action: DecisionAction, to_tier: Option<&str>) -> DecisionArg {
        DecisionArg { month, action, to_tier: to_tier.map(str::to_string) }
    }

    #[test]
    fn test_parse_decision() {
        assert_eq!(parse_decision("upgrade").unwrap(), arg(None, DecisionAction::Upgrade, None));
        assert_eq!(parse_decision("8:resale").unwrap(), arg(Some(8), DecisionAction::Resale, None));
        assert_eq!(
            parse_decision("4:upgrade:TYPE-V").unwrap(),
            arg(Some(4), DecisionAction::Upgrade, Some("TYPE-V"))
        );
        assert_eq!(
            parse_decision("upgrade:TYPE-K").unwrap(),
            arg(None, DecisionAction::Upgrade, Some("TYPE-K"))
        );

        assert!(parse_decision("x:resale").is_err());
        assert!(parse_decision("4:hold").is_err());
        assert!(parse_decision("4").is_err());
        assert!(parse_decision("4:resale:TYPE-V").is_err());
        assert!(parse_decision("4:upgrade:TYPE-V:extra").is_err());
    }

    #[test]
    fn test_check_decision() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let inputs = ProjectionInputs::new(start, "TYPE-D", 1)
            .with_decisions(vec![Decision::upgrade(4, "TYPE-D", "TYPE-V")]);
        let session = PlanSession::new(ProjectionEngine::default(), inputs).unwrap();

        // Cursor is at TYPE-V, month 8
        assert!(check_decision(&parse_decision("8:upgrade:TYPE-K").unwrap(), &session).is_ok());
        assert!(check_decision(&parse_decision("resale").unwrap(), &session).is_ok());
        assert!(check_decision(&parse_decision("4:upgrade").unwrap(), &session).is_err());
        assert!(check_decision(&parse_decision("8:upgrade:TYPE-X").unwrap(), &session).is_err());
    }
}
