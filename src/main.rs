use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use screening_adoption::config::AppConfig;
use screening_adoption::error::AppError;
use screening_adoption::pipeline::{
    AdoptionEngine, AdoptionReport, CohortReport, FunnelMetrics, TimingStats,
};
use screening_adoption::source::CsvSource;
use screening_adoption::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "screening-adoption",
    about = "Measure AI screening adoption across recruiting cohorts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the adoption report from application and interview-log exports
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Application tracker export (CSV)
    #[arg(long)]
    applications: PathBuf,
    /// AI interview log export (CSV)
    #[arg(long)]
    interviews: PathBuf,
    /// Evaluation date (YYYY-MM-DD, defaults to now)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
    /// Override the configured launch date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    launch_date: Option<NaiveDate>,
    /// Print the report as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Report(args) => run_report(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        applications,
        interviews,
        as_of,
        launch_date,
        json,
    } = args;

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if let Some(date) = launch_date {
        config.engine = config.engine.with_launch_date(date);
    }
    let as_of = match as_of {
        Some(date) => start_of_day(date, &config),
        None => Utc::now(),
    };

    info!(?config.environment, %as_of, launch_at = %config.engine.launch_at, "building adoption report");

    let engine = AdoptionEngine::new(config.engine);
    let source = CsvSource::new(Some(applications), Some(interviews));
    let report = engine.run(&source, as_of)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

fn start_of_day(date: NaiveDate, config: &AppConfig) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| {
            config
                .engine
                .default_offset
                .from_local_datetime(&midnight)
                .single()
        })
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

fn render_report(report: &AdoptionReport) {
    println!("AI screening adoption");
    println!(
        "Launch {} | evaluated {}",
        report.launch_at.format("%Y-%m-%d %H:%M UTC"),
        report.as_of.format("%Y-%m-%d %H:%M UTC")
    );

    render_cohort(&report.pre_launch);
    render_cohort(&report.post_launch);

    let interviews = &report.interviews;
    println!("\nInterviews ({}: {} records)", interviews.name, interviews.size);
    render_funnel("recruiter", &interviews.funnel_by_recruiter);
    render_funnel("job function", &interviews.funnel_by_job_function);
    render_funnel("country", &interviews.funnel_by_country);
    render_timing(&interviews.time_to_completion);

    if interviews.feedback_sla_breaches.is_empty() {
        println!("\nFeedback SLA breaches: none");
    } else {
        println!("\nFeedback SLA breaches");
        for breach in &interviews.feedback_sla_breaches {
            println!(
                "- {} / {}: {} business days since {} (owner {})",
                breach.profile_id,
                breach.position_id,
                breach.business_days,
                breach.since.format("%Y-%m-%d"),
                breach.owner.as_deref().unwrap_or("unknown")
            );
        }
    }

    let diagnostics = &report.diagnostics;
    println!("\nDiagnostics");
    println!(
        "- rows read: {} applications, {} interview log",
        diagnostics.application_rows, diagnostics.interview_rows
    );
    println!(
        "- skipped: {} short, {} missing key, {} unparseable date",
        diagnostics.short_rows, diagnostics.missing_key, diagnostics.unparseable_date
    );
    println!("- excluded by cohort filters: {}", diagnostics.filtered);
    println!("- duplicates collapsed: {}", diagnostics.superseded);
}

fn render_cohort(cohort: &CohortReport) {
    let metrics = &cohort.adoption;
    println!("\nCohort {} ({} records)", cohort.name, cohort.size);
    println!(
        "- adoption {}% ({} taken of {} eligible, {} ineligible)",
        metrics.adoption_rate_pct,
        metrics.total_taken,
        metrics.total_eligible,
        metrics.total_ineligible
    );
    for group in &metrics.groups {
        println!(
            "  - {}: {}% ({}/{})",
            group.key, group.rate_pct, group.taken, group.eligible
        );
    }
}

fn render_funnel(dimension: &str, funnel: &FunnelMetrics) {
    println!(
        "- funnel by {}: invited {}, scheduled {}, completed {}, feedback {} ({}% completed)",
        dimension,
        funnel.invited,
        funnel.scheduled,
        funnel.completed,
        funnel.feedback_provided,
        funnel.completion_rate_pct
    );
    for group in &funnel.groups {
        println!(
            "  - {}: {}/{} completed ({}%)",
            group.key, group.completed, group.invited, group.completion_rate_pct
        );
    }
}

fn render_timing(timing: &TimingStats) {
    println!(
        "- invite to completion: mean {} days, median {} days, mean {} business days ({} samples, {} missing)",
        timing.mean_days,
        timing.median_days,
        timing.mean_business_days,
        timing.samples,
        timing.missing
    );
}
