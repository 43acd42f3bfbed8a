use std::time::Duration;

use colored::*;
use tracing::{Instrument, info_span};

use reachr_common::config::Config;
use reachr_common::environment::{BootState, Environment};
use reachr_common::{info, success};
use reachr_core::probe::SocketProbe;
use reachr_core::shell::SystemShell;
use reachr_core::suite::{CaseReport, Suite, Summary};
use reachr_core::system;

use crate::commands::RunArgs;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

/// Resolves the environment the suite runs in from flags and the host.
pub async fn build_config(args: RunArgs, quiet: u8, no_color: bool) -> anyhow::Result<Config> {
    let boot: BootState = if args.booted {
        BootState::Booted
    } else if args.not_booted {
        BootState::NotBooted
    } else {
        system::detect_boot_state(&SystemShell).await
    };

    let environment = Environment::new(args.features, boot);
    let features: String = environment
        .features
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<String>>()
        .join(", ");
    info!(
        "Features: [{}], boot state: {:?}",
        if features.is_empty() { "none" } else { features.as_str() },
        environment.boot
    );

    Ok(Config {
        quiet,
        no_color,
        environment,
        filter: args.filter,
    })
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let mut suite: Suite = Suite::standard();
    if let Some(pattern) = &cfg.filter {
        suite = suite.filter(pattern);
    }
    if suite.is_empty() {
        anyhow::bail!("no checks match the given filter");
    }

    let span = info_span!("checks", indicatif.pb_show = true);
    spinner::style_span(&span, "Starting checks...");

    let reports: Vec<CaseReport> = suite
        .run_with_progress(&cfg.environment, &SystemShell, &SocketProbe::new(), |case| {
            spinner::report_progress(&span, &format!("Running {}", case.name.bold()));
        })
        .instrument(span.clone())
        .await;
    drop(span);

    print::header("results", cfg.quiet);
    print_reports(&reports, cfg);

    let summary: Summary = Summary::from_reports(&reports);
    print_summary(&summary, &reports, cfg);

    if summary.failed > 0 {
        anyhow::bail!("{} of {} checks failed", summary.failed, summary.total());
    }
    Ok(())
}

fn print_reports(reports: &[CaseReport], cfg: &Config) {
    for report in reports {
        let kind = report.outcome.kind();
        let hide: bool = match cfg.quiet {
            0 => false,
            1 => !report.outcome.is_failure(),
            _ => true,
        };
        if hide {
            continue;
        }

        print::print(&format!(
            "{} {} {}",
            format::outcome_label(kind),
            report.name.color(colors::PRIMARY),
            format::seconds(report.elapsed)
        ));
        if let Some(detail) = format::outcome_detail(&report.outcome) {
            print::print(&format!("        └─ {}", detail));
        }
    }
}

fn print_summary(summary: &Summary, reports: &[CaseReport], cfg: &Config) {
    let total_time: Duration = reports.iter().map(|r| r.elapsed).sum();
    let output: String = format!(
        "{} passed, {} skipped, {} failed in {}",
        summary.passed.to_string().green().bold(),
        summary.skipped.to_string().yellow().bold(),
        summary.failed.to_string().red().bold(),
        format::seconds(total_time)
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            mprint!();
            if summary.failed == 0 {
                success!("{}", output);
            } else {
                print::print(&output);
            }
        }
    }
}
