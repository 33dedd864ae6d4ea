//! Human-readable terminal output.

use colored::Colorize;

use crate::health::{StudioHealth, ValidationIssue, ValidationReport};
use crate::scenarios::Scenario;
use crate::seeding::{SeedSummary, StoreStatus, TargetOutcome, TargetReport};

fn outcome_line(report: &TargetReport) -> String {
    let target = format!("{:<16}", report.target.as_str());
    match &report.outcome {
        TargetOutcome::Succeeded {
            records,
            elapsed_ms,
        } => format!(
            "  {} {} {} records in {} ms",
            "✓".green(),
            target,
            records,
            elapsed_ms
        ),
        TargetOutcome::Failed { error } => {
            format!("  {} {} {}", "✗".red(), target, error.red())
        }
        TargetOutcome::Skipped { reason } => {
            format!("  {} {} skipped: {}", "-".dimmed(), target, reason.dimmed())
        }
    }
}

pub fn print_seed_summary(summary: &SeedSummary) {
    println!(
        "{} {} ({} artists, {} studios)",
        "Seeded scenario".green().bold(),
        summary.scenario.bold(),
        summary.artist_count,
        summary.studio_count
    );
    for report in &summary.targets {
        println!("{}", outcome_line(report));
    }
    if !summary.is_success() {
        println!("{}", "One or more targets failed".red().bold());
    }
}

pub fn print_reset(reports: &[TargetReport]) {
    println!("{}", "Reset seeded data".yellow().bold());
    for report in reports {
        println!("{}", outcome_line(report));
    }
}

pub fn print_scenarios(scenarios: &[Scenario]) {
    println!("{}", "Available scenarios".green().bold());
    for scenario in scenarios {
        println!(
            "  {:<20} {:>5} artists {:>4} studios  {}",
            scenario.name.bold(),
            scenario.artist_count,
            scenario.studio_count,
            scenario.description.dimmed()
        );
    }
}

pub fn print_data_status(statuses: &[StoreStatus]) {
    println!("{}", "Data status".green().bold());
    for status in statuses {
        match &status.error {
            Some(error) => println!(
                "  {:<16} {}",
                status.target.as_str(),
                format!("unavailable: {}", error).red()
            ),
            None if status.counts.is_empty() => {
                println!("  {:<16} {}", status.target.as_str(), "no data".dimmed())
            }
            None => {
                let counts: Vec<String> = status
                    .counts
                    .iter()
                    .map(|(label, count)| format!("{} {}", count, label))
                    .collect();
                println!("  {:<16} {}", status.target.as_str(), counts.join(", "));
            }
        }
    }
}

fn print_issue(issue: &ValidationIssue) {
    let severity = if issue.is_error() {
        "error".red().bold()
    } else {
        "warning".yellow().bold()
    };
    let field = issue
        .field
        .as_deref()
        .map(|f| format!(" [{}]", f))
        .unwrap_or_default();
    println!(
        "    {} {}{}: {}",
        severity,
        issue.entity_id.bold(),
        field,
        issue.message
    );
}

pub fn print_report_summary(report: &ValidationReport) {
    let headline = if report.has_errors() {
        "Validation failed".red().bold()
    } else {
        "Validation passed".green().bold()
    };
    println!(
        "{} ({} errors, {} warnings)",
        headline, report.statistics.error_count, report.statistics.warning_count
    );

    for (label, stats) in [
        ("studios", &report.statistics.studios),
        ("artists", &report.statistics.artists),
    ] {
        if let Some(stats) = stats {
            println!(
                "  {:<8} {}/{} valid ({:.1}%)",
                label, stats.valid, stats.total, stats.validation_rate
            );
        }
    }

    for (label, bucket) in [
        ("Validation", &report.validation_errors),
        ("Relationships", &report.relationship_errors),
        ("Addresses", &report.address_errors),
        ("Images", &report.image_errors),
    ] {
        if bucket.is_empty() {
            continue;
        }
        println!("  {} ({})", label.bold(), bucket.len());
        for issue in bucket {
            print_issue(issue);
        }
    }
}

pub fn print_studio_health(health: &StudioHealth) {
    print_report_summary(&health.report);

    if health.guidance.is_empty() {
        return;
    }
    println!();
    println!("{}", "Troubleshooting".cyan().bold());
    for rule in &health.guidance {
        println!("  {}", rule.title.bold());
        for suggestion in rule.suggestions {
            println!("    - {}", suggestion);
        }
    }
}
