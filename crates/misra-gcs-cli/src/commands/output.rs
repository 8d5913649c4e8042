//! Output formatting for the compliance summary.

use anyhow::Result;
use misra_gcs_core::{ComplianceError, ComplianceReport, ComplianceStatus, GuidelineReport};

use crate::OutputFormat;

/// Print the compliance report in the specified format.
pub fn print(report: &ComplianceReport, errors: &[ComplianceError], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, errors),
        OutputFormat::Json => return print_json(report),
    }
    Ok(())
}

fn print_text(report: &ComplianceReport, errors: &[ComplianceError]) {
    println!("{} compliance summary ({})", report.misra_version, report.tool);
    match (&report.project_name, &report.software_version) {
        (Some(name), Some(version)) => println!("Project: {name} {version}"),
        (Some(name), None) => println!("Project: {name}"),
        (None, Some(version)) => println!("Version: {version}"),
        (None, None) => {}
    }
    println!();

    println!(
        "{:<16} {:<12} {:<18} Compliance",
        "Guideline", "Category", "Recategorization"
    );
    println!("{}", "-".repeat(64));
    for guideline in &report.guidelines {
        print_guideline(guideline);
    }
    println!();

    println!("{}", report.summary);

    if !errors.is_empty() {
        println!();
        println!("\x1b[31m{} error(s) during processing:\x1b[0m", errors.len());
        for error in errors {
            println!("  - {error}");
        }
    }
    if let Some(notes) = &report.notes {
        println!("\x1b[33m{notes}\x1b[0m");
    }

    println!();
    if report.compliant {
        println!("\x1b[32mCompliant\x1b[0m");
    } else {
        println!("\x1b[31mNot compliant\x1b[0m");
    }
}

fn print_guideline(guideline: &GuidelineReport) {
    let status = match guideline.status {
        ComplianceStatus::Violations => "\x1b[31mviolations\x1b[0m".to_string(),
        ComplianceStatus::Deviations => {
            let references: Vec<&str> = guideline
                .deviations
                .iter()
                .filter_map(|d| d.reference.as_deref())
                .collect();
            if references.is_empty() {
                "\x1b[33mdeviations\x1b[0m".to_string()
            } else {
                format!("\x1b[33mdeviations\x1b[0m ({})", references.join(", "))
            }
        }
        other => other.to_string(),
    };
    let recategorization = guideline
        .recategorization
        .map(|c| c.to_string())
        .unwrap_or_default();

    println!(
        "{:<16} {:<12} {:<18} {}",
        guideline.id,
        guideline.category.to_string(),
        recategorization,
        status
    );
}

fn print_json(report: &ComplianceReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
