// bilimux-cli/src/output.rs
//
// Terminal summary printing for finished runs.

use bilimux_core::{format_bytes, Artifact, ArtifactKind, RunReport};
use colored::*;

/// Prints the closing summary: everything produced, everything failed.
pub fn print_summary(report: &RunReport) {
    print_heading("Run Summary");

    if report.artifacts.is_empty() {
        println!("{}", "No output files were produced.".yellow());
    } else {
        println!(
            "Produced {} file(s):",
            report.artifacts.len().to_string().bright_green().bold()
        );
        for artifact in &report.artifacts {
            println!(
                "  {} {} ({})",
                kind_tag(artifact),
                artifact.path.display(),
                format_bytes(artifact.size)
            );
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!(
            "{} item(s) had failures:",
            report.failures.len().to_string().bright_red().bold()
        );
        for failure in &report.failures {
            println!(
                "  {} {}: {}",
                "✗".bright_red(),
                failure.dir.display(),
                failure.error
            );
        }
    }
}

/// Prints a section heading with clear separation.
pub fn print_heading(text: &str) {
    println!();
    println!("{}", "=".repeat(50).bright_blue());
    println!("{}", text.bold().bright_white());
    println!("{}", "=".repeat(50).bright_blue());
    println!();
}

fn kind_tag(artifact: &Artifact) -> ColoredString {
    match artifact.kind {
        ArtifactKind::VideoContainer => "[video]".bright_cyan(),
        ArtifactKind::AudioFile => "[audio]".bright_magenta(),
    }
}
