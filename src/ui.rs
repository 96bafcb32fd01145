//! Terminal rendering for the penlab CLI

use std::path::Path;

use console::style;

use penlab::application::{InitReport, ProjectEntry, ProjectMetadata};
use penlab::generation::{EntryKind, Outcome};

pub fn success(message: &str) -> String {
    format!("{} {}", style("✓").green(), style(message).green())
}

pub fn failure(message: &str) -> String {
    format!("{} {}", style("✗").red(), style(message).red())
}

pub fn warning(message: &str) -> String {
    format!("{} {}", style("!").yellow(), style(message).yellow())
}

/// Validation messages, one per line under a heading
pub fn validation_errors(heading: &str, errors: &[String]) -> String {
    let mut lines = vec![failure(heading)];
    lines.extend(errors.iter().map(|e| format!("  - {e}")));
    lines.join("\n")
}

/// Outcomes as an indented tree relative to `root`.
///
/// Accepted entries are drawn at their depth; rejected and failed ones are
/// drawn in red with the reason.
pub fn outcome_tree(root: &Path, outcomes: &[Outcome]) -> String {
    let mut lines = Vec::with_capacity(outcomes.len());

    for outcome in outcomes {
        let relative = outcome.path().strip_prefix(root).unwrap_or(outcome.path());
        let depth = relative.components().count().saturating_sub(1);
        let indent = "  ".repeat(depth + 1);

        let line = match outcome {
            Outcome::Created {
                kind, executable, ..
            }
            | Outcome::Planned {
                kind, executable, ..
            } => {
                let name = entry_name(relative, *kind);
                match (kind, executable) {
                    (EntryKind::Directory, _) => format!("{indent}{}", style(name).cyan()),
                    (EntryKind::File, true) => {
                        format!("{indent}{name} {}", style("(executable)").dim())
                    }
                    (EntryKind::File, false) => format!("{indent}{name}"),
                }
            }
            Outcome::Rejected { kind, .. } => format!(
                "{indent}{} {}",
                style(format!("✗ {}", relative.display())).red(),
                style(format!("rejected: {kind} resolves outside its parent")).red()
            ),
            Outcome::Failed { kind, error, .. } => format!(
                "{indent}{} {}",
                style(format!("✗ {}", relative.display())).red(),
                style(format!("failed to create {kind}: {error}")).red()
            ),
        };
        lines.push(line);
    }

    lines.join("\n")
}

fn entry_name(relative: &Path, kind: EntryKind) -> String {
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative.display().to_string());
    match kind {
        EntryKind::Directory => format!("{name}/"),
        EntryKind::File => name,
    }
}

/// Closing lines of an `init` run
pub fn init_summary(report: &InitReport) -> String {
    let summary = report.summary();
    let mut lines = Vec::new();

    if report.mode.is_dry_run() {
        if report.existed {
            lines.push(warning(
                "Project directory already exists and would be replaced with --force",
            ));
        }
        lines.push(success(&format!(
            "Dry run complete: {} entries planned, nothing written",
            summary.planned
        )));
    } else {
        lines.push(success(&format!(
            "Project created at {} ({} entries)",
            report.project_path.display(),
            summary.created
        )));
        match (&report.metadata_path, &report.metadata_error) {
            (_, Some(error)) => {
                lines.push(failure(&format!("Could not save project metadata: {error}")))
            }
            (Some(path), None) => {
                let saved = format!("Metadata saved to {}", path.display());
                lines.push(format!("  {}", style(saved).dim()))
            }
            (None, None) => {}
        }
    }

    if summary.rejected > 0 {
        lines.push(warning(&format!(
            "{} entries rejected for resolving outside the project",
            summary.rejected
        )));
    }
    if summary.failed > 0 {
        lines.push(failure(&format!("{} entries failed", summary.failed)));
    }

    lines.join("\n")
}

/// `list-projects` table
pub fn project_table(projects: &[ProjectEntry]) -> String {
    let headers = ["Project", "Template", "Target", "Created", "Path"];
    let rows: Vec<[String; 5]> = projects
        .iter()
        .map(|p| {
            [
                p.name.clone(),
                p.template.clone(),
                p.target.clone(),
                p.created.clone(),
                p.path.display().to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_cells = headers.map(String::from);
    let mut lines = vec![style(format_row(header_cells.as_slice())).bold().to_string()];
    lines.extend(rows.iter().map(|row| format_row(row.as_slice())));
    lines.join("\n")
}

/// `info` panel
pub fn project_panel(metadata: &ProjectMetadata) -> String {
    let fields = [
        ("Project", &metadata.name),
        ("Template", &metadata.template),
        ("Target", &metadata.target),
        ("Your IP", &metadata.your_ip),
        ("Author", &metadata.author),
        ("Created", &metadata.created),
        ("Path", &metadata.path),
    ];

    let mut lines = vec![style("Project information").bold().to_string()];
    for (label, value) in fields {
        lines.push(format!(
            "  {} {}",
            style(format!("{label}:")).cyan(),
            value.as_deref().unwrap_or("-")
        ));
    }
    lines.join("\n")
}
