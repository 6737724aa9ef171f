//! `vizdeploy status`: tool availability and project file check.

use std::path::Path;

use console::{style, Term};

use crate::core::config::CONFIG_FILE_NAMES;
use crate::core::context::ExecutionContext;
use crate::core::error::AppError;
use crate::core::manifest::format_size;
use crate::core::orchestrator::{Orchestrator, StatusReport};
use crate::providers::tools::install_hint;
use crate::targets::{default_targets, TargetKind, TargetOptions};
use crate::ui;

fn mark(ok: bool) -> String {
    if ok {
        style("✓").green().to_string()
    } else {
        style("✗").red().to_string()
    }
}

/// Prints the status report for a project.
pub fn status(source: &Path, config_path: Option<&Path>, verbose: bool) -> Result<(), AppError> {
    let (source_root, config) = super::load_project(source, config_path)?;
    let ctx = ExecutionContext::new(false, verbose);
    let targets = default_targets(&ctx, &source_root, &TargetOptions::from_config(&config));
    let tools: Vec<(TargetKind, Option<&'static str>)> = targets
        .iter()
        .map(|t| (t.kind(), t.tool().map(|tool| tool.binary())))
        .collect();

    let orchestrator = Orchestrator::new(&source_root, &config, targets);
    let report = orchestrator.status()?;

    ui::section("Targets");
    print_targets(&report, &tools);

    ui::section("Project files");
    let term = Term::stdout();
    for (file, present) in &report.files {
        let _ = term.write_line(&format!("  {} {}", mark(*present), file));
    }

    let config_file = match config_path {
        Some(path) => Some(path.display().to_string()),
        None => CONFIG_FILE_NAMES
            .iter()
            .find(|name| source_root.join(name).is_file())
            .map(|name| name.to_string()),
    };
    match config_file {
        Some(name) => {
            let _ = term.write_line(&format!("  {} {}", mark(true), name));
        }
        None => {
            let _ = term.write_line(&format!(
                "  {} {}",
                style("-").dim(),
                style("no config file, using defaults").dim()
            ));
        }
    }

    ui::section("Build");
    match &report.build {
        Some(manifest) => ui::info(&format!(
            "{}: {} files, {}",
            manifest.output_dir.display(),
            manifest.file_count(),
            format_size(manifest.total_size)
        )),
        None => ui::info(&format!(
            "No build yet in {}. Run {}",
            config.output_dir(&source_root).display(),
            style("vizdeploy build").cyan()
        )),
    }

    Ok(())
}

fn print_targets(report: &StatusReport, tools: &[(TargetKind, Option<&'static str>)]) {
    let term = Term::stdout();
    let width = report
        .targets
        .iter()
        .map(|(kind, _)| kind.display_name().len())
        .max()
        .unwrap_or(6);

    for (kind, available) in &report.targets {
        let binary = tools
            .iter()
            .find(|(k, _)| k == kind)
            .and_then(|(_, binary)| *binary);
        let detail = match (*available, binary) {
            (true, Some(binary)) => style(format!("{} found", binary)).dim().to_string(),
            (true, None) => style("built in").dim().to_string(),
            (false, Some(binary)) => style(install_hint(binary)).yellow().to_string(),
            (false, None) => String::new(),
        };
        let _ = term.write_line(&format!(
            "  {} {:<width$}  {}",
            mark(*available),
            kind.display_name(),
            detail,
            width = width
        ));
    }
}
