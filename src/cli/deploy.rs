//! `vizdeploy deploy <target>` and the results table shared with the menu.

use std::path::Path;

use console::{style, Term};

use crate::core::context::ExecutionContext;
use crate::core::error::AppError;
use crate::core::orchestrator::{render_summary, Orchestrator};
use crate::core::result::{all_succeeded, DeployResult};
use crate::targets::{default_targets, TargetOptions};
use crate::ui;

use super::TargetArg;

/// Flags of the `deploy` command.
#[derive(Debug, Clone, Copy)]
pub struct DeployOptions {
    pub rebuild: bool,
    pub dry_run: bool,
    pub force_push: bool,
    pub json: bool,
}

/// Deploys to the requested target(s). Returns the process exit code:
/// 0 when every target succeeded, 1 otherwise.
pub fn deploy(
    source: &Path,
    config_path: Option<&Path>,
    target: TargetArg,
    options: DeployOptions,
    verbose: bool,
) -> Result<i32, AppError> {
    if options.json {
        ui::output::use_stderr(true);
    }

    let (source_root, config) = super::load_project(source, config_path)?;
    let ctx = ExecutionContext::new(options.dry_run, verbose);

    let mut target_options = TargetOptions::from_config(&config);
    target_options.force_push = options.force_push;
    let targets = default_targets(&ctx, &source_root, &target_options);

    let mut orchestrator = Orchestrator::new(&source_root, &config, targets);
    let results = orchestrator.run(target.selection(), options.rebuild)?;

    if options.json {
        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| AppError::Config(format!("Failed to serialize results: {}", e)))?;
        println!("{}", json);
    } else {
        print_results(&results);
    }

    Ok(if all_succeeded(&results) { 0 } else { 1 })
}

/// Prints the results table, a summary line and a hint for every failure.
pub fn print_results(results: &[DeployResult]) {
    if results.is_empty() {
        return;
    }

    let term = Term::stdout();
    let _ = term.write_line("");
    for (i, line) in render_summary(results).into_iter().enumerate() {
        let line = format!("  {}", line);
        let styled = if i < 2 {
            style(line).dim().to_string()
        } else if results[i - 2].succeeded {
            line
        } else {
            style(line).red().to_string()
        };
        let _ = term.write_line(&styled);
    }

    let failed = results.iter().filter(|r| !r.succeeded).count();
    let ok = results.len() - failed;
    let _ = term.write_line("");
    let mut parts = Vec::new();
    if ok > 0 {
        parts.push(format!("{} ok", style(ok).green()));
    }
    if failed > 0 {
        parts.push(format!("{} failed", style(failed).red()));
    }
    let noun = if results.len() == 1 { "target" } else { "targets" };
    let _ = term.write_line(&format!("{} {} ({})", results.len(), noun, parts.join(", ")));

    for result in results.iter().filter(|r| !r.succeeded) {
        let message = format!("{}: {}", result.target, result.message);
        match &result.hint {
            Some(hint) => ui::error_with_hint(&message, hint),
            None => ui::error(&message),
        }
    }
    for result in results.iter().filter(|r| r.succeeded) {
        if let Some(url) = &result.url {
            ui::info(&format!("{}: {}", result.target, url));
        }
    }
}
