//! The interactive menu shown when no command is given.

use std::path::Path;

use crate::core::context::ExecutionContext;
use crate::core::error::AppError;
use crate::core::orchestrator::{MenuEvent, MenuState, Orchestrator, Selection};
use crate::core::result::{DeployResult, FailureKind};
use crate::targets::{default_targets, LocalServerTarget, TargetKind, TargetOptions};
use crate::ui;
use crate::utils::validation::parse_port;

/// Runs the menu until the user exits. Returns the process exit code.
///
/// A failed build or a preview server that cannot bind ends the session
/// with status 1; target failures are reported and the menu continues.
pub fn run(source: &Path, config_path: Option<&Path>, verbose: bool) -> Result<i32, AppError> {
    let (source_root, config) = super::load_project(source, config_path)?;
    let ctx = ExecutionContext::new(false, verbose);
    let options = TargetOptions::from_config(&config);
    let mut orchestrator =
        Orchestrator::new(&source_root, &config, default_targets(&ctx, &source_root, &options));

    ui::header();
    ui::info(&format!(
        "{} {} in {}",
        config.project_name,
        config.version,
        source_root.display()
    ));

    let mut state = MenuState::Idle.next(MenuEvent::Start);
    loop {
        state = match state {
            MenuState::Idle => state.next(MenuEvent::Start),
            MenuState::AwaitingSelection => {
                let selection = prompt_selection()?;
                tracing::debug!(?selection, "menu selection");
                state.next(MenuEvent::Selected(selection))
            }
            MenuState::Running(selection) => {
                let outcome = match selection {
                    Selection::Build => orchestrator.build().map(|_| None),
                    Selection::Status => {
                        super::status::status(source, config_path, verbose).map(|()| None)
                    }
                    Selection::Target(TargetKind::LocalServer) => prompt_port(config.server.port)
                        .and_then(|port| {
                            orchestrator.replace_target(Box::new(LocalServerTarget::new(
                                &options.serve_host,
                                port,
                                options.open_browser,
                            )));
                            orchestrator.run(selection, false)
                        })
                        .map(|results| {
                            super::deploy::print_results(&results);
                            server_exit_code(&results)
                        }),
                    _ => orchestrator.run(selection, false).map(|results| {
                        super::deploy::print_results(&results);
                        None
                    }),
                };
                if let Some(code) = recover(outcome)? {
                    return Ok(code);
                }
                state.next(MenuEvent::Finished)
            }
            MenuState::ReportingResults => {
                if ui::read_line("\nPress Enter to return to the menu...")?.is_none() {
                    MenuState::Terminated
                } else {
                    state.next(MenuEvent::Acknowledged)
                }
            }
            MenuState::Terminated => break,
        };
    }

    ui::info("Bye");
    Ok(0)
}

/// Reports a failed step and keeps the menu going, unless the error must end
/// the session.
fn recover(outcome: Result<Option<i32>, AppError>) -> Result<Option<i32>, AppError> {
    match outcome {
        Err(e) if !e.is_fatal() => {
            match e.hint() {
                Some(hint) => ui::error_with_hint(&e.to_string(), &hint),
                None => ui::error(&e.to_string()),
            }
            Ok(None)
        }
        other => other,
    }
}

/// A preview server that could not bind ends the session.
fn server_exit_code(results: &[DeployResult]) -> Option<i32> {
    results
        .iter()
        .any(|r| r.failure == Some(FailureKind::PortInUse))
        .then_some(1)
}

fn prompt_selection() -> Result<Selection, AppError> {
    let entries = Selection::menu();

    if ui::interactive() {
        let labels: Vec<String> = entries.iter().map(Selection::label).collect();
        let index = ui::select("What do you want to do?", &labels)?;
        return Ok(entries.get(index).copied().unwrap_or(Selection::Exit));
    }

    ui::section("What do you want to do?");
    for (i, entry) in entries.iter().enumerate() {
        ui::output::plain(&format!("  {:>2}. {}", i + 1, entry.label()));
    }

    loop {
        let Some(input) = ui::read_line(&format!("Select an option [1-{}]:", entries.len()))?
        else {
            return Ok(Selection::Exit);
        };
        match Selection::parse(&input) {
            Some(selection) => return Ok(selection),
            None if input.is_empty() => {}
            None => ui::warning(&format!("'{}' is not a menu option", input)),
        }
    }
}

fn prompt_port(default: u16) -> Result<u16, AppError> {
    loop {
        let input = ui::port_input("Port", default)?;
        match parse_port(&input, default) {
            Ok(port) => return Ok(port),
            Err(e) => ui::warning(&e.to_string()),
        }
    }
}
