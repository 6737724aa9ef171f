//! Target selection, build reuse and result aggregation.

use std::fmt;
use std::path::Path;

use crate::core::build::{BuildReport, BuildStage};
use crate::core::config::DeployConfig;
use crate::core::error::AppError;
use crate::core::manifest::BuildManifest;
use crate::core::result::DeployResult;
use crate::providers::tools::install_hint;
use crate::targets::{DeployTarget, TargetKind};
use crate::ui;

/// An entry of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Target(TargetKind),
    All,
    Build,
    Status,
    Exit,
}

impl Selection {
    /// Menu entries in display order.
    pub fn menu() -> Vec<Selection> {
        let mut entries: Vec<Selection> = TargetKind::ALL.into_iter().map(Self::Target).collect();
        entries.extend([Self::All, Self::Build, Self::Status, Self::Exit]);
        entries
    }

    pub fn label(&self) -> String {
        match self {
            Self::Target(TargetKind::LocalServer) => "Start local server".to_string(),
            Self::Target(TargetKind::StaticZip) => "Create static package".to_string(),
            Self::Target(kind) => format!("Deploy to {}", kind.display_name()),
            Self::All => "Deploy to all".to_string(),
            Self::Build => "Build project".to_string(),
            Self::Status => "System status".to_string(),
            Self::Exit => "Exit".to_string(),
        }
    }

    /// Parses a 1-based menu number or a name such as `docker` or `all`.
    pub fn parse(input: &str) -> Option<Selection> {
        let input = input.trim();
        if let Ok(number) = input.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|index| Self::menu().get(index).copied());
        }

        match input.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "build" => Some(Self::Build),
            "status" => Some(Self::Status),
            "exit" | "quit" | "q" => Some(Self::Exit),
            other => TargetKind::from_key(other).map(Self::Target),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// States of the interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Idle,
    AwaitingSelection,
    Running(Selection),
    ReportingResults,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Start,
    Selected(Selection),
    Finished,
    Acknowledged,
}

impl MenuState {
    /// Applies `event`. Events that make no sense in a state leave it unchanged.
    pub fn next(self, event: MenuEvent) -> MenuState {
        match (self, event) {
            (Self::Idle, MenuEvent::Start) => Self::AwaitingSelection,
            (Self::AwaitingSelection, MenuEvent::Selected(Selection::Exit)) => Self::Terminated,
            (Self::AwaitingSelection, MenuEvent::Selected(selection)) => Self::Running(selection),
            (Self::Running(_), MenuEvent::Finished) => Self::ReportingResults,
            (Self::ReportingResults, MenuEvent::Acknowledged) => Self::AwaitingSelection,
            (state, _) => state,
        }
    }
}

/// Availability of the tools and project files.
#[derive(Debug)]
pub struct StatusReport {
    pub targets: Vec<(TargetKind, bool)>,
    pub files: Vec<(&'static str, bool)>,
    pub build: Option<BuildManifest>,
}

/// Files the status report checks in the source root.
pub const KEY_FILES: &[&str] = &["index.html", "js/main.js", "css/style.css"];

/// Runs the build once and the selected targets in order.
pub struct Orchestrator<'a> {
    source_root: &'a Path,
    config: &'a DeployConfig,
    targets: Vec<Box<dyn DeployTarget + 'a>>,
    manifest: Option<BuildManifest>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        source_root: &'a Path,
        config: &'a DeployConfig,
        targets: Vec<Box<dyn DeployTarget + 'a>>,
    ) -> Self {
        Self {
            source_root,
            config,
            targets,
            manifest: None,
        }
    }

    /// Swaps in `target` for the registered target of the same kind.
    pub fn replace_target(&mut self, target: Box<dyn DeployTarget + 'a>) {
        match self.targets.iter_mut().find(|t| t.kind() == target.kind()) {
            Some(slot) => *slot = target,
            None => self.targets.push(target),
        }
    }

    /// Builds from scratch and remembers the manifest.
    pub fn build(&mut self) -> Result<BuildReport, AppError> {
        let spinner = ui::ProgressBar::spinner("Building project");
        match BuildStage::new(self.source_root, self.config).run() {
            Ok(report) => {
                spinner.finish(&format!(
                    "Built {} files into {}",
                    report.manifest.file_count(),
                    report.manifest.output_dir.display()
                ));
                for item in &report.skipped {
                    ui::warning(&format!("Skipped missing {}", item));
                }
                self.manifest = Some(report.manifest.clone());
                Ok(report)
            }
            Err(e) => {
                spinner.finish_error("Build failed");
                Err(e)
            }
        }
    }

    /// Returns the current build, building only when needed.
    /// A previous output on disk is reused unless `rebuild` is set.
    pub fn ensure_build(&mut self, rebuild: bool) -> Result<BuildManifest, AppError> {
        if !rebuild {
            if let Some(manifest) = &self.manifest {
                return Ok(manifest.clone());
            }
            if let Some(manifest) = BuildStage::new(self.source_root, self.config).existing()? {
                ui::info(&format!(
                    "Reusing build in {} ({} files)",
                    manifest.output_dir.display(),
                    manifest.file_count()
                ));
                self.manifest = Some(manifest.clone());
                return Ok(manifest);
            }
        }
        Ok(self.build()?.manifest)
    }

    /// Targets a selection runs, in fixed order.
    pub fn selected(&self, selection: Selection) -> Vec<TargetKind> {
        match selection {
            Selection::Target(kind) => vec![kind],
            Selection::All => self
                .targets
                .iter()
                .filter(|t| t.runs_in_batch())
                .map(|t| t.kind())
                .collect(),
            Selection::Build | Selection::Status | Selection::Exit => Vec::new(),
        }
    }

    /// Runs the targets of `selection` after making sure a build exists.
    /// Only a failed build is returned as an error.
    pub fn run(
        &mut self,
        selection: Selection,
        rebuild: bool,
    ) -> Result<Vec<DeployResult>, AppError> {
        let kinds = self.selected(selection);
        if kinds.is_empty() {
            return Ok(Vec::new());
        }

        let manifest = self.ensure_build(rebuild)?;
        let results = kinds
            .into_iter()
            .map(|kind| self.run_one(kind, &manifest))
            .collect();
        Ok(results)
    }

    fn run_one(&self, kind: TargetKind, manifest: &BuildManifest) -> DeployResult {
        let Some(target) = self.targets.iter().find(|t| t.kind() == kind) else {
            return DeployResult::from_error(
                kind.display_name(),
                &AppError::Config(format!("{} is not available", kind)),
            );
        };

        if !target.probe() {
            let tool = target.tool().map(|t| t.binary()).unwrap_or(target.name());
            tracing::debug!("probe failed for {}", target.name());
            return DeployResult::from_error(
                target.name(),
                &AppError::PrerequisiteMissing {
                    tool: tool.to_string(),
                    hint: install_hint(tool).to_string(),
                },
            );
        }

        ui::info(&format!("Deploying to {}", target.name()));
        let result = target.deploy(manifest, self.config);
        tracing::debug!(target = target.name(), succeeded = result.succeeded, "target finished");
        result
    }

    /// Probes every target and checks the key project files.
    pub fn status(&self) -> Result<StatusReport, AppError> {
        let targets = self.targets.iter().map(|t| (t.kind(), t.probe())).collect();
        let files = KEY_FILES
            .iter()
            .map(|f| (*f, self.source_root.join(f).is_file()))
            .collect();
        let build = BuildStage::new(self.source_root, self.config).existing()?;
        Ok(StatusReport {
            targets,
            files,
            build,
        })
    }
}

/// Renders results as a `Target | Status | Details` table.
/// Only the first line of a multi-line detail is shown.
pub fn render_summary(results: &[DeployResult]) -> Vec<String> {
    let headers = ["Target", "Status", "Details"];
    let rows: Vec<[&str; 3]> = results
        .iter()
        .map(|r| {
            let details = r.details().lines().next().unwrap_or("");
            [r.target.as_str(), r.status_label(), details]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 3]| {
        format!(
            "{:<w0$} | {:<w1$} | {}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1]
        )
        .trim_end()
        .to_string()
    };

    let mut lines = vec![line(headers)];
    lines.push(format!(
        "{}-+-{}-+-{}",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2])
    ));
    lines.extend(rows.into_iter().map(line));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::FailureKind;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::tempdir;

    struct StubTarget {
        kind: TargetKind,
        available: bool,
        fails: bool,
        log: Rc<RefCell<Vec<TargetKind>>>,
    }

    impl DeployTarget for StubTarget {
        fn kind(&self) -> TargetKind {
            self.kind
        }

        fn probe(&self) -> bool {
            self.available
        }

        fn deploy(&self, _manifest: &BuildManifest, _config: &DeployConfig) -> DeployResult {
            self.log.borrow_mut().push(self.kind);
            if self.fails {
                DeployResult::from_error(self.name(), &AppError::Command("exit 1".into()))
            } else {
                DeployResult::success(self.name(), "done")
            }
        }
    }

    fn stubs(
        failing: &[TargetKind],
        missing: &[TargetKind],
        log: &Rc<RefCell<Vec<TargetKind>>>,
    ) -> Vec<Box<dyn DeployTarget>> {
        TargetKind::ALL
            .into_iter()
            .map(|kind| {
                Box::new(StubTarget {
                    kind,
                    available: !missing.contains(&kind),
                    fails: failing.contains(&kind),
                    log: Rc::clone(log),
                }) as Box<dyn DeployTarget>
            })
            .collect()
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<html><head></head></html>").unwrap();
        dir
    }

    #[test]
    fn test_run_all_keeps_going_after_failure() {
        let dir = project();
        let config = DeployConfig::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut orchestrator =
            Orchestrator::new(dir.path(), &config, stubs(&[TargetKind::Netlify], &[], &log));

        let results = orchestrator.run(Selection::All, false).unwrap();

        assert_eq!(results.len(), 5);
        let names: Vec<&str> = results.iter().map(|r| r.target.as_str()).collect();
        assert_eq!(
            names,
            vec!["Vercel", "Netlify", "Docker", "GitHub Pages", "Static package"]
        );
        assert_eq!(results.iter().filter(|r| !r.succeeded).count(), 1);
        assert!(!results[1].succeeded);
        assert!(!log.borrow().contains(&TargetKind::LocalServer));
    }

    #[test]
    fn test_failed_probe_skips_deploy() {
        let dir = project();
        let config = DeployConfig::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut orchestrator =
            Orchestrator::new(dir.path(), &config, stubs(&[], &[TargetKind::Vercel], &log));

        let results = orchestrator
            .run(Selection::Target(TargetKind::Vercel), false)
            .unwrap();

        assert_eq!(results[0].failure, Some(FailureKind::PrerequisiteMissing));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_build_runs_once_across_selections() {
        let dir = project();
        let config = DeployConfig::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut orchestrator = Orchestrator::new(dir.path(), &config, stubs(&[], &[], &log));

        orchestrator.run(Selection::Target(TargetKind::Docker), false).unwrap();
        let marker = dir.path().join("dist/marker.txt");
        fs::write(&marker, "kept").unwrap();
        orchestrator.run(Selection::Target(TargetKind::Vercel), false).unwrap();
        assert!(marker.exists());

        orchestrator.run(Selection::Target(TargetKind::Vercel), true).unwrap();
        assert!(!marker.exists());
    }

    #[test]
    fn test_build_failure_is_returned() {
        let dir = tempdir().unwrap();
        let config = DeployConfig::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut orchestrator = Orchestrator::new(dir.path(), &config, stubs(&[], &[], &log));

        let err = orchestrator.run(Selection::All, false).unwrap_err();
        assert!(matches!(err, AppError::Build(_)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::parse("1"), Some(Selection::Target(TargetKind::Vercel)));
        assert_eq!(Selection::parse("6"), Some(Selection::Target(TargetKind::LocalServer)));
        assert_eq!(Selection::parse("7"), Some(Selection::All));
        assert_eq!(Selection::parse("10"), Some(Selection::Exit));
        assert_eq!(Selection::parse("11"), None);
        assert_eq!(Selection::parse("0"), None);
        assert_eq!(Selection::parse("docker"), Some(Selection::Target(TargetKind::Docker)));
        assert_eq!(Selection::parse(" Q "), Some(Selection::Exit));
    }

    #[test]
    fn test_menu_state_machine() {
        let state = MenuState::Idle.next(MenuEvent::Start);
        assert_eq!(state, MenuState::AwaitingSelection);

        let state = state.next(MenuEvent::Selected(Selection::All));
        assert_eq!(state, MenuState::Running(Selection::All));
        assert_eq!(state.next(MenuEvent::Start), state);

        let state = state.next(MenuEvent::Finished);
        assert_eq!(state, MenuState::ReportingResults);
        let state = state.next(MenuEvent::Acknowledged);
        assert_eq!(state, MenuState::AwaitingSelection);

        assert_eq!(
            state.next(MenuEvent::Selected(Selection::Exit)),
            MenuState::Terminated
        );
    }

    #[test]
    fn test_render_summary() {
        let results = vec![
            DeployResult::success("Docker", "ok").with_url("http://localhost"),
            DeployResult::from_error(
                "Vercel",
                &AppError::PrerequisiteMissing {
                    tool: "vercel".into(),
                    hint: "npm i -g vercel".into(),
                },
            ),
        ];
        let lines = render_summary(&results);

        assert_eq!(lines[0], "Target | Status       | Details");
        assert!(lines[1].starts_with("-------+-"));
        assert_eq!(lines[2], "Docker | ok           | http://localhost");
        assert!(lines[3].starts_with("Vercel | missing tool | "));
    }

    #[test]
    fn test_render_summary_keeps_one_row_per_target() {
        let results = vec![
            DeployResult::from_error(
                "Netlify",
                &AppError::Command("netlify deploy: exit 1\nError: Not logged in\n".into()),
            ),
            DeployResult::success("Static package", "Wrote tower-static.zip"),
        ];
        let lines = render_summary(&results);

        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Netlify"));
        assert!(lines[2].ends_with("exit 1"));
        assert!(!lines[2].contains("Not logged in"));
        assert!(lines[3].starts_with("Static package"));
    }
}
