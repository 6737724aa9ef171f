//! Scripted command runner used by unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::context::{CommandOutput, CommandRunner};
use crate::core::error::AppError;
use crate::providers::tools::install_hint;

/// A recorded invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub dir: Option<PathBuf>,
    pub line: String,
}

/// Fake [`CommandRunner`] returning scripted outputs.
///
/// Responses are matched by command-line prefix, first match wins. A matching
/// response is consumed when registered with [`ScriptedRunner::once`].
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: RefCell<Vec<Scripted>>,
    missing: HashSet<String>,
    calls: RefCell<Vec<Invocation>>,
}

struct Scripted {
    prefix: String,
    output: CommandOutput,
    once: bool,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command starting with `prefix` returns `output`.
    pub fn on(self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.borrow_mut().push(Scripted {
            prefix: prefix.to_string(),
            output,
            once: false,
        });
        self
    }

    /// The next command starting with `prefix` returns `output`.
    pub fn once(self, prefix: &str, output: CommandOutput) -> Self {
        self.responses.borrow_mut().push(Scripted {
            prefix: prefix.to_string(),
            output,
            once: true,
        });
        self
    }

    /// Pretends `binary` is not installed.
    pub fn missing(mut self, binary: &str) -> Self {
        self.missing.insert(binary.to_string());
        self
    }

    /// Command lines executed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.line.clone()).collect()
    }

    /// Full invocations executed so far.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Index of the first call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.line.starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_in(
        &self,
        dir: Option<&Path>,
        cmd: &str,
        args: &[&str],
    ) -> Result<CommandOutput, AppError> {
        let line = if args.is_empty() {
            cmd.to_string()
        } else {
            format!("{} {}", cmd, args.join(" "))
        };
        self.calls.borrow_mut().push(Invocation {
            dir: dir.map(Path::to_path_buf),
            line: line.clone(),
        });

        if self.missing.contains(cmd) {
            return Err(AppError::PrerequisiteMissing {
                tool: cmd.to_string(),
                hint: install_hint(cmd).to_string(),
            });
        }

        let mut responses = self.responses.borrow_mut();
        if let Some(index) = responses.iter().position(|r| line.starts_with(&r.prefix)) {
            let output = responses[index].output.clone();
            if responses[index].once {
                responses.remove(index);
            }
            return Ok(output);
        }

        Ok(CommandOutput::ok(""))
    }
}
