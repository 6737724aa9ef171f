use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use console::{style, Term};

static TO_STDERR: AtomicBool = AtomicBool::new(false);

/// Sends all status output to stderr, leaving stdout for machine output.
pub fn use_stderr(enabled: bool) {
    TO_STDERR.store(enabled, Ordering::Relaxed);
}

fn emit(line: String) {
    if TO_STDERR.load(Ordering::Relaxed) {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Prints `line` unstyled on the status stream.
pub fn plain(line: &str) {
    emit(line.to_string());
}

/// Writes `text` without a newline on the status stream and flushes it.
pub fn prompt(text: &str) -> io::Result<()> {
    if TO_STDERR.load(Ordering::Relaxed) {
        let mut err = io::stderr().lock();
        write!(err, "{} ", text)?;
        err.flush()
    } else {
        let mut out = io::stdout().lock();
        write!(out, "{} ", text)?;
        out.flush()
    }
}

const ASCII_HEADER: &str = r#"
        _         _            _
 __   _(_)____ __| | ___ _ __ | | ___  _   _
 \ \ / / |_  // _` |/ _ \ '_ \| |/ _ \| | | |
  \ V /| |/ /| (_| |  __/ |_) | | (_) | |_| |
   \_/ |_/___|\__,_|\___| .__/|_|\___/ \__, |
                        |_|            |___/
"#;

/// Prints the ASCII art banner.
pub fn header() {
    let term = Term::stdout();
    let _ = term.write_line(&style(ASCII_HEADER).cyan().to_string());
}

/// Prints a bold section title preceded by a blank line.
pub fn section(title: &str) {
    emit(String::new());
    emit(style(title).bold().to_string());
}

/// Prints a success message with a green checkmark.
pub fn success(message: &str) {
    emit(format!("{} {}", style("✓").green(), message));
}

/// Prints an error message with a red cross.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Prints a warning message in yellow.
pub fn warning(message: &str) {
    emit(format!("{} {}", style("!").yellow(), message));
}

/// Prints an info message with an arrow.
pub fn info(message: &str) {
    emit(format!("{} {}", style("→").cyan(), message));
}

/// Prints a URL in cyan and bold.
pub fn url(url: &str) {
    emit(format!("{} {}", style("→").cyan(), style(url).cyan().bold()));
}

/// Prints an error with a hint for resolution.
pub fn error_with_hint(message: &str, hint: &str) {
    eprintln!("{} {}", style("✗").red(), message);
    eprintln!("  {} {}", style("→").dim(), hint);
}
