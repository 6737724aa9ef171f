pub mod components;
pub mod output;
pub mod progress;

pub use components::{Confirm, Select, TextInput};
pub use output::{error, error_with_hint, header, info, section, success, url, warning};
pub use progress::ProgressBar;

use std::io::{self, BufRead};

/// Whether boxed prompts can be used. Piped input falls back to plain lines.
pub fn interactive() -> bool {
    console::user_attended()
}

/// Prints `prompt` and reads one line from stdin.
/// Returns `None` at end of input.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    output::prompt(prompt)?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts for text, returning `default` when nothing is entered.
pub fn input_with_default(prompt: &str, default: &str) -> io::Result<String> {
    let entered = if interactive() {
        let mut input = TextInput::new(prompt);
        if !default.is_empty() {
            input = input.placeholder(default);
        }
        input.run()?
    } else {
        read_line(&format!("{} [{}]:", prompt, default))?.unwrap_or_default()
    };

    if entered.trim().is_empty() {
        Ok(default.to_string())
    } else {
        Ok(entered)
    }
}

/// Prompts for a port number, digits only.
pub fn port_input(prompt: &str, default: u16) -> io::Result<String> {
    let default = default.to_string();
    if !interactive() {
        return input_with_default(prompt, &default);
    }
    let entered = TextInput::new(prompt)
        .placeholder(&default)
        .digits_only()
        .max_len(5)
        .run()?;
    Ok(if entered.is_empty() { default } else { entered })
}

/// Numbered selection from a list.
pub fn select<T: AsRef<str>>(prompt: &str, items: &[T]) -> io::Result<usize> {
    Select::new(prompt, items).numbered().run()
}

/// Yes/No question. Without a terminal only `y`/`yes` counts as yes.
pub fn confirm(prompt: &str, default: bool) -> io::Result<bool> {
    if interactive() {
        return Confirm::new(prompt).default(default).run();
    }

    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    Ok(match read_line(&format!("{} {}", prompt, suffix))? {
        Some(answer) if answer.is_empty() => default,
        Some(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
        None => false,
    })
}
