use super::Frame;
use console::{style, Key};
use std::io;

/// A Yes/No question answered on a single boxed row.
///
/// `y` and `n` answer immediately. The arrow keys and Tab move between the
/// two choices and Enter accepts the highlighted one.
pub struct Confirm<'a> {
    prompt: &'a str,
    default: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Toggle,
    Answer(bool),
    Accept,
    Ignore,
}

fn action(key: &Key) -> Action {
    match key {
        Key::Char('y' | 'Y') => Action::Answer(true),
        Key::Char('n' | 'N') => Action::Answer(false),
        Key::Enter => Action::Accept,
        Key::ArrowLeft | Key::ArrowRight | Key::Tab | Key::BackTab => Action::Toggle,
        Key::Char('h' | 'l') => Action::Toggle,
        _ => Action::Ignore,
    }
}

/// The choice row. Once answered only the chosen value is shown.
fn choices(current: bool, answered: bool) -> String {
    if answered {
        let answer = if current { "Yes" } else { "No" };
        return format!(" {} {}", style("●").cyan(), style(answer).cyan());
    }

    let choice = |label: &str, active: bool| {
        if active {
            style(format!("› {}", label)).cyan().bold().to_string()
        } else {
            style(format!("  {}", label)).dim().to_string()
        }
    };
    format!(
        " {}   {}   {}",
        choice("Yes", current),
        choice("No", !current),
        style("(y/n)").dim()
    )
}

impl<'a> Confirm<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            default: true,
        }
    }

    pub fn default(mut self, value: bool) -> Self {
        self.default = value;
        self
    }

    pub fn run(self) -> io::Result<bool> {
        let frame = Frame::open()?;
        let mut current = self.default;

        frame.top(self.prompt)?;
        frame.row(&choices(current, false))?;
        frame.bottom()?;

        loop {
            match action(&frame.key()?) {
                Action::Toggle => current = !current,
                Action::Answer(answer) => {
                    current = answer;
                    break;
                }
                Action::Accept => break,
                Action::Ignore => continue,
            }
            frame.up(2)?;
            frame.row(&choices(current, false))?;
            frame.down(1)?;
        }

        frame.up(2)?;
        frame.row(&choices(current, true))?;
        frame.down(1)?;
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_actions() {
        assert_eq!(action(&Key::Char('Y')), Action::Answer(true));
        assert_eq!(action(&Key::Char('n')), Action::Answer(false));
        assert_eq!(action(&Key::Enter), Action::Accept);
        assert_eq!(action(&Key::Tab), Action::Toggle);
        assert_eq!(action(&Key::Char('q')), Action::Ignore);
    }

    #[test]
    fn test_choice_row_highlights_current() {
        let open = console::strip_ansi_codes(&choices(false, false)).to_string();
        assert_eq!(open, "   Yes   › No   (y/n)");

        let answered = console::strip_ansi_codes(&choices(true, true)).to_string();
        assert_eq!(answered, " ● Yes");
    }
}
