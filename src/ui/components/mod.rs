mod confirm;
mod select;
mod text_input;

pub use confirm::Confirm;
pub use select::Select;
pub use text_input::TextInput;

use console::{measure_text_width, style, Key, Term};
use std::io;

/// Width between the two side borders of every box.
pub const INNER_WIDTH: usize = 54;

fn top_border(label: &str) -> String {
    let label = format!(" {} ", label);
    let fill = INNER_WIDTH.saturating_sub(measure_text_width(&label));
    format!(
        "{}{}{}",
        style("┌").dim(),
        style(&label).cyan(),
        style(format!("{}┐", "─".repeat(fill))).dim()
    )
}

fn bottom_border() -> String {
    style(format!("└{}┘", "─".repeat(INNER_WIDTH))).dim().to_string()
}

/// Pads `content` to the box width. Escape sequences do not count.
fn row(content: &str) -> String {
    let pad = INNER_WIDTH.saturating_sub(measure_text_width(content));
    let side = style("│").dim();
    format!("{}{}{}{}", side, content, " ".repeat(pad), side)
}

/// A boxed prompt drawn on stdout.
///
/// The cursor is hidden while the frame is alive and restored on drop.
pub(crate) struct Frame {
    term: Term,
}

impl Frame {
    pub fn open() -> io::Result<Self> {
        let term = Term::stdout();
        term.hide_cursor()?;
        Ok(Self { term })
    }

    pub fn top(&self, label: &str) -> io::Result<()> {
        self.term.clear_line()?;
        self.term.write_line(&top_border(label))
    }

    pub fn bottom(&self) -> io::Result<()> {
        self.term.clear_line()?;
        self.term.write_line(&bottom_border())
    }

    pub fn row(&self, content: &str) -> io::Result<()> {
        self.term.clear_line()?;
        self.term.write_line(&row(content))
    }

    pub fn blank(&self) -> io::Result<()> {
        self.term.clear_line()?;
        self.term.write_line("")
    }

    pub fn up(&self, lines: usize) -> io::Result<()> {
        self.term.move_cursor_up(lines)
    }

    pub fn down(&self, lines: usize) -> io::Result<()> {
        self.term.move_cursor_down(lines)
    }

    pub fn key(&self) -> io::Result<Key> {
        self.term.read_key()
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Err(e) = self.term.show_cursor() {
            tracing::debug!("failed to restore cursor: {}", e);
        }
    }
}
