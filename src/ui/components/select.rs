use super::Frame;
use console::{style, Key};
use std::io;

/// A boxed list the user moves through with the arrow keys.
///
/// With [`Select::numbered`] each entry is prefixed by its 1-based number
/// and typing that digit jumps straight to it.
pub struct Select<'a, T: AsRef<str>> {
    prompt: &'a str,
    items: &'a [T],
    default: usize,
    numbered: bool,
}

impl<'a, T: AsRef<str>> Select<'a, T> {
    pub fn new(prompt: &'a str, items: &'a [T]) -> Self {
        Self {
            prompt,
            items,
            default: 0,
            numbered: false,
        }
    }

    /// Sets the initially highlighted index.
    pub fn default(mut self, index: usize) -> Self {
        self.default = index.min(self.items.len().saturating_sub(1));
        self
    }

    pub fn numbered(mut self) -> Self {
        self.numbered = true;
        self
    }

    /// Runs the prompt and returns the chosen index.
    pub fn run(self) -> io::Result<usize> {
        if self.items.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "nothing to select"));
        }

        let frame = Frame::open()?;
        let count = self.items.len();
        let total_lines = count + 2;
        let mut selected = self.default;

        self.draw(&frame, selected, false)?;

        loop {
            let next = match frame.key()? {
                Key::Enter => break,
                Key::ArrowUp | Key::Char('k') => (selected + count - 1) % count,
                Key::ArrowDown | Key::Char('j') | Key::Tab => (selected + 1) % count,
                Key::Home => 0,
                Key::End => count - 1,
                Key::Char(c) if self.numbered => match shortcut(c, count) {
                    Some(index) => index,
                    None => continue,
                },
                _ => continue,
            };
            if next != selected {
                selected = next;
                frame.up(total_lines)?;
                self.draw(&frame, selected, false)?;
            }
        }

        // Collapse to the chosen entry and wipe the rows left below it.
        frame.up(total_lines)?;
        self.draw(&frame, selected, true)?;
        for _ in 1..count {
            frame.blank()?;
        }
        if count > 1 {
            frame.up(count - 1)?;
        }

        Ok(selected)
    }

    fn draw(&self, frame: &Frame, selected: usize, collapsed: bool) -> io::Result<()> {
        frame.top(self.prompt)?;
        if collapsed {
            frame.row(&self.item(selected, true, true))?;
        } else {
            for index in 0..self.items.len() {
                frame.row(&self.item(index, index == selected, false))?;
            }
        }
        frame.bottom()
    }

    fn item(&self, index: usize, active: bool, chosen: bool) -> String {
        let label = self.items[index].as_ref();
        let number = if self.numbered {
            format!("{:>2}. ", index + 1)
        } else {
            String::new()
        };
        let marker = match (active, chosen) {
            (true, true) => "› ●",
            (true, false) => "› ○",
            (false, _) => "  ○",
        };

        let text = format!("{}{}", number, label);
        if active {
            format!("{} {}", style(marker).cyan(), style(&text).cyan())
        } else {
            format!("{} {}", style(marker).dim(), style(&text).dim())
        }
    }
}

/// Maps a typed digit to an item index; `0` stands for the tenth item.
fn shortcut(c: char, count: usize) -> Option<usize> {
    let digit = c.to_digit(10)? as usize;
    let index = if digit == 0 { 9 } else { digit - 1 };
    (index < count).then_some(index)
}
