use super::{Frame, INNER_WIDTH};
use console::{style, Key};
use std::io;

/// A single-line boxed text field.
///
/// The cursor position is counted in characters. Long values scroll so the
/// cursor always stays visible.
pub struct TextInput<'a> {
    prompt: &'a str,
    placeholder: Option<&'a str>,
    digits_only: bool,
    max_len: Option<usize>,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            prompt,
            placeholder: None,
            digits_only: false,
            max_len: None,
        }
    }

    /// Dimmed text shown while the field is empty.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Ignores every key except ASCII digits.
    pub fn digits_only(mut self) -> Self {
        self.digits_only = true;
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    fn accepts(&self, len: usize, c: char) -> bool {
        if self.digits_only && !c.is_ascii_digit() {
            return false;
        }
        !c.is_control() && self.max_len.map_or(true, |max| len < max)
    }

    /// Runs the prompt and returns what was typed.
    pub fn run(self) -> io::Result<String> {
        let frame = Frame::open()?;
        let mut chars: Vec<char> = Vec::new();
        let mut cursor = 0usize;

        frame.top(self.prompt)?;
        frame.row(&self.field(&chars, Some(cursor)))?;
        frame.bottom()?;

        loop {
            frame.up(2)?;
            frame.row(&self.field(&chars, Some(cursor)))?;
            frame.down(1)?;

            match frame.key()? {
                Key::Enter => break,
                Key::Escape => {
                    chars.clear();
                    cursor = 0;
                }
                Key::Char(c) if self.accepts(chars.len(), c) => {
                    chars.insert(cursor, c);
                    cursor += 1;
                }
                Key::Backspace if cursor > 0 => {
                    cursor -= 1;
                    chars.remove(cursor);
                }
                Key::Del if cursor < chars.len() => {
                    chars.remove(cursor);
                }
                Key::ArrowLeft => cursor = cursor.saturating_sub(1),
                Key::ArrowRight => cursor = (cursor + 1).min(chars.len()),
                Key::Home => cursor = 0,
                Key::End => cursor = chars.len(),
                _ => {}
            }
        }

        frame.up(2)?;
        frame.row(&self.field(&chars, None))?;
        frame.down(1)?;

        Ok(chars.into_iter().collect())
    }

    /// Renders the field contents. `cursor` is `None` once editing is over.
    fn field(&self, chars: &[char], cursor: Option<usize>) -> String {
        // One leading space and one cell reserved for a trailing cursor.
        let width = INNER_WIDTH - 2;
        let mut line = String::from(" ");

        if chars.is_empty() {
            let placeholder = self.placeholder.unwrap_or("");
            let skip = if cursor.is_some() {
                line.push_str(&style(" ").reverse().to_string());
                1
            } else {
                0
            };
            let rest: String = placeholder.chars().skip(skip).take(width - skip).collect();
            line.push_str(&style(rest).dim().to_string());
        } else {
            let offset = match cursor {
                Some(pos) if pos >= width => pos + 1 - width,
                _ => 0,
            };
            for (i, c) in chars.iter().enumerate().skip(offset).take(width) {
                if cursor == Some(i) {
                    line.push_str(&style(c.to_string()).reverse().to_string());
                } else {
                    line.push(*c);
                }
            }
            if cursor == Some(chars.len()) {
                line.push_str(&style(" ").reverse().to_string());
            }
        }

        line
    }
}
