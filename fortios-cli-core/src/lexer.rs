//! Line splitting and quote-aware value tokenization.
//!
//! FortiOS prints every attribute on its own line as `set <attr> <values>`,
//! where each value is either a bare word or a double-quoted string. Quoted
//! strings may contain spaces and backslash escapes (`\"`, `\\`).

use serde::Serialize;
use thiserror::Error;

/// One trimmed, non-empty logical line of input.
///
/// Usually a single physical line; a quoted value may carry it further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line text without leading/trailing whitespace.
    pub text: &'a str,
    /// Byte offset of `text` within the whole document.
    pub offset: usize,
    /// Byte offset just past the line terminator.
    pub end: usize,
    /// 1-based number of the first physical line.
    pub number: usize,
}

impl<'a> Line<'a> {
    /// Split off the first whitespace-delimited word.
    ///
    /// Returns the word and the remainder along with the remainder's
    /// absolute byte offset.
    pub fn split_word(&self) -> (&'a str, &'a str, usize) {
        split_word(self.text, self.offset)
    }
}

/// Split `text` (located at absolute `offset`) into its first word and the
/// remainder, returning the remainder's absolute offset.
pub fn split_word(text: &str, offset: usize) -> (&str, &str, usize) {
    match text.find(char::is_whitespace) {
        Some(idx) => {
            let rest = &text[idx..];
            let trimmed = rest.trim_start();
            let skipped = rest.len() - trimmed.len();
            (&text[..idx], trimmed, offset + idx + skipped)
        }
        None => (text, "", offset + text.len()),
    }
}

/// Iterator over non-blank logical lines, tracking byte offsets and line
/// numbers.
///
/// A double-quoted value that is still open at the end of a physical line
/// continues onto the following lines, as FortiOS prints multi-line
/// `comments`. If the quote never closes, the physical line is returned on
/// its own so the tokenizer can report it.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    input: &'a str,
    pos: usize,
    number: usize,
    base_offset: usize,
}

/// Iterate the non-blank lines of `input`.
pub fn lines(input: &str) -> Lines<'_> {
    lines_from(input, 0, 1)
}

/// Iterate lines of a slice that starts at `base_offset`/`first_line` in a
/// larger document, so reported positions stay absolute.
pub fn lines_from(input: &str, base_offset: usize, first_line: usize) -> Lines<'_> {
    Lines {
        input,
        pos: 0,
        number: first_line.saturating_sub(1),
        base_offset,
    }
}

/// Byte length of the logical line at the start of `rest`, terminator
/// included.
fn logical_line_len(rest: &str) -> usize {
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, ch) in rest.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '\n' if !in_quote => return idx + 1,
            _ => {}
        }
    }
    if in_quote {
        return rest.find('\n').map_or(rest.len(), |idx| idx + 1);
    }
    rest.len()
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.input.len() {
            let rest = &self.input[self.pos..];
            let consumed = logical_line_len(rest);
            let raw = rest[..consumed].strip_suffix('\n').unwrap_or(&rest[..consumed]);
            let start = self.pos;
            let number = self.number + 1;
            self.pos += consumed;
            self.number += raw.matches('\n').count() + 1;

            let trimmed_start = raw.trim_start();
            let text = trimmed_start.trim_end();
            if text.is_empty() {
                continue;
            }
            let lead = raw.len() - trimmed_start.len();
            return Some(Line {
                text,
                offset: self.base_offset + start + lead,
                end: self.base_offset + self.pos,
                number,
            });
        }
        None
    }
}

/// A single value token from a `set` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Source text exactly as written, quotes and escapes included.
    pub raw: String,
    /// Value with quotes removed and escapes resolved.
    pub value: String,
    /// Whether the token was double-quoted in the source.
    pub quoted: bool,
    /// Absolute byte offset of the token start.
    pub offset: usize,
}

impl Token {
    /// Build a quoted token from a plain value, escaping as FortiOS would.
    pub fn quoted(value: &str) -> Self {
        let mut raw = String::with_capacity(value.len() + 2);
        raw.push('"');
        for ch in value.chars() {
            if ch == '"' || ch == '\\' {
                raw.push('\\');
            }
            raw.push(ch);
        }
        raw.push('"');
        Self {
            raw,
            value: value.to_string(),
            quoted: true,
            offset: 0,
        }
    }

    /// Render the token in quoted form, quoting bare words if needed.
    pub fn to_quoted(&self) -> String {
        if self.quoted {
            self.raw.clone()
        } else {
            Token::quoted(&self.value).raw
        }
    }
}

/// Errors raised while splitting a value list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A double quote was opened but never closed.
    #[error("unterminated quote starting at offset {offset}")]
    UnterminatedQuote { offset: usize },
}

/// Split a value list into tokens, respecting quote boundaries.
///
/// `base_offset` is the absolute offset of `input` within the document.
pub fn tokenize(input: &str, base_offset: usize) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed_at = None;
            while let Some((idx, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => {
                        closed_at = Some(idx);
                        break;
                    }
                    other => value.push(other),
                }
            }
            let end = closed_at.ok_or(LexError::UnterminatedQuote {
                offset: base_offset + start,
            })?;
            tokens.push(Token {
                raw: input[start..=end].to_string(),
                value,
                quoted: true,
                offset: base_offset + start,
            });
            continue;
        }

        let mut end = input.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c.is_whitespace() {
                end = idx;
                break;
            }
            chars.next();
        }
        let word = &input[start..end];
        tokens.push(Token {
            raw: word.to_string(),
            value: word.to_string(),
            quoted: false,
            offset: base_offset + start,
        });
    }

    Ok(tokens)
}
