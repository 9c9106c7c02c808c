//! Structural segmentation of a CLI dump into `edit … next` blocks.

use crate::lexer::{lines, Line, Lines};
use crate::parser::ParseError;

/// The borrowed source text of one `edit … next` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Text from the start of the `edit` line through the `next` line.
    pub text: &'a str,
    /// Everything after `edit` on the begin line.
    pub key: &'a str,
    /// Absolute byte offset of the `edit` keyword.
    pub offset: usize,
    /// 1-based line number of the `edit` line.
    pub line: usize,
}

/// Lazy iterator over the blocks of a document.
///
/// Cloning the iterator restarts from the same position. After the first
/// structural error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    input: &'a str,
    lines: Lines<'a>,
    failed: bool,
}

/// Extract the `edit … next` blocks of `input` in document order.
///
/// Lines outside blocks (`config`, `end`, prompts) are skipped. Inside a
/// block, nested `config … end` sections are tracked so their own
/// `edit`/`next` pairs do not close the outer block.
pub fn blocks(input: &str) -> Blocks<'_> {
    Blocks {
        input,
        lines: lines(input),
        failed: false,
    }
}

impl<'a> Blocks<'a> {
    fn read_block(&mut self, begin: Line<'a>) -> Result<RawBlock<'a>, ParseError> {
        let (_, key, _) = begin.split_word();
        if key.is_empty() {
            return Err(ParseError::MissingEditKey {
                line: begin.number,
                offset: begin.offset,
            });
        }

        let unterminated = || ParseError::UnterminatedBlock {
            key: key.to_string(),
            line: begin.number,
            offset: begin.offset,
        };

        let mut depth = 0usize;
        for line in self.lines.by_ref() {
            let (word, _, _) = line.split_word();
            match word {
                "config" => depth += 1,
                "end" if depth > 0 => depth -= 1,
                // The enclosing `config` section closed before `next`.
                "end" => return Err(unterminated()),
                "edit" if depth == 0 => {
                    return Err(ParseError::NestedEdit {
                        line: line.number,
                        offset: line.offset,
                        open_line: begin.number,
                    });
                }
                "next" if depth == 0 => {
                    return Ok(RawBlock {
                        text: &self.input[begin.offset..line.end],
                        key,
                        offset: begin.offset,
                        line: begin.number,
                    });
                }
                _ => {}
            }
        }

        Err(unterminated())
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<RawBlock<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = self.lines.next()?;
            let (word, _, _) = line.split_word();
            if word != "edit" {
                continue;
            }
            let result = self.read_block(line);
            if result.is_err() {
                self.failed = true;
            }
            return Some(result);
        }
    }
}
