use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::block::{Directive, EditBlock, SetLine};
use crate::extract::{blocks, RawBlock};
use crate::lexer::{lines_from, split_word, tokenize, LexError};

/// Structural errors found while reading a CLI dump.
///
/// Any of these means the document cannot be trusted as a whole.
#[derive(Debug, Error)]
pub enum ParseError {
    /// `edit` without a matching `next` before end of input.
    #[error("line {line} (offset {offset}): `edit {key}` has no matching `next`")]
    UnterminatedBlock {
        key: String,
        line: usize,
        offset: usize,
    },
    /// `edit` encountered while another block is still open.
    #[error("line {line} (offset {offset}): `edit` inside the block opened on line {open_line}")]
    NestedEdit {
        line: usize,
        offset: usize,
        open_line: usize,
    },
    /// `edit` with nothing after it.
    #[error("line {line} (offset {offset}): `edit` without a key")]
    MissingEditKey { line: usize, offset: usize },
    /// A quoted value that never closes.
    #[error("line {line} (offset {offset}): unterminated quote")]
    UnterminatedQuote { line: usize, offset: usize },
    /// Failed to read input file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Byte offset of the offending text, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnterminatedBlock { offset, .. }
            | Self::NestedEdit { offset, .. }
            | Self::MissingEditKey { offset, .. }
            | Self::UnterminatedQuote { offset, .. } => Some(*offset),
            Self::Io(_) => None,
        }
    }
}

/// Parse the attribute lines of one raw block.
///
/// Nested `config … end` sections are skipped; only top-level `set`,
/// `append` and `unset` lines are kept.
pub fn parse_block(raw: &RawBlock<'_>) -> Result<EditBlock, ParseError> {
    let mut iter = lines_from(raw.text, raw.offset, raw.line);
    let begin = iter
        .next()
        .ok_or(ParseError::MissingEditKey {
            line: raw.line,
            offset: raw.offset,
        })?;
    let (_, key_text, key_offset) = begin.split_word();
    let key = tokenize(key_text, key_offset).map_err(|err| lex_error(err, begin.number))?;

    let mut settings = Vec::new();
    let mut depth = 0usize;
    for line in iter {
        let (word, rest, rest_offset) = line.split_word();
        match word {
            "config" => {
                depth += 1;
                continue;
            }
            "end" => {
                depth = depth.saturating_sub(1);
                continue;
            }
            _ if depth > 0 => continue,
            _ => {}
        }

        let Some(directive) = Directive::from_word(word) else {
            continue;
        };
        let (attr, values, values_offset) = split_word(rest, rest_offset);
        if attr.is_empty() {
            continue;
        }
        let values = tokenize(values, values_offset).map_err(|err| lex_error(err, line.number))?;
        settings.push(SetLine {
            directive,
            attr: attr.to_string(),
            values,
            offset: line.offset,
            line: line.number,
        });
    }

    Ok(EditBlock {
        key,
        offset: raw.offset,
        line: raw.line,
        settings,
    })
}

/// Parse every block of a CLI dump.
///
/// Fails on the first structural error; no partial result is returned.
pub fn parse(input: &str) -> Result<Vec<EditBlock>, ParseError> {
    blocks(input)
        .map(|raw| raw.and_then(|raw| parse_block(&raw)))
        .collect()
}

/// Read and parse a CLI dump from disk.
pub fn parse_file(path: &Path) -> Result<Vec<EditBlock>, ParseError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

fn lex_error(err: LexError, line: usize) -> ParseError {
    match err {
        LexError::UnterminatedQuote { offset } => ParseError::UnterminatedQuote { line, offset },
    }
}
