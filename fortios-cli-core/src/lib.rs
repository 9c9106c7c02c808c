//! Generic FortiOS CLI configuration parsing primitives used by higher-level tools.
//!
//! A `show` dump is a nest of `config <path>` sections holding
//! `edit <key> … next` blocks, each made of `set`/`append`/`unset` lines.
//! This crate splits a dump into blocks and tokenizes their attribute
//! lines. It knows nothing about what any particular attribute means.

pub mod block;
pub mod extract;
pub mod lexer;
pub mod parser;

pub use block::{Attribute, Directive, EditBlock, SetLine};
pub use extract::{blocks, Blocks, RawBlock};
pub use lexer::{tokenize, LexError, Token};
pub use parser::{parse, parse_block, parse_file, ParseError};
