//! Dump-to-artifacts conversion orchestration.
//!
//! ## Pipeline
//!
//! 1. **Extract & tokenize**: split the dump into `edit … next` blocks and
//!    tokenize every block. Any structural error aborts here, before a
//!    single record is built, so callers never see partial output.
//! 2. **Build records**: validate each block into a [`PolicyRecord`]. A
//!    failing block becomes an error [`Finding`] and is skipped.
//! 3. **Check IDs**: a repeated policy ID keeps the first occurrence.
//! 4. **Resolve identifiers**: assign resource identifiers through the
//!    [`IdentifierRegistry`], applying the configured collision policy.
//! 5. **Emit**: the resulting [`Conversion`] drives both emitters, in
//!    document order, into caller-supplied sinks.

use std::collections::BTreeMap;
use std::io::{self, Write};

use fortios_cli_core::{blocks, parse_block, EditBlock, ParseError};
use serde::Serialize;
use tracing::{debug, warn};

use crate::emit::{Emit, ImportEmitter, ResourceEmitter};
use crate::identifier::is_valid_identifier;
use crate::policy::{PolicyRecord, PolicyRef, RecordError};
use crate::registry::{CollisionPolicy, IdentifierRegistry, Registration, ResolvedPolicy};
use crate::summary::ConversionSummary;

/// Tunables for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub collision: CollisionPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The block was skipped.
    Error,
    /// The block was converted, but needs a look.
    Warning,
}

/// A per-record problem reported back to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub policy: PolicyRef,
    pub code: &'static str,
    pub message: String,
}

impl From<&RecordError> for Finding {
    fn from(err: &RecordError) -> Self {
        Self {
            severity: Severity::Error,
            policy: err.policy(),
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Result of converting one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversion {
    /// Number of `edit … next` blocks found.
    pub blocks: usize,
    /// Converted policies in document order.
    pub policies: Vec<ResolvedPolicy>,
    /// Errors and warnings in document order.
    pub findings: Vec<Finding>,
}

impl Conversion {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Write import directives for every converted policy.
    pub fn write_imports(&self, out: &mut dyn Write, emitter: &ImportEmitter) -> io::Result<()> {
        emitter.emit(out, &self.policies)
    }

    /// Write resource declarations for every converted policy.
    pub fn write_resources(&self, out: &mut dyn Write) -> io::Result<()> {
        ResourceEmitter.emit(out, &self.policies)
    }

    pub fn summary(&self) -> ConversionSummary {
        ConversionSummary {
            blocks: self.blocks,
            converted: self.policies.len(),
            failed: self.errors().count(),
            warnings: self.warnings().count(),
        }
    }
}

/// Convert a `show firewall policy` dump.
///
/// # Errors
///
/// Returns a [`ParseError`] if the document is structurally broken
/// (unterminated block, nested `edit`, unterminated quote). Per-record
/// problems never fail the call; they are collected as findings.
pub fn convert(input: &str, options: &ConvertOptions) -> Result<Conversion, ParseError> {
    let parsed = blocks(input)
        .map(|raw| raw.and_then(|raw| parse_block(&raw)))
        .collect::<Result<Vec<EditBlock>, ParseError>>()?;
    debug!(blocks = parsed.len(), "extracted policy blocks");

    let mut conversion = Conversion {
        blocks: parsed.len(),
        ..Conversion::default()
    };
    let mut seen_ids: BTreeMap<u32, usize> = BTreeMap::new();
    let mut registry = IdentifierRegistry::new(options.collision);

    for block in &parsed {
        let record = match PolicyRecord::from_block(block) {
            Ok(record) => record,
            Err(err) => {
                reject(&mut conversion, &err);
                continue;
            }
        };

        if let Some(&first_line) = seen_ids.get(&record.id()) {
            let err = RecordError::DuplicateId {
                id: record.id(),
                line: record.line(),
                first_line,
            };
            reject(&mut conversion, &err);
            continue;
        }
        seen_ids.insert(record.id(), record.line());

        let resolved = match registry.register(record) {
            Ok(Registration::Assigned(resolved)) => resolved,
            Ok(Registration::Renamed {
                resolved,
                wanted,
                existing,
            }) => {
                let message = format!(
                    "policy {}: identifier `{wanted}` already used by policy {existing}; using `{}`",
                    resolved.record.id(),
                    resolved.identifier
                );
                warn!(policy = resolved.record.id(), "{message}");
                conversion.findings.push(Finding {
                    severity: Severity::Warning,
                    policy: PolicyRef::Id(resolved.record.id()),
                    code: "identifier_collision",
                    message,
                });
                resolved
            }
            Err(err) => {
                reject(&mut conversion, &err);
                continue;
            }
        };

        if !is_valid_identifier(&resolved.identifier) {
            let message = format!(
                "policy {}: `{}` is not a valid Terraform identifier; rename the policy or edit the output",
                resolved.record.id(),
                resolved.identifier
            );
            warn!(policy = resolved.record.id(), "{message}");
            conversion.findings.push(Finding {
                severity: Severity::Warning,
                policy: PolicyRef::Id(resolved.record.id()),
                code: "invalid_identifier",
                message,
            });
        }

        debug!(
            policy = resolved.record.id(),
            identifier = %resolved.identifier,
            "converted policy"
        );
        conversion.policies.push(resolved);
    }

    Ok(conversion)
}

fn reject(conversion: &mut Conversion, err: &RecordError) {
    debug!(code = err.code(), "skipping block: {err}");
    conversion.findings.push(Finding::from(err));
}
