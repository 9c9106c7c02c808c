//! Firewall policy records built from parsed `edit … next` blocks.
//!
//! A record is validated once, when it is built: the ID must be a positive
//! integer, `name` must be a single value, and all five multi-value fields
//! must be present with at least one quoted entry each. Anything else is a
//! [`RecordError`] that skips this one block without affecting the others.

use std::fmt::{self, Display, Formatter};

use fortios_cli_core::{EditBlock, Token};
use serde::Serialize;
use thiserror::Error;

use crate::identifier::normalize;

/// The multi-valued policy attributes, in canonical rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    SrcIntf,
    SrcAddr,
    DstIntf,
    DstAddr,
    Service,
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::SrcIntf,
        FieldKind::SrcAddr,
        FieldKind::DstIntf,
        FieldKind::DstAddr,
        FieldKind::Service,
    ];

    /// Attribute name as used by both the CLI and the Terraform provider.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::SrcIntf => "srcintf",
            FieldKind::SrcAddr => "srcaddr",
            FieldKind::DstIntf => "dstintf",
            FieldKind::DstAddr => "dstaddr",
            FieldKind::Service => "service",
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an error refers to the block it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRef {
    Id(u32),
    Block { line: usize, offset: usize },
}

impl Display for PolicyRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PolicyRef::Id(id) => write!(f, "policy {id}"),
            PolicyRef::Block { line, offset } => {
                write!(f, "block at line {line} (offset {offset})")
            }
        }
    }
}

/// Per-record failures. The record is skipped; the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{policy}: missing required field `{field}`")]
    MissingField {
        policy: PolicyRef,
        field: &'static str,
    },
    #[error("{policy}: malformed `{field}` on line {line}: {reason}")]
    MalformedField {
        policy: PolicyRef,
        field: &'static str,
        line: usize,
        reason: String,
    },
    #[error("{policy}: `edit {key}` is not a positive policy ID")]
    InvalidId { policy: PolicyRef, key: String },
    #[error("policy {id}: duplicate policy ID on line {line} (first defined on line {first_line})")]
    DuplicateId {
        id: u32,
        line: usize,
        first_line: usize,
    },
    #[error("{policy}: resource identifier `{identifier}` is already used by policy {existing}")]
    IdentifierCollision {
        policy: PolicyRef,
        identifier: String,
        existing: u32,
    },
}

impl RecordError {
    /// The block the error refers to.
    pub fn policy(&self) -> PolicyRef {
        match self {
            RecordError::MissingField { policy, .. }
            | RecordError::MalformedField { policy, .. }
            | RecordError::InvalidId { policy, .. }
            | RecordError::IdentifierCollision { policy, .. } => *policy,
            RecordError::DuplicateId { id, .. } => PolicyRef::Id(*id),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::MissingField { .. } => "field_missing",
            RecordError::MalformedField { .. } => "malformed_field",
            RecordError::InvalidId { .. } => "invalid_id",
            RecordError::DuplicateId { .. } => "duplicate_id",
            RecordError::IdentifierCollision { .. } => "identifier_collision",
        }
    }
}

/// The five multi-valued attributes of a policy, each non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiValueFields {
    pub srcintf: Vec<Token>,
    pub srcaddr: Vec<Token>,
    pub dstintf: Vec<Token>,
    pub dstaddr: Vec<Token>,
    pub service: Vec<Token>,
}

impl MultiValueFields {
    pub fn get(&self, kind: FieldKind) -> &[Token] {
        match kind {
            FieldKind::SrcIntf => &self.srcintf,
            FieldKind::SrcAddr => &self.srcaddr,
            FieldKind::DstIntf => &self.dstintf,
            FieldKind::DstAddr => &self.dstaddr,
            FieldKind::Service => &self.service,
        }
    }

    /// Fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldKind, &[Token])> + '_ {
        FieldKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }
}

/// One firewall policy, validated and immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRecord {
    id: u32,
    name: Token,
    fields: MultiValueFields,
    line: usize,
}

impl PolicyRecord {
    /// Build a record from a parsed block, failing on the first missing or
    /// malformed field.
    pub fn from_block(block: &EditBlock) -> Result<Self, RecordError> {
        let id = policy_id(block)?;
        let policy = PolicyRef::Id(id);
        let name = scalar_name(block, policy)?;

        let fields = MultiValueFields {
            srcintf: list_field(block, policy, FieldKind::SrcIntf)?,
            srcaddr: list_field(block, policy, FieldKind::SrcAddr)?,
            dstintf: list_field(block, policy, FieldKind::DstIntf)?,
            dstaddr: list_field(block, policy, FieldKind::DstAddr)?,
            service: list_field(block, policy, FieldKind::Service)?,
        };

        Ok(Self {
            id,
            name,
            fields,
            line: block.line,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// The `name` token exactly as quoted in the source.
    pub fn name(&self) -> &Token {
        &self.name
    }

    pub fn fields(&self) -> &MultiValueFields {
        &self.fields
    }

    /// Line of the `edit` marker.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Identifier derived from the name, before any collision handling.
    pub fn resource_identifier(&self) -> String {
        normalize(&self.name.value)
    }
}

fn policy_id(block: &EditBlock) -> Result<u32, RecordError> {
    let location = PolicyRef::Block {
        line: block.line,
        offset: block.offset,
    };
    let key = block.key_token().ok_or_else(|| RecordError::InvalidId {
        policy: location,
        key: String::new(),
    })?;
    match key.value.parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(RecordError::InvalidId {
            policy: location,
            key: key.raw.clone(),
        }),
    }
}

fn scalar_name(block: &EditBlock, policy: PolicyRef) -> Result<Token, RecordError> {
    let attr = block.get("name").ok_or(RecordError::MissingField {
        policy,
        field: "name",
    })?;
    let malformed = |reason: &str| RecordError::MalformedField {
        policy,
        field: "name",
        line: attr.line,
        reason: reason.to_string(),
    };
    match attr.values.as_slice() {
        [] => Err(malformed("no value given")),
        [token] if !token.quoted => {
            Err(malformed(&format!("name `{}` is not quoted", token.raw)))
        }
        [token] if token.value.is_empty() => Err(malformed("name is empty")),
        [token] => Ok((*token).clone()),
        _ => Err(malformed("expected a single quoted value")),
    }
}

fn list_field(
    block: &EditBlock,
    policy: PolicyRef,
    kind: FieldKind,
) -> Result<Vec<Token>, RecordError> {
    let field = kind.as_str();
    let attr = block
        .get(field)
        .ok_or(RecordError::MissingField { policy, field })?;
    if attr.values.is_empty() {
        return Err(RecordError::MalformedField {
            policy,
            field,
            line: attr.line,
            reason: "no entries given".to_string(),
        });
    }
    if let Some(bare) = attr.values.iter().find(|t| !t.quoted) {
        return Err(RecordError::MalformedField {
            policy,
            field,
            line: attr.line,
            reason: format!("entry `{}` is not quoted", bare.raw),
        });
    }
    Ok(attr.values.into_iter().cloned().collect())
}
