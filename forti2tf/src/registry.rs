//! Resource identifier assignment and collision handling.
//!
//! Two policies whose names normalize to the same identifier would make
//! one Terraform resource shadow the other. The registry detects this as
//! records are added in document order and applies a [`CollisionPolicy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::policy::{PolicyRecord, PolicyRef, RecordError};

/// What to do when a policy's identifier is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `_<id>` to the later policy's identifier and warn.
    #[default]
    Suffix,
    /// Reject the later policy as a per-record error.
    Reject,
}

/// A record paired with the identifier both emitters use for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPolicy {
    pub identifier: String,
    pub record: PolicyRecord,
}

/// Outcome of registering one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The normalized name was free.
    Assigned(ResolvedPolicy),
    /// The normalized name was taken by `existing`; a suffixed identifier
    /// was assigned instead.
    Renamed {
        resolved: ResolvedPolicy,
        wanted: String,
        existing: u32,
    },
}

/// Tracks identifiers handed out so far in one document.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    policy: CollisionPolicy,
    taken: BTreeMap<String, u32>,
}

impl IdentifierRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            taken: BTreeMap::new(),
        }
    }

    /// Assign an identifier to `record`.
    ///
    /// A suffixed identifier that is itself taken is always rejected.
    pub fn register(&mut self, record: PolicyRecord) -> Result<Registration, RecordError> {
        let wanted = record.resource_identifier();
        let Some(&existing) = self.taken.get(&wanted) else {
            self.taken.insert(wanted.clone(), record.id());
            return Ok(Registration::Assigned(ResolvedPolicy {
                identifier: wanted,
                record,
            }));
        };

        let policy = PolicyRef::Id(record.id());
        if self.policy == CollisionPolicy::Reject {
            return Err(RecordError::IdentifierCollision {
                policy,
                identifier: wanted,
                existing,
            });
        }

        let suffixed = format!("{wanted}_{}", record.id());
        if let Some(&holder) = self.taken.get(&suffixed) {
            return Err(RecordError::IdentifierCollision {
                policy,
                identifier: suffixed,
                existing: holder,
            });
        }
        self.taken.insert(suffixed.clone(), record.id());
        Ok(Registration::Renamed {
            resolved: ResolvedPolicy {
                identifier: suffixed,
                record,
            },
            wanted,
            existing,
        })
    }
}

#[cfg(test)]
mod tests {
    use fortios_cli_core::parse;

    use super::{CollisionPolicy, IdentifierRegistry, Registration};
    use crate::policy::{PolicyRecord, RecordError};

    fn record(id: u32, name: &str) -> PolicyRecord {
        let input = format!(
            "edit {id}\n set name \"{name}\"\n set srcintf \"a\"\n set srcaddr \"a\"\n set dstintf \"a\"\n set dstaddr \"a\"\n set service \"a\"\nnext\n"
        );
        let blocks = parse(&input).expect("parse");
        PolicyRecord::from_block(&blocks[0]).expect("record")
    }

    #[test]
    fn distinct_names_keep_their_identifiers() {
        let mut registry = IdentifierRegistry::default();
        let first = registry.register(record(1, "Web")).expect("first");
        let second = registry.register(record(2, "Mail")).expect("second");
        assert!(matches!(first, Registration::Assigned(ref p) if p.identifier == "web"));
        assert!(matches!(second, Registration::Assigned(ref p) if p.identifier == "mail"));
    }

    #[test]
    fn suffix_policy_renames_later_duplicate() {
        let mut registry = IdentifierRegistry::new(CollisionPolicy::Suffix);
        registry.register(record(1, "LAN Out")).expect("first");
        let second = registry.register(record(7, "lan out")).expect("second");
        match second {
            Registration::Renamed {
                resolved,
                wanted,
                existing,
            } => {
                assert_eq!(resolved.identifier, "lan_out_7");
                assert_eq!(wanted, "lan_out");
                assert_eq!(existing, 1);
            }
            other => panic!("expected rename, got {other:?}"),
        }
    }

    #[test]
    fn reject_policy_fails_later_duplicate() {
        let mut registry = IdentifierRegistry::new(CollisionPolicy::Reject);
        registry.register(record(1, "Web")).expect("first");
        let err = registry.register(record(2, "WEB")).expect_err("collision");
        assert_eq!(
            err,
            RecordError::IdentifierCollision {
                policy: crate::policy::PolicyRef::Id(2),
                identifier: "web".to_string(),
                existing: 1
            }
        );
    }

    #[test]
    fn taken_suffix_is_rejected() {
        let mut registry = IdentifierRegistry::new(CollisionPolicy::Suffix);
        registry.register(record(1, "web_2")).expect("first");
        registry.register(record(3, "web")).expect("second");
        let err = registry.register(record(2, "Web")).expect_err("suffix taken");
        assert_eq!(err.code(), "identifier_collision");
    }
}
