//! FortiGate firewall policy to Terraform conversion.
//!
//! This library turns the output of `show firewall policy` into the two
//! artifacts needed to adopt live policies into Terraform without touching
//! the device:
//!
//! - **import directives** binding each policy ID to a resource address,
//!   either as a `terraform import` shell script or as `import { … }`
//!   blocks, and
//! - **resource declarations**, one `fortios_firewall_policy` block per
//!   policy.
//!
//! # Architecture
//!
//! - [`policy`]: validated [`policy::PolicyRecord`]s built from parsed blocks
//! - [`identifier`]: name → resource identifier normalization
//! - [`registry`]: identifier assignment and collision handling
//! - [`emit`]: import and resource emitters writing into any `io::Write`
//! - [`pipeline`]: single-pass orchestration and per-record findings
//! - [`config`]: TOML configuration layered under CLI flags
//! - [`summary`]: one-line run summary
//!
//! # Examples
//!
//! ```
//! use forti2tf::emit::{ImportEmitter, ImportStyle};
//! use forti2tf::pipeline::{convert, ConvertOptions};
//!
//! let dump = r#"config firewall policy
//!     edit 10
//!         set name "Allow-Web"
//!         set srcintf "port1"
//!         set srcaddr "all"
//!         set dstintf "port2"
//!         set dstaddr "all"
//!         set service "HTTP" "HTTPS"
//!     next
//! end
//! "#;
//!
//! let conversion = convert(dump, &ConvertOptions::default())?;
//! let mut imports = Vec::new();
//! conversion.write_imports(&mut imports, &ImportEmitter::new(ImportStyle::Command))?;
//! assert!(String::from_utf8_lossy(&imports)
//!     .contains("terraform import fortios_firewall_policy.allow-web 10"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Built on fortios-cli-core
//!
//! Block extraction and tokenization live in `fortios-cli-core`, which is
//! agnostic of policies and Terraform. All policy-specific logic is in this
//! crate.

pub mod config;
pub mod emit;
pub mod identifier;
pub mod pipeline;
pub mod policy;
pub mod registry;
pub mod summary;
