//! Terraform artifact emitters.
//!
//! Emitters never open files themselves. They append text to whatever
//! [`std::io::Write`] sink the caller hands them, one policy at a time and
//! in the order given.

pub mod import;
pub mod resource;

use std::io::{self, Write};

use fortios_cli_core::Token;

use crate::registry::ResolvedPolicy;

pub use import::{ImportEmitter, ImportStyle};
pub use resource::ResourceEmitter;

/// Terraform resource type for FortiOS firewall policies.
pub const RESOURCE_TYPE: &str = "fortios_firewall_policy";

/// Renders one artifact kind for a sequence of policies.
pub trait Emit {
    /// Text written once before the first policy, if any.
    fn preamble(&self) -> Option<&'static str> {
        None
    }

    /// Render a single policy. Must not depend on any other policy.
    fn render(&self, policy: &ResolvedPolicy) -> String;

    /// Write the preamble and then every policy to `out`, preserving order.
    fn emit(&self, out: &mut dyn Write, policies: &[ResolvedPolicy]) -> io::Result<()> {
        if let Some(preamble) = self.preamble() {
            out.write_all(preamble.as_bytes())?;
        }
        for policy in policies {
            out.write_all(self.render(policy).as_bytes())?;
        }
        out.flush()
    }
}

/// Resource address as used by `terraform import` and `import` blocks.
pub fn resource_address(identifier: &str) -> String {
    format!("{RESOURCE_TYPE}.{identifier}")
}

/// Render a CLI token as an HCL string literal.
///
/// The source quoting is kept as-is since FortiOS and HCL share the same
/// backslash escapes. Template sequences are escaped so HCL does not
/// interpolate them.
pub fn hcl_string(token: &Token) -> String {
    token.to_quoted().replace("${", "$${").replace("%{", "%%{")
}

#[cfg(test)]
mod tests {
    use fortios_cli_core::tokenize;

    use super::{hcl_string, resource_address};

    #[test]
    fn hcl_string_keeps_source_quoting() {
        let tokens = tokenize(r#""LAN Servers" "a\"b" bare"#, 0).expect("tokens");
        assert_eq!(hcl_string(&tokens[0]), "\"LAN Servers\"");
        assert_eq!(hcl_string(&tokens[1]), r#""a\"b""#);
        assert_eq!(hcl_string(&tokens[2]), "\"bare\"");
    }

    #[test]
    fn hcl_string_escapes_templates() {
        let tokens = tokenize(r#""cost ${x} %{y}""#, 0).expect("tokens");
        assert_eq!(hcl_string(&tokens[0]), r#""cost $${x} %%{y}""#);
    }

    #[test]
    fn address_uses_policy_resource_type() {
        assert_eq!(resource_address("allow-web"), "fortios_firewall_policy.allow-web");
    }
}
