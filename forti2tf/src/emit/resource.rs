use super::{hcl_string, Emit, RESOURCE_TYPE};
use crate::registry::ResolvedPolicy;

/// Renders one `fortios_firewall_policy` resource per policy.
///
/// Imported policies are always written as `accept` on the `always`
/// schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceEmitter;

impl Emit for ResourceEmitter {
    fn render(&self, policy: &ResolvedPolicy) -> String {
        let record = &policy.record;
        let mut lines = vec![
            format!("resource \"{RESOURCE_TYPE}\" \"{}\" {{", policy.identifier),
            "  action   = \"accept\"".to_string(),
            format!("  name     = {}", hcl_string(record.name())),
            format!("  policyid = {}", record.id()),
            "  schedule = \"always\"".to_string(),
        ];

        for (kind, entries) in record.fields().iter() {
            lines.push(String::new());
            for entry in entries {
                lines.push(format!("  {kind} {{"));
                lines.push(format!("    name = {}", hcl_string(entry)));
                lines.push("  }".to_string());
            }
        }
        lines.push("}".to_string());

        format!("{}\n\n", lines.join("\n"))
    }
}
