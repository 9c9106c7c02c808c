use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use shell_escape::unix::escape;

use super::{resource_address, Emit};
use crate::registry::ResolvedPolicy;

/// How import bindings are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    /// A shell script of `terraform import` commands. Addresses with
    /// characters outside the shell-safe set are single-quoted.
    #[default]
    Command,
    /// Declarative `import { … }` blocks (Terraform 1.5+).
    Block,
}

impl ImportStyle {
    /// Conventional file name for this style's artifact.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ImportStyle::Command => "import.sh",
            ImportStyle::Block => "import.tf",
        }
    }
}

/// Renders one import binding per policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEmitter {
    pub style: ImportStyle,
    /// Write the `#!/bin/bash` line for command style. Disabled when
    /// appending to an existing script.
    pub shebang: bool,
}

impl ImportEmitter {
    pub fn new(style: ImportStyle) -> Self {
        Self {
            style,
            shebang: true,
        }
    }
}

impl Emit for ImportEmitter {
    fn preamble(&self) -> Option<&'static str> {
        match self.style {
            ImportStyle::Command if self.shebang => Some("#!/bin/bash\n"),
            _ => None,
        }
    }

    fn render(&self, policy: &ResolvedPolicy) -> String {
        let address = resource_address(&policy.identifier);
        let id = policy.record.id();
        match self.style {
            ImportStyle::Command => {
                format!("terraform import {} {id}\n", escape(Cow::from(address.as_str())))
            }
            ImportStyle::Block => format!("import {{\n  to = {address}\n  id = \"{id}\"\n}}\n\n"),
        }
    }
}
