//! Policy name to Terraform identifier normalization.

/// Character substituted for spaces in resource identifiers.
pub const SEPARATOR: char = '_';

/// Normalize a policy name into a resource identifier.
///
/// Every space becomes [`SEPARATOR`] and the result is lowercased. The
/// function is total and idempotent. It does not check reserved words or
/// deduplicate; see [`is_valid_identifier`] and the pipeline's collision
/// handling for that.
pub fn normalize(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' { SEPARATOR } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `ident` is usable as an HCL block label and reference name.
///
/// HCL identifiers start with a letter or underscore and continue with
/// letters, digits, underscores or dashes.
pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
