use std::fs;
use std::path::PathBuf;

use forti2tf::emit::{ImportEmitter, ImportStyle};
use forti2tf::pipeline::{convert, Conversion, ConvertOptions};
use forti2tf::policy::PolicyRef;
use pretty_assertions::assert_eq;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn convert_fixture(path: &str) -> Conversion {
    let text = fs::read_to_string(fixture(path)).expect("fixture should be readable");
    convert(&text, &ConvertOptions::default()).expect("fixture should parse")
}

fn render(conversion: &Conversion, style: ImportStyle) -> (String, String) {
    let mut imports = Vec::new();
    conversion
        .write_imports(&mut imports, &ImportEmitter::new(style))
        .expect("imports");
    let mut resources = Vec::new();
    conversion.write_resources(&mut resources).expect("resources");
    (
        String::from_utf8(imports).expect("utf-8"),
        String::from_utf8(resources).expect("utf-8"),
    )
}

#[test]
fn every_block_yields_one_import_and_one_resource() {
    let conversion = convert_fixture("fixtures/policies.conf");
    assert_eq!(conversion.blocks, 3);
    assert!(conversion.findings.is_empty());

    let (imports, resources) = render(&conversion, ImportStyle::Command);
    assert_eq!(imports.lines().filter(|l| l.starts_with("terraform import")).count(), 3);
    assert_eq!(resources.matches("resource \"fortios_firewall_policy\"").count(), 3);
}

#[test]
fn ids_appear_in_source_order_in_both_artifacts() {
    let text = fs::read_to_string(fixture("fixtures/policies.conf")).expect("fixture");
    let source_ids: Vec<_> = text
        .lines()
        .filter_map(|l| l.trim().strip_prefix("edit "))
        .collect();

    let conversion = convert(&text, &ConvertOptions::default()).expect("convert");
    let (imports, resources) = render(&conversion, ImportStyle::Block);
    let import_ids: Vec<_> = imports
        .lines()
        .filter_map(|l| l.trim().strip_prefix("id = "))
        .map(|id| id.trim_matches('"'))
        .collect();
    let resource_ids: Vec<_> = resources
        .lines()
        .filter_map(|l| l.trim().strip_prefix("policyid = "))
        .collect();

    assert_eq!(source_ids, vec!["10", "11", "12"]);
    assert_eq!(import_ids, source_ids);
    assert_eq!(resource_ids, source_ids);
}

#[test]
fn sub_block_counts_match_source_tokens() {
    let conversion = convert_fixture("fixtures/policies.conf");
    let (_, resources) = render(&conversion, ImportStyle::Command);

    // Policy 11: 2 srcintf, 2 srcaddr, 1 dstintf, 1 dstaddr, 3 service.
    let start = resources.find("\"lan_servers_out\"").expect("policy 11");
    let end = resources[start..]
        .find("\n}\n")
        .map(|i| start + i)
        .expect("end of resource");
    let body = &resources[start..end];
    let counts: Vec<_> = ["srcintf", "srcaddr", "dstintf", "dstaddr", "service"]
        .iter()
        .map(|kind| body.matches(&format!("  {kind} {{")).count())
        .collect();
    assert_eq!(counts, vec![2, 2, 1, 1, 3]);
}

#[test]
fn identifiers_match_across_artifacts() {
    let conversion = convert_fixture("fixtures/policies.conf");
    let (imports, resources) = render(&conversion, ImportStyle::Command);
    for policy in &conversion.policies {
        let address = format!("fortios_firewall_policy.{}", policy.identifier);
        assert!(imports.contains(&format!("{address} {}", policy.record.id())));
        assert!(resources.contains(&format!(
            "resource \"fortios_firewall_policy\" \"{}\"",
            policy.identifier
        )));
    }
}

#[test]
fn missing_dstaddr_skips_only_that_policy() {
    let conversion = convert_fixture("fixtures/missing_field.conf");
    let ids: Vec<_> = conversion.policies.iter().map(|p| p.record.id()).collect();
    assert_eq!(ids, vec![1]);

    let errors: Vec<_> = conversion.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].policy, PolicyRef::Id(2));
    assert_eq!(
        errors[0].message,
        "policy 2: missing required field `dstaddr`"
    );

    let (imports, resources) = render(&conversion, ImportStyle::Command);
    assert!(!imports.contains("broken-rule"));
    assert!(!resources.contains("policyid = 2"));
}

#[test]
fn unterminated_block_is_fatal() {
    let text = fs::read_to_string(fixture("fixtures/unterminated.conf")).expect("fixture");
    let err = convert(&text, &ConvertOptions::default()).expect_err("structural error");
    assert!(err.to_string().contains("`edit 2` has no matching `next`"));
}

#[test]
fn multi_line_comments_do_not_break_conversion() {
    let conversion = convert_fixture("fixtures/multiline_comments.conf");
    assert!(conversion.findings.is_empty());
    let identifiers: Vec<_> = conversion
        .policies
        .iter()
        .map(|p| p.identifier.as_str())
        .collect();
    assert_eq!(identifiers, vec!["allow-dns", "branch-out"]);

    let (imports, _) = render(&conversion, ImportStyle::Command);
    assert!(imports.contains("terraform import fortios_firewall_policy.branch-out 2\n"));
}
