use colored::Colorize;
use forti2tf::emit::resource_address;
use forti2tf::pipeline::{Conversion, Finding, Severity};
use forti2tf::summary::{render as render_summary, ConversionSummary};

/// Render findings for stderr, one line each.
pub fn render_findings(findings: &[Finding]) -> String {
    let mut out = Vec::new();
    for finding in findings {
        let line = match finding.severity {
            Severity::Error => format!("error: {}", finding.message).red().to_string(),
            Severity::Warning => format!("warning: {}", finding.message)
                .yellow()
                .to_string(),
        };
        out.push(line);
    }
    out.join("\n")
}

/// Render converted policies and their resource addresses.
pub fn render_policies(conversion: &Conversion) -> String {
    let mut out = Vec::new();
    out.push("policies".to_string());
    for policy in &conversion.policies {
        out.push(format!(
            "- policy {} -> {} name={}",
            policy.record.id(),
            resource_address(&policy.identifier),
            policy.record.name().raw
        ));
    }
    out.join("\n")
}

/// Render the summary line, highlighted when anything failed.
pub fn render_summary_line(summary: ConversionSummary) -> String {
    let line = render_summary(summary);
    if summary.failed > 0 {
        line.red().to_string()
    } else if summary.warnings > 0 {
        line.yellow().to_string()
    } else {
        line.cyan().to_string()
    }
}
