use std::fs;

use anyhow::{bail, Context, Result};
use forti2tf::pipeline::{convert, Conversion, ConvertOptions};
use forti2tf::summary::ConversionSummary;
use serde::Serialize;

use crate::cli::{CheckArgs, OutputFormat};
use crate::report::{render_findings, render_policies, render_summary_line};

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    summary: ConversionSummary,
    #[serde(flatten)]
    conversion: &'a Conversion,
}

pub fn run_check(args: CheckArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let options = ConvertOptions {
        collision: args.collision.map(Into::into).unwrap_or_default(),
    };
    let conversion = convert(&text, &options)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let summary = conversion.summary();

    match args.format {
        OutputFormat::Text => {
            println!("{}", render_policies(&conversion));
            if !conversion.findings.is_empty() {
                println!();
                println!("findings");
                println!("{}", render_findings(&conversion.findings));
            }
            println!("{}", render_summary_line(summary));
        }
        OutputFormat::Json => {
            let report = CheckReport {
                summary,
                conversion: &conversion,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if summary.failed > 0 {
        bail!("check failed: {} policies cannot be converted", summary.failed);
    }
    if args.strict && summary.warnings > 0 {
        bail!("check failed in strict mode: {} warnings", summary.warnings);
    }
    Ok(())
}
