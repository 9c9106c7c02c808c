use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub blocks: usize,
    pub converted: usize,
    pub failed: usize,
    pub warnings: usize,
}

pub fn render(summary: ConversionSummary) -> String {
    format!(
        "convert_summary blocks={} converted={} failed={} warnings={}",
        summary.blocks, summary.converted, summary.failed, summary.warnings
    )
}
