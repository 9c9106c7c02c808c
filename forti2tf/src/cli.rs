use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use forti2tf::emit::ImportStyle;
use forti2tf::registry::CollisionPolicy;

#[derive(Parser, Debug)]
#[command(name = "forti2tf")]
#[command(about = "Convert FortiGate firewall policy dumps into Terraform resources and imports")]
pub struct Cli {
    /// Log pipeline decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Write import directives and resource declarations for a policy dump.
    Convert(ConvertArgs),
    /// Parse and validate a policy dump without writing anything.
    Check(CheckArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum ImportStyleArg {
    /// `terraform import` shell commands.
    Command,
    /// Terraform 1.5+ `import` blocks.
    Block,
}

impl From<ImportStyleArg> for ImportStyle {
    fn from(arg: ImportStyleArg) -> Self {
        match arg {
            ImportStyleArg::Command => ImportStyle::Command,
            ImportStyleArg::Block => ImportStyle::Block,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum CollisionArg {
    /// Append `_<policyid>` to the later identifier and warn.
    Suffix,
    /// Skip the later policy with an error.
    Reject,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Suffix => CollisionPolicy::Suffix,
            CollisionArg::Reject => CollisionPolicy::Reject,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// `show firewall policy` output to convert (may come from --config instead).
    pub input: Option<PathBuf>,
    /// Optional TOML config file; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory for both artifacts (default: current directory).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Import artifact file name (default: import.sh, or import.tf for block style).
    #[arg(long)]
    pub import_file: Option<PathBuf>,
    /// Resource artifact file name (default: policy.tf).
    #[arg(long)]
    pub resource_file: Option<PathBuf>,
    /// How import directives are rendered.
    #[arg(long, value_enum)]
    pub import_style: Option<ImportStyleArg>,
    /// Delete existing artifacts before writing (default).
    #[arg(long, conflicts_with = "append")]
    pub overwrite: bool,
    /// Append to existing artifacts instead of replacing them.
    #[arg(long)]
    pub append: bool,
    /// What to do when two policy names normalize to the same identifier.
    #[arg(long, value_enum)]
    pub collision: Option<CollisionArg>,
    /// Write nothing if any policy fails to convert.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// `show firewall policy` output to validate.
    pub input: PathBuf,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// What to do when two policy names normalize to the same identifier.
    #[arg(long, value_enum)]
    pub collision: Option<CollisionArg>,
    /// Treat warnings as failures.
    #[arg(long)]
    pub strict: bool,
}
