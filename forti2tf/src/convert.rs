//! The `convert` command: dump in, Terraform artifacts out.
//!
//! ## Stages
//!
//! 1. **Settings**: merge the optional TOML config with CLI flags
//! 2. **Guard**: refuse outputs that alias the input or each other
//! 3. **Convert**: run the pipeline; structural errors stop here and no
//!    file is touched
//! 4. **Report**: print per-record errors and warnings to stderr
//! 5. **Prepare outputs**: open both artifacts, then remove (with a
//!    warning) or append to existing content
//! 6. **Emit**: write imports and resources, then print the summary

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use forti2tf::config::{load_config, ConfigLayer, Settings};
use forti2tf::emit::ImportEmitter;
use forti2tf::pipeline::{convert, ConvertOptions};
use tracing::info;

use crate::cli::ConvertArgs;
use crate::path_guard::ensure_distinct_paths;
use crate::report::{render_findings, render_summary_line};

/// Execute the conversion workflow.
///
/// # Errors
///
/// Returns error if:
/// - Configuration cannot be loaded or has no input
/// - An output path matches the input or the other output
/// - The dump has a structural error
/// - `--strict` is set and any policy failed
/// - Output files cannot be written
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    ensure_distinct_paths(
        &settings.input,
        &[&settings.import_path, &settings.resource_path],
    )?;

    let text = fs::read_to_string(&settings.input)
        .with_context(|| format!("failed to read {}", settings.input.display()))?;
    let options = ConvertOptions {
        collision: settings.collision,
    };
    let conversion = convert(&text, &options).with_context(|| {
        format!(
            "failed to parse {}; no output written",
            settings.input.display()
        )
    })?;

    if !conversion.findings.is_empty() {
        eprintln!("{}", render_findings(&conversion.findings));
    }

    let summary = conversion.summary();
    if settings.strict && summary.failed > 0 {
        bail!(
            "strict mode: {} of {} policies failed to convert; no output written",
            summary.failed,
            summary.blocks
        );
    }

    let imports = open_artifact(&settings.import_path, settings.overwrite_existing)?;
    let resources = open_artifact(&settings.resource_path, settings.overwrite_existing)?;

    let emitter = ImportEmitter {
        style: settings.import_style,
        shebang: !imports.kept_content(),
    };
    let mut writer = imports.into_writer()?;
    conversion
        .write_imports(&mut writer, &emitter)
        .with_context(|| format!("failed to write {}", settings.import_path.display()))?;

    let mut writer = resources.into_writer()?;
    conversion
        .write_resources(&mut writer)
        .with_context(|| format!("failed to write {}", settings.resource_path.display()))?;

    info!(
        imports = %settings.import_path.display(),
        resources = %settings.resource_path.display(),
        "wrote artifacts"
    );
    println!("{}", render_summary_line(summary));
    Ok(())
}

/// Layer CLI flags over the optional config file.
fn resolve_settings(args: &ConvertArgs) -> Result<Settings> {
    let file_layer = match &args.config {
        Some(path) => load_config(path)?,
        None => ConfigLayer::default(),
    };

    let overwrite_existing = if args.append {
        Some(false)
    } else if args.overwrite {
        Some(true)
    } else {
        None
    };

    let cli_layer = ConfigLayer {
        input: args.input.clone(),
        output_dir: args.output_dir.clone(),
        import_file: args.import_file.clone(),
        resource_file: args.resource_file.clone(),
        overwrite_existing,
        import_style: args.import_style.map(Into::into),
        collision: args.collision.map(Into::into),
        strict: args.strict.then_some(true),
    };

    Ok(file_layer.merge(cli_layer).resolve()?)
}

/// An output file opened for writing but not yet modified.
struct Artifact<'a> {
    path: &'a Path,
    file: File,
    existed: bool,
    len: u64,
    overwrite: bool,
}

impl Artifact<'_> {
    /// Whether existing content is kept and new output goes after it.
    fn kept_content(&self) -> bool {
        !self.overwrite && self.len > 0
    }

    /// Truncate (announcing it on stderr) or position for appending.
    fn into_writer(self) -> Result<BufWriter<File>> {
        if self.overwrite {
            if self.existed {
                eprintln!("warning: removing existing {}", self.path.display());
            }
            self.file
                .set_len(0)
                .with_context(|| format!("failed to truncate {}", self.path.display()))?;
        }

        let kept_content = self.kept_content();
        let mut writer = BufWriter::new(self.file);
        if kept_content {
            // Keep appended runs visually separate.
            writer
                .write_all(b"\n")
                .with_context(|| format!("failed to write {}", self.path.display()))?;
        }
        Ok(writer)
    }
}

/// Open an artifact without touching its content.
///
/// Both artifacts are opened before either is truncated, so a path that
/// cannot be opened leaves every existing file as it was.
fn open_artifact(path: &Path, overwrite: bool) -> Result<Artifact<'_>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let existed = path.exists();
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(!overwrite)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("failed to inspect {}", path.display()))?
        .len();

    Ok(Artifact {
        path,
        file,
        existed,
        len,
        overwrite,
    })
}
