use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse runs where an artifact would overwrite the input dump or where
/// both artifacts point at the same file.
pub fn ensure_distinct_paths(input: &Path, outputs: &[&Path]) -> Result<()> {
    let in_norm = comparable_path(input)
        .with_context(|| format!("failed to normalize input path {}", input.display()))?;

    let mut seen: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for output in outputs {
        let out_norm = comparable_path(output)
            .with_context(|| format!("failed to normalize output path {}", output.display()))?;
        if out_norm == in_norm {
            bail!(
                "refusing to overwrite source file: output {} matches input {}",
                output.display(),
                input.display()
            );
        }
        if let Some((_, other)) = seen.iter().find(|(norm, _)| *norm == out_norm) {
            bail!(
                "import and resource outputs must differ: {} and {} are the same file",
                other.display(),
                output.display()
            );
        }
        seen.push((out_norm, output));
    }
    Ok(())
}

/// Absolute, comparable form of `path`.
///
/// `.` and `..` are folded lexically, then the longest prefix that exists
/// on disk is canonicalized and the missing tail is appended unchanged.
fn comparable_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to read current directory")?
            .join(path)
    };

    let mut folded = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other),
        }
    }

    let mut head = folded.as_path();
    let mut tail = Vec::new();
    while !head.exists() {
        let (Some(parent), Some(name)) = (head.parent(), head.file_name()) else {
            break;
        };
        tail.push(name);
        head = parent;
    }

    let mut resolved = if head.exists() {
        head.canonicalize()
            .with_context(|| format!("failed to canonicalize {}", head.display()))?
    } else {
        head.to_path_buf()
    };
    resolved.extend(tail.into_iter().rev());
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::ensure_distinct_paths;

    #[test]
    fn rejects_output_equal_to_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("dump.txt");
        fs::write(&input, "").expect("write");
        let other = dir.path().join("policy.tf");

        let err = ensure_distinct_paths(&input, &[&input, &other]).expect_err("same file");
        assert!(err.to_string().contains("refusing to overwrite source file"));
    }

    #[test]
    fn rejects_identical_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("dump.txt");
        let out = dir.path().join("out.tf");

        let err = ensure_distinct_paths(&input, &[&out, &out]).expect_err("same outputs");
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn parent_segments_do_not_hide_the_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("dump.txt");
        fs::write(&input, "").expect("write");
        let sneaky = dir.path().join("missing").join("..").join("dump.txt");

        let err = ensure_distinct_paths(&input, &[&sneaky]).expect_err("same file");
        assert!(err.to_string().contains("refusing to overwrite source file"));
    }

    #[test]
    fn new_outputs_in_a_new_directory_are_compared() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("dump.txt");
        let out = dir.path().join("tf").join("main.tf");
        let same = dir.path().join("tf").join(".").join("main.tf");

        let err = ensure_distinct_paths(&input, &[&out, &same]).expect_err("same outputs");
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn accepts_distinct_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("dump.txt");
        let imports = dir.path().join("import.sh");
        let resources = dir.path().join("policy.tf");
        ensure_distinct_paths(&input, &[&imports, &resources]).expect("distinct");
    }
}
