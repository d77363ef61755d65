//! File materialization for generated artifacts.
//!
//! Generated content is compared against what is already on disk by hash so
//! re-runs report `Unchanged` instead of rewriting identical bytes. The
//! integrator's read-modify-write targets go through `write_atomic` so a
//! crash cannot leave a half-edited file behind.

use crate::core::error::GocaError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to one target path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileAction {
    Created,
    Overwritten,
    Unchanged,
    Skipped,
}

/// Write policy for one generation run.
pub struct WriteOptions {
    /// Project root all relative paths resolve against.
    pub project_root: PathBuf,
    /// Overwrite existing files without a warning.
    pub force: bool,
    /// Log actions without touching the file system.
    pub dry_run: bool,
}

fn ensure_parent(path: &Path) -> Result<(), GocaError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Write one generated file under the project root.
///
/// Existing files with identical content are left alone. Differing files
/// are overwritten; the caller is expected to surface a warning when
/// `force` is off (overwrite-by-default policy, see DESIGN.md).
pub fn write_file(
    opts: &WriteOptions,
    rel_path: &str,
    content: &str,
) -> Result<FileAction, GocaError> {
    let dest = opts.project_root.join(rel_path);

    let existed = dest.exists();
    if existed {
        if let Ok(existing) = fs::read_to_string(&dest) {
            if sha256_hex(content) == sha256_hex(&existing) {
                return Ok(FileAction::Unchanged);
            }
        }
    }

    if opts.dry_run {
        return Ok(if existed {
            FileAction::Overwritten
        } else {
            FileAction::Created
        });
    }

    ensure_parent(&dest)?;
    fs::write(&dest, content)?;

    Ok(if existed {
        FileAction::Overwritten
    } else {
        FileAction::Created
    })
}

/// Atomically replace `path` with `content` (sibling temp file + rename).
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GocaError> {
    ensure_parent(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GocaError::Internal(format!("bad target path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.goca-tmp", file_name));
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn opts(root: &Path) -> WriteOptions {
        WriteOptions {
            project_root: root.to_path_buf(),
            force: false,
            dry_run: false,
        }
    }

    #[test]
    fn test_create_then_unchanged() {
        let tmp = tempdir().expect("tempdir");
        let o = opts(tmp.path());
        assert_eq!(
            write_file(&o, "internal/domain/user.go", "package domain\n").unwrap(),
            FileAction::Created
        );
        assert_eq!(
            write_file(&o, "internal/domain/user.go", "package domain\n").unwrap(),
            FileAction::Unchanged
        );
    }

    #[test]
    fn test_overwrite_reports_overwritten() {
        let tmp = tempdir().expect("tempdir");
        let o = opts(tmp.path());
        write_file(&o, "a.go", "one\n").unwrap();
        assert_eq!(
            write_file(&o, "a.go", "two\n").unwrap(),
            FileAction::Overwritten
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.go")).unwrap(),
            "two\n"
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = tempdir().expect("tempdir");
        let mut o = opts(tmp.path());
        o.dry_run = true;
        assert_eq!(
            write_file(&o, "b.go", "content\n").unwrap(),
            FileAction::Created
        );
        assert!(!tmp.path().join("b.go").exists());
    }

    #[test]
    fn test_write_atomic_replaces_and_cleans_temp() {
        let tmp = tempdir().expect("tempdir");
        let target = tmp.path().join("cmd/server/main.go");
        write_atomic(&target, "package main\n").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "package main\n");
        write_atomic(&target, "package main // edited\n").unwrap();
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "package main // edited\n"
        );
        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains("goca-tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
