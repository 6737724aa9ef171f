//! File-system helpers shared by the build stage and the deploy targets.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::AppError;

/// Lists every regular file under `root`, sorted by relative path.
/// Relative paths use `/` separators regardless of platform.
pub fn walk_files(root: &Path) -> Result<Vec<(String, PathBuf)>, AppError> {
    let mut files = Vec::new();
    walk_into(root, root, &mut files)?;
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn walk_into(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(String, PathBuf)>,
) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let metadata = fs::metadata(&path)?;
        if metadata.is_dir() {
            walk_into(root, &path, files)?;
        } else if metadata.is_file() {
            files.push((relative_slash_path(root, &path), path));
        }
    }
    Ok(())
}

/// Returns `path` relative to `root` joined with `/`.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Copies the contents of `source` into `target`, creating directories as needed.
pub fn copy_dir_contents(source: &Path, target: &Path) -> Result<usize, AppError> {
    let mut copied = 0;
    for (relative, absolute) in walk_files(source)? {
        let destination = target.join(&relative);
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&absolute, &destination)?;
        copied += 1;
    }
    Ok(copied)
}

/// Removes every entry of `dir` except the names in `keep`.
pub fn clear_dir_except(dir: &Path, keep: &[&str]) -> Result<(), AppError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if keep.iter().any(|k| name.to_str() == Some(*k)) {
            continue;
        }
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Returns true if `candidate` is `base` or one of its ancestors.
pub fn is_same_or_ancestor(candidate: &Path, base: &Path) -> bool {
    let candidate = fs::canonicalize(candidate).unwrap_or_else(|_| candidate.to_path_buf());
    let base = fs::canonicalize(base).unwrap_or_else(|_| base.to_path_buf());
    base.starts_with(&candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_walk_files_sorted_with_slashes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("js/lib")).unwrap();
        fs::write(dir.path().join("js/lib/three.js"), "x").unwrap();
        fs::write(dir.path().join("index.html"), "x").unwrap();
        fs::write(dir.path().join("js/main.js"), "x").unwrap();

        let names: Vec<String> = walk_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|(rel, _)| rel)
            .collect();
        assert_eq!(names, vec!["index.html", "js/lib/three.js", "js/main.js"]);
    }

    #[test]
    fn test_clear_dir_except_keeps_git_link() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".git"), "gitdir: ../.git/worktrees/x").unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        fs::write(dir.path().join("old.html"), "x").unwrap();

        clear_dir_except(dir.path(), &[".git"]).unwrap();

        let remaining: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(remaining.len(), 1);
        assert!(dir.path().join(".git").exists());
    }

    #[test]
    fn test_is_same_or_ancestor() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("project");
        fs::create_dir_all(&nested).unwrap();

        assert!(is_same_or_ancestor(dir.path(), &nested));
        assert!(is_same_or_ancestor(&nested, &nested));
        assert!(!is_same_or_ancestor(&nested.join("dist"), &nested));
    }
}
