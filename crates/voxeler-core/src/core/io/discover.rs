//! File discovery under input directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Collects regular files under `dir` accepted by `predicate`.
///
/// With `recursive` set, subdirectories are walked depth first. Results are
/// sorted by path so discovery order is stable across platforms.
pub fn collect_files(
    dir: &Path,
    recursive: bool,
    predicate: impl Fn(&Path) -> bool + Copy,
) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk(dir, recursive, predicate, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(
    dir: &Path,
    recursive: bool,
    predicate: impl Fn(&Path) -> bool + Copy,
    files: &mut Vec<PathBuf>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if recursive {
                walk(&path, recursive, predicate, files)?;
            }
        } else if predicate(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Collects every `.pdb` file directly under `dir`, case-insensitively.
pub fn collect_pdb_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    collect_files(dir, false, |path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdb"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn pdb_discovery_ignores_other_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.pdb"), "").unwrap();
        fs::write(dir.path().join("b.PDB"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let files = collect_pdb_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.pdb", "b.PDB"]);
    }

    #[test]
    fn non_recursive_search_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("nested.pdb"), "").unwrap();
        fs::write(dir.path().join("top.pdb"), "").unwrap();

        let files = collect_pdb_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);

        let all = collect_files(dir.path(), true, |p| {
            p.extension().is_some_and(|e| e == "pdb")
        })
        .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        assert!(collect_pdb_files(&missing).is_err());
    }
}
