use crate::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Collects every `.gif` file under `root`, descending into subdirectories.
/// A missing root is treated as an empty result rather than an error. Results
/// are sorted so the selector order is stable across runs.
pub async fn scan_gif_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    if !root.exists() {
        eprintln!("Directory doesn't exist: {}", root.display());
        return Ok(found);
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if has_gif_extension(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

fn has_gif_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("gif"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};
    use tempfile::tempdir;

    #[tokio::test]
    async fn finds_gifs_in_nested_directories() {
        let dir = tempdir().expect("temp dir");
        let nested = dir.path().join("a").join("b");
        create_dir_all(&nested).expect("nested dirs");
        write(dir.path().join("top.gif"), b"x").expect("write");
        write(nested.join("deep.gif"), b"x").expect("write");
        write(nested.join("notes.txt"), b"x").expect("write");

        let files = scan_gif_files(dir.path()).await.expect("scan");

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| has_gif_extension(p)));
    }

    #[tokio::test]
    async fn extension_match_is_case_insensitive() {
        let dir = tempdir().expect("temp dir");
        write(dir.path().join("LOUD.GIF"), b"x").expect("write");
        write(dir.path().join("mixed.Gif"), b"x").expect("write");
        write(dir.path().join("image.png"), b"x").expect("write");

        let files = scan_gif_files(dir.path()).await.expect("scan");

        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn empty_tree_yields_empty_list() {
        let dir = tempdir().expect("temp dir");
        create_dir_all(dir.path().join("empty")).expect("subdir");

        let files = scan_gif_files(dir.path()).await.expect("scan");

        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn missing_root_yields_empty_list() {
        let dir = tempdir().expect("temp dir");
        let missing = dir.path().join("nowhere");

        let files = scan_gif_files(&missing).await.expect("scan");

        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn results_are_sorted() {
        let dir = tempdir().expect("temp dir");
        write(dir.path().join("b.gif"), b"x").expect("write");
        write(dir.path().join("a.gif"), b"x").expect("write");
        write(dir.path().join("c.gif"), b"x").expect("write");

        let files = scan_gif_files(dir.path()).await.expect("scan");

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }
}
