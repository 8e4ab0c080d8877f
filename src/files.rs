//! Catalog and locale folder discovery.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extension of catalog files.
pub const CATALOG_EXTENSION: &str = "xliff";

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// All `*.xliff` files below `root` (recursively, hidden entries skipped), sorted.
pub fn find_catalogs(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut catalogs = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(CATALOG_EXTENSION)
        {
            catalogs.push(entry.into_path());
        }
    }
    catalogs.sort();
    Ok(catalogs)
}

/// Like [`find_catalogs`], with paths relative to `root`.
pub fn find_relative_catalogs(root: &Path) -> io::Result<Vec<PathBuf>> {
    Ok(find_catalogs(root)?
        .into_iter()
        .filter_map(|path| path.strip_prefix(root).ok().map(Path::to_path_buf))
        .collect())
}

/// `*.xliff` files directly inside `folder`, sorted.
pub fn catalogs_in_folder(folder: &Path) -> io::Result<Vec<PathBuf>> {
    let mut catalogs = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(CATALOG_EXTENSION)
        {
            catalogs.push(entry.into_path());
        }
    }
    catalogs.sort();
    Ok(catalogs)
}

/// Names of non-hidden subdirectories of `base`, sorted.
pub fn locale_folders(base: &Path) -> io::Result<Vec<String>> {
    let mut folders = Vec::new();
    for entry in WalkDir::new(base).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() || is_hidden(&entry) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            folders.push(name.to_string());
        }
    }
    folders.sort();
    Ok(folders)
}
