use crate::domain::model::{MeshSource, COMPRESSED_EXTENSION, SOURCE_EXTENSION};
use crate::utils::error::{CompressError, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Picks source meshes out of a list of file names: names ending in `.glb`
/// but not in `.min.glb`. The result is sorted and free of duplicates.
pub fn select_sources<I, S>(names: I) -> Vec<MeshSource>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            // 已壓縮的輸出不再作為來源
            if name.ends_with(COMPRESSED_EXTENSION) {
                return None;
            }
            name.strip_suffix(SOURCE_EXTENSION).map(MeshSource::new)
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Lists `dir` (no recursion) and selects the source meshes among its regular files.
pub fn scan_directory(dir: &Path) -> Result<Vec<MeshSource>> {
    let entries = std::fs::read_dir(dir).map_err(|source| CompressError::DirectoryError {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::debug!("Skipping non UTF-8 file name {:?}", raw),
        }
    }

    let sources = select_sources(names);
    tracing::debug!("Found {} source meshes in {}", sources.len(), dir.display());
    Ok(sources)
}
