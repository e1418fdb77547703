// file: src/exporter/archive.rs
// description: zip packaging of output trees and bundles
// reference: https://docs.rs/zip

use crate::error::{PipelineError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn create_archive(zip_path: &Path) -> Result<ZipWriter<BufWriter<File>>> {
    if let Some(parent) = zip_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
    }
    let file = File::create(zip_path).map_err(|e| PipelineError::file_operation(zip_path, e))?;
    Ok(ZipWriter::new(BufWriter::new(file)))
}

fn finish_archive(archive: ZipWriter<BufWriter<File>>, zip_path: &Path) -> Result<()> {
    archive
        .finish()?
        .flush()
        .map_err(|e| PipelineError::file_operation(zip_path, e))
}

fn append_file<W: Write + io::Seek>(
    archive: &mut ZipWriter<W>,
    source: &Path,
    entry_name: String,
) -> Result<()> {
    archive.start_file(entry_name.as_str(), file_options())?;
    let mut input = File::open(source).map_err(|e| PipelineError::file_operation(source, e))?;
    io::copy(&mut input, archive).map_err(|e| PipelineError::file_operation(source, e))?;
    debug!("Archived {}", entry_name);
    Ok(())
}

/// Archives every regular file under `source_dir` with entry names relative
/// to it, using `/` separators.
pub fn zip_dir(source_dir: &Path, zip_path: &Path) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(PipelineError::Validation(format!(
            "Archive source is not a directory: {}",
            source_dir.display()
        )));
    }

    let mut archive = create_archive(zip_path)?;
    let mut entries = 0usize;

    for entry in WalkDir::new(source_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_default();
            PipelineError::file_operation(path, io::Error::other(e.to_string()))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        append_file(&mut archive, entry.path(), name)?;
        entries += 1;
    }

    finish_archive(archive, zip_path)?;
    info!(
        "Created {} with {} file(s) from {}",
        zip_path.display(),
        entries,
        source_dir.display()
    );
    Ok(zip_path.to_path_buf())
}

/// Flat archive of the given files, each stored under its file name.
pub fn zip_files(files: &[PathBuf], zip_path: &Path) -> Result<PathBuf> {
    let mut archive = create_archive(zip_path)?;

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                PipelineError::Validation(format!("Not a file path: {}", file.display()))
            })?;
        append_file(&mut archive, file, name)?;
    }

    finish_archive(archive, zip_path)?;
    info!("Created {} bundling {} file(s)", zip_path.display(), files.len());
    Ok(zip_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn read_entries(zip_path: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut archive = ZipArchive::new(File::open(zip_path).unwrap()).unwrap();
        let mut entries = BTreeMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i).unwrap();
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).unwrap();
            entries.insert(file.name().to_string(), bytes);
        }
        entries
    }

    #[test]
    fn test_zip_dir_uses_relative_entry_names() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(source.join("a")).unwrap();
        fs::create_dir_all(source.join("empty")).unwrap();
        fs::write(source.join("a/b.txt"), b"nested bytes").unwrap();
        fs::write(source.join("c.txt"), b"top bytes").unwrap();

        let zip_path = temp.path().join("dist/out.zip");
        let created = zip_dir(&source, &zip_path).unwrap();

        assert_eq!(created, zip_path);
        let entries = read_entries(&zip_path);
        assert_eq!(
            entries.keys().cloned().collect::<Vec<_>>(),
            vec!["a/b.txt".to_string(), "c.txt".to_string()]
        );
        assert_eq!(entries["a/b.txt"], b"nested bytes".to_vec());
        assert_eq!(entries["c.txt"], b"top bytes".to_vec());
    }

    #[test]
    fn test_zip_dir_rejects_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = zip_dir(&temp.path().join("missing"), &temp.path().join("x.zip"));
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_zip_files_is_flat() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("deep/dir")).unwrap();
        let first = temp.path().join("deep/dir/texts.zip");
        let second = temp.path().join("audio.zip");
        fs::write(&first, b"one").unwrap();
        fs::write(&second, b"two").unwrap();

        let bundle = temp.path().join("both.zip");
        zip_files(&[first, second], &bundle).unwrap();

        let entries = read_entries(&bundle);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["texts.zip"], b"one".to_vec());
        assert_eq!(entries["audio.zip"], b"two".to_vec());
    }
}
