use crate::error::{CliError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

const ZSTD_LEVEL: i32 = 19;

/// Packs `dir` into a sibling `<dir>.tar.zst`, with entries rooted at the directory name.
pub fn archive_directory(dir: &Path) -> Result<PathBuf> {
    let dir = dir.canonicalize()?;
    let Some(name) = dir.file_name().map(|n| n.to_os_string()) else {
        return Err(CliError::Argument(format!(
            "cannot archive {}: it has no directory name",
            dir.display()
        )));
    };

    let mut archive_name = name.clone();
    archive_name.push(".tar.zst");
    let archive_path = dir.with_file_name(archive_name);

    let file = File::create(&archive_path)?;
    let encoder = zstd::stream::write::Encoder::new(file, ZSTD_LEVEL)?;
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(&name, &dir)?;
    builder.into_inner()?.finish()?;

    info!("Archived {} into {}", dir.display(), archive_path.display());
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    #[test]
    fn archive_holds_every_file_under_the_directory_name() {
        let root = tempfile::tempdir().unwrap();
        let dataset = root.path().join("dataset");
        fs::create_dir(&dataset).unwrap();
        fs::write(dataset.join("1abc.pdb"), "ATOM\n").unwrap();
        fs::write(dataset.join("1abc.cif"), "data_LIG\n").unwrap();

        let archive_path = archive_directory(&dataset).unwrap();
        assert_eq!(archive_path.file_name().unwrap(), "dataset.tar.zst");

        let decoder = zstd::stream::read::Decoder::new(File::open(&archive_path).unwrap()).unwrap();
        let mut archive = tar::Archive::new(decoder);
        let mut files = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.header().entry_type().is_file() {
                let path = entry.path().unwrap().to_string_lossy().into_owned();
                let mut content = String::new();
                entry.read_to_string(&mut content).unwrap();
                files.push((path, content));
            }
        }
        files.sort();
        assert_eq!(
            files,
            vec![
                ("dataset/1abc.cif".to_string(), "data_LIG\n".to_string()),
                ("dataset/1abc.pdb".to_string(), "ATOM\n".to_string()),
            ]
        );
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        let result = archive_directory(&root.path().join("absent"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
