use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::errors::EmitError;

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), EmitError> {
    let data = serde_json::to_vec_pretty(value)?;
    write_bytes_atomic(path, &data)
}

/// Write through a sibling temp file and rename it into place, so readers
/// only ever see the previous file or the complete new one.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<(), EmitError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    if let Err(err) = write_and_rename(&tmp_path, path, data) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err.into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            sync_dir(parent)?;
        }
    }

    Ok(())
}

fn write_and_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    std::fs::rename(tmp_path, path)
}

fn temp_path(path: &Path) -> Result<PathBuf, EmitError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| EmitError::InvalidPath(path.display().to_string()))?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file_without_leaving_temp_files() {
        let dir = std::env::temp_dir().join(format!("stencil_atomic_{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested/users.yml");

        write_bytes_atomic(&path, b"first: 1\n").expect("first write");
        write_bytes_atomic(&path, b"second: 2\n").expect("second write");

        assert_eq!(
            std::fs::read_to_string(&path).expect("read back"),
            "second: 2\n"
        );
        let leftovers: Vec<_> = std::fs::read_dir(dir.join("nested"))
            .expect("list dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn rejects_path_without_file_name() {
        let err = write_bytes_atomic(Path::new("/"), b"x").expect_err("no file name");
        assert!(matches!(err, EmitError::InvalidPath(_)));
    }
}
