//! Output packaging through the system `tar`.

use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Bundle `files` into a gzip-compressed tarball at `archive`.
///
/// Entries are stored by file name only, relative to their own directory.
pub fn create_tarball(archive: &Path, files: &[&Path]) -> AppResult<()> {
    if files.is_empty() {
        return Err(AppError::Package {
            message: "nothing to package".to_string(),
        });
    }

    let mut command = Command::new("tar");
    command.arg("-czf").arg(archive);
    for file in files {
        let name = file.file_name().ok_or_else(|| AppError::Package {
            message: format!("{} has no file name", file.display()),
        })?;
        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // successive -C options are relative to each other
        let dir = std::path::absolute(dir)?;
        command.arg("-C").arg(dir).arg(name);
    }

    debug!(archive = %archive.display(), files = files.len(), "running tar");
    let output = command.output().map_err(|err| AppError::Package {
        message: format!("failed to run tar: {err}"),
    })?;
    if !output.status.success() {
        return Err(AppError::Package {
            message: format!(
                "tar exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_list_is_rejected() {
        let archive = std::env::temp_dir().join("gt_app_nothing.tar.gz");
        assert!(matches!(
            create_tarball(&archive, &[]),
            Err(AppError::Package { .. })
        ));
    }
}
