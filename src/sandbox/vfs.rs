use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

use crate::wire::FileRef;

/// Scratch filesystem visible to the sandboxed script.
///
/// User-selected files are copied in under a random per-mount directory,
/// so repeated mounts of the same file (or of different files with the
/// same name) land at distinct paths. The whole tree is deleted when the
/// sandbox is dropped.
pub struct ScratchFs {
    root: TempDir,
}

impl ScratchFs {
    pub fn new() -> io::Result<Self> {
        let root = tempfile::Builder::new().prefix("datapledge-fs-").tempdir()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Copy the referenced file into the scratch tree and return the path
    /// the script should read it from.
    pub fn mount(&self, file: &FileRef) -> io::Result<PathBuf> {
        let slot = self
            .root
            .path()
            .join(Uuid::new_v4().simple().to_string());
        fs::create_dir(&slot)?;

        // Only the final path component; a crafted name must not escape
        // the scratch tree.
        let name = Path::new(&file.name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("upload"));
        let target = slot.join(name);

        fs::copy(&file.path, &target)?;
        debug!(source = %file.path.display(), target = %target.display(), "file mounted into sandbox");
        Ok(target)
    }
}
