use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A uniquely named scratch file backing one slide's inline content.
///
/// Gives inline markdown the same path-addressable identity as file-based
/// slides. The handle owns the file for its whole lifetime: created when the
/// slide is built, deleted by [`ScratchFile::dispose`] when the deck is
/// replaced or discarded. Disposal is idempotent, and a failed delete is
/// logged rather than propagated; `Drop` acts as a backstop.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    disposed: bool,
}

impl ScratchFile {
    pub fn create(content: &str) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("glider-slide-")
            .suffix(".md")
            .tempfile()?;
        file.write_all(content.as_bytes())?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(Self {
            path,
            disposed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the backing file. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                "failed to remove slide scratch file: {e}"
            );
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_writes_content() {
        let mut scratch = ScratchFile::create("# Inline\n").expect("scratch file");
        let text = fs::read_to_string(scratch.path()).expect("readable");
        assert_eq!(text, "# Inline\n");
        scratch.dispose();
    }

    #[test]
    fn test_dispose_removes_file() {
        let mut scratch = ScratchFile::create("body").expect("scratch file");
        let path = scratch.path().to_path_buf();
        assert!(path.exists());
        scratch.dispose();
        assert!(!path.exists());
    }

    #[test]
    fn test_double_dispose_is_noop() {
        let mut scratch = ScratchFile::create("body").expect("scratch file");
        scratch.dispose();
        scratch.dispose();
    }

    #[test]
    fn test_drop_removes_file() {
        let path = {
            let scratch = ScratchFile::create("body").expect("scratch file");
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_unique_paths() {
        let a = ScratchFile::create("one").expect("scratch file");
        let b = ScratchFile::create("two").expect("scratch file");
        assert_ne!(a.path(), b.path());
    }
}
