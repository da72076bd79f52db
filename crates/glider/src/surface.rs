use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shown when no slide is loaded.
pub const PLACEHOLDER_DOCUMENT: &str = "<html><body><p>No slide loaded</p></body></html>";

/// Display boundary: a single handler slot that accepts complete HTML
/// documents. The engine never knows how documents are presented.
pub trait SlideSurface {
    fn show(&mut self, document: &str);
    /// Display the empty-state placeholder.
    fn clear(&mut self);
}

/// The shipped surface: writes the current document to a scratch HTML file
/// and opens it with the system handler on first show. Any browser pointed
/// at the file keeps working across navigation since the path is stable for
/// the run.
pub struct HtmlFileSurface {
    path: PathBuf,
    open_on_first_show: bool,
    opened: bool,
}

impl HtmlFileSurface {
    pub fn new(open_on_first_show: bool) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("glider-preview-")
            .suffix(".html")
            .tempfile()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(Self {
            path,
            open_on_first_show,
            opened: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlideSurface for HtmlFileSurface {
    fn show(&mut self, document: &str) {
        if let Err(e) = fs::write(&self.path, document) {
            tracing::error!(path = %self.path.display(), "failed to write slide document: {e}");
            return;
        }
        if self.open_on_first_show && !self.opened {
            self.opened = true;
            if let Err(e) = system_open(&self.path) {
                tracing::warn!("could not open slide preview: {e}");
            }
        }
    }

    fn clear(&mut self) {
        if let Err(e) = fs::write(&self.path, PLACEHOLDER_DOCUMENT) {
            tracing::warn!(path = %self.path.display(), "failed to clear slide document: {e}");
        }
    }
}

impl Drop for HtmlFileSurface {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn system_open(path: &Path) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let status = Command::new("open").arg(path).status()?;

    #[cfg(all(unix, not(target_os = "macos")))]
    let status = Command::new("xdg-open").arg(path).status()?;

    #[cfg(target_os = "windows")]
    let status = Command::new("cmd").args(["/C", "start", ""]).arg(path).status()?;

    if !status.success() {
        return Err(io::Error::other(format!(
            "system open command failed with status {status}"
        )));
    }
    Ok(())
}
