use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the presentation engine.
///
/// Rendering and hotkey failures are contained at their component boundary
/// and degrade (error fragment in place of slide content, local-only
/// navigation); only configuration and deck-load failures propagate to the
/// caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Descriptor or application configuration is missing, unreadable, or
    /// malformed.
    #[error("configuration error: {message} ({path})")]
    Config { message: String, path: PathBuf },
    /// A descriptor parsed cleanly but produced no usable slides.
    #[error("deck contains no slides: {0}")]
    EmptyDeck(PathBuf),
    /// Slide-file or backing-resource I/O failure.
    #[error("file error: {0}")]
    File(String),
    /// Markdown rendering failed.
    #[error("markdown render error: {0}")]
    Render(String),
    /// The global key listener is unavailable; in-app navigation still works.
    #[error("hotkey registration error: {0}")]
    HotkeyRegistration(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: path.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
