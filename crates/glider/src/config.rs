use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::hotkeys::FireMode;

const FILENAME: &str = "config.json";
const APP_DIR: &str = "glider";

/// Application-wide configuration.
///
/// Lives at `<config dir>/glider/config.json`. A missing file is replaced by
/// a freshly written default; a partial file is merged section by section
/// over the defaults, so unrelated sections keep their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub hotkeys: HotkeysConfig,
    pub window: WindowConfig,
    pub slides: SlidesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotkeysConfig {
    pub next_slide: Vec<String>,
    pub previous_slide: Vec<String>,
    /// Chord firing semantics; level-triggered unless configured otherwise.
    #[serde(default, skip_serializing_if = "FireMode::is_level")]
    pub fire_mode: FireMode,
}

/// Consumed by the window-owning collaborator; carried and persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlidesConfig {
    pub default_directory: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkeys: HotkeysConfig {
                next_slide: keys(&["cmd", "alt", "shift", "right"]),
                previous_slide: keys(&["cmd", "alt", "shift", "left"]),
                fire_mode: FireMode::Level,
            },
            window: WindowConfig {
                width: 800,
                height: 600,
                fullscreen: false,
            },
            slides: SlidesConfig {
                default_directory: "~".to_string(),
            },
        }
    }
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// On-disk shape: every section and key optional, merged over defaults.
#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    hotkeys: Option<PartialHotkeys>,
    window: Option<PartialWindow>,
    slides: Option<PartialSlides>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialHotkeys {
    next_slide: Option<Vec<String>>,
    previous_slide: Option<Vec<String>>,
    fire_mode: Option<FireMode>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialWindow {
    width: Option<u32>,
    height: Option<u32>,
    fullscreen: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct PartialSlides {
    default_directory: Option<String>,
}

impl AppConfig {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| {
                Error::File("could not determine the user configuration directory".to_string())
            })
    }

    /// Load from `path`, merging present keys over the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read config: {e}"), path))?;
        let partial: PartialConfig = serde_json::from_str(&text)
            .map_err(|e| Error::config(format!("failed to parse config: {e}"), path))?;
        Ok(Self::default().merged(partial))
    }

    /// Load from `path`; when the file does not exist, write a fresh default
    /// file and return the defaults.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Load from the standard location, falling back to defaults on any
    /// failure (logged, never fatal).
    pub fn load_or_default() -> Self {
        let attempt = Self::path().and_then(|path| Self::load_or_init(&path));
        match attempt {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("using default configuration: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {e}"), path))?;
        fs::write(path, json)?;
        Ok(())
    }

    fn merged(mut self, partial: PartialConfig) -> Self {
        if let Some(hotkeys) = partial.hotkeys {
            if let Some(next) = hotkeys.next_slide {
                self.hotkeys.next_slide = next;
            }
            if let Some(previous) = hotkeys.previous_slide {
                self.hotkeys.previous_slide = previous;
            }
            if let Some(fire_mode) = hotkeys.fire_mode {
                self.hotkeys.fire_mode = fire_mode;
            }
        }
        if let Some(window) = partial.window {
            if let Some(width) = window.width {
                self.window.width = width;
            }
            if let Some(height) = window.height {
                self.window.height = height;
            }
            if let Some(fullscreen) = window.fullscreen {
                self.window.fullscreen = fullscreen;
            }
        }
        if let Some(slides) = partial.slides {
            if let Some(dir) = slides.default_directory {
                self.slides.default_directory = dir;
            }
        }
        self
    }
}
