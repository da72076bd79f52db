pub mod scratch;
pub mod style;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use scratch::ScratchFile;
use style::StyleMap;

pub const DEFAULT_TITLE: &str = "Markdown Presentation";

/// One slide of a loaded deck.
///
/// Immutable after construction: the deck is reloaded wholesale rather than
/// mutated in place.
#[derive(Debug)]
pub struct Slide {
    index: usize,
    style: StyleMap,
    source: SlideSource,
}

#[derive(Debug)]
enum SlideSource {
    /// A markdown file referenced by the descriptor.
    File(PathBuf),
    /// Inline descriptor content materialized to a scratch file.
    Inline(ScratchFile),
}

impl Slide {
    /// Zero-based position; insertion order is presentation order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Fully resolved style (defaults, deck override, slide override).
    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    /// Path to the markdown source. Inline slides answer with their backing
    /// file, so every slide is path-addressable.
    pub fn path(&self) -> &Path {
        match &self.source {
            SlideSource::File(path) => path,
            SlideSource::Inline(backing) => backing.path(),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self.source, SlideSource::Inline(_))
    }

    fn dispose(&mut self) {
        if let SlideSource::Inline(backing) = &mut self.source {
            backing.dispose();
        }
    }
}

/// An ordered, styled collection of slides loaded from one descriptor.
#[derive(Debug)]
pub struct Deck {
    title: String,
    global_style: StyleMap,
    slides: Vec<Slide>,
    warnings: Vec<String>,
}

/// Raw deck descriptor shape.
#[derive(Debug, Deserialize)]
struct DeckFile {
    title: Option<String>,
    style: Option<StyleMap>,
    slides: Option<Vec<SlideEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SlideEntry {
    /// Bare string: a path to a markdown file.
    Path(String),
    Detailed {
        path: Option<String>,
        content: Option<String>,
        style: Option<StyleMap>,
    },
}

impl Deck {
    /// Load a deck from a YAML descriptor.
    ///
    /// Relative slide paths resolve against the descriptor's directory, not
    /// the process working directory. An entry with both `path` and `content`
    /// is ill-formed and errors rather than silently picking one. A failed
    /// inline materialization skips that slide (recorded in
    /// [`Deck::warnings`]) while the rest of the deck still loads.
    pub fn load(descriptor: &Path) -> Result<Self> {
        let text = fs::read_to_string(descriptor).map_err(|e| {
            Error::config(format!("failed to read deck descriptor: {e}"), descriptor)
        })?;
        let file: DeckFile = serde_yaml::from_str(&text).map_err(|e| {
            Error::config(format!("failed to parse deck descriptor: {e}"), descriptor)
        })?;

        let entries = file
            .slides
            .ok_or_else(|| Error::config("'slides' section missing", descriptor))?;
        if entries.is_empty() {
            return Err(Error::EmptyDeck(descriptor.to_path_buf()));
        }

        let base_dir = descriptor.parent().unwrap_or(Path::new("."));
        let mut global_style = StyleMap::defaults();
        if let Some(deck_style) = &file.style {
            global_style.merge_from(deck_style);
        }

        let mut slides: Vec<Slide> = Vec::with_capacity(entries.len());
        let mut warnings = Vec::new();

        for (position, entry) in entries.into_iter().enumerate() {
            let (path, content, slide_style) = match entry {
                SlideEntry::Path(path) => (Some(path), None, None),
                SlideEntry::Detailed {
                    path,
                    content,
                    style,
                } => (path, content, style),
            };

            let mut style = global_style.clone();
            if let Some(over) = &slide_style {
                style.merge_from(over);
            }

            let source = match (path, content) {
                (Some(_), Some(_)) => {
                    return Err(Error::config(
                        format!("slide {position}: 'path' and 'content' are mutually exclusive"),
                        descriptor,
                    ));
                }
                (None, None) => {
                    return Err(Error::config(
                        format!("slide {position}: requires either 'path' or 'content'"),
                        descriptor,
                    ));
                }
                (Some(path), None) => {
                    let resolved = resolve_path(base_dir, &path);
                    fs::File::open(&resolved).map_err(|e| {
                        Error::config(
                            format!("slide {position}: cannot read '{}': {e}", resolved.display()),
                            descriptor,
                        )
                    })?;
                    SlideSource::File(resolved)
                }
                (None, Some(content)) => match ScratchFile::create(&content) {
                    Ok(backing) => SlideSource::Inline(backing),
                    Err(e) => {
                        let message =
                            format!("slide {position}: failed to materialize inline content: {e}");
                        tracing::error!("{message}");
                        warnings.push(message);
                        continue;
                    }
                },
            };

            slides.push(Slide {
                index: slides.len(),
                style,
                source,
            });
        }

        if slides.is_empty() {
            return Err(Error::EmptyDeck(descriptor.to_path_buf()));
        }

        Ok(Self {
            title: file.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            global_style,
            slides,
            warnings,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Deck-level style merged over the built-in defaults; the base layer of
    /// every slide's resolved style.
    pub fn global_style(&self) -> &StyleMap {
        &self.global_style
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Non-fatal problems encountered during load (skipped slides).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Release every slide's backing resource. Idempotent; called when the
    /// deck is replaced or the engine shuts down, with `Drop` as backstop.
    pub fn dispose(&mut self) {
        for slide in &mut self.slides {
            slide.dispose();
        }
    }
}

impl Drop for Deck {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}
