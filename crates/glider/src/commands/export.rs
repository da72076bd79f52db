use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use glider::deck::Deck;
use glider::render::{compose, MarkdownRenderer};

/// Render every slide of a deck to a standalone HTML document.
pub fn run(file: &Path, output_dir: &Path) -> Result<()> {
    let mut deck = Deck::load(file)?;
    for warning in deck.warnings() {
        eprintln!("  {} {warning}", "warning:".yellow());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let renderer = MarkdownRenderer::new();
    for slide in deck.slides() {
        let html = renderer.render_file(slide.path());
        let document = compose(&html, slide.style(), deck.title());
        let filename = format!("slide-{:03}.html", slide.index() + 1);
        let path = output_dir.join(&filename);
        fs::write(&path, document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  Saved {filename}");
    }

    eprintln!(
        "{} Exported {} slides to {}",
        "✓".green(),
        deck.slide_count(),
        output_dir.display()
    );
    deck.dispose();
    Ok(())
}
