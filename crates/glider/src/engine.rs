use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::deck::Deck;
use crate::error::Result;
use crate::nav::{Affordances, Cursor};
use crate::render::{compose, MarkdownRenderer};
use crate::surface::SlideSurface;

/// A navigation intent marshaled into the engine's owning context.
///
/// Hotkey delivery and the descriptor watcher run on other threads; they
/// send actions over the engine's channel instead of touching the cursor
/// directly, keeping the state machine single-threaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Previous,
    GoTo(usize),
    Reload,
}

/// The presentation engine: deck, cursor, render pipeline, display slot.
///
/// Owned by exactly one thread. Every successful index change fetches the
/// target slide, renders it, composes the document, and hands it to the
/// surface. Loading, rendering, and disposal all happen on the owning
/// thread, so a deck's backing resources can never be deleted while a
/// render referencing them is in flight.
pub struct Engine {
    deck: Option<Deck>,
    descriptor: Option<PathBuf>,
    cursor: Cursor,
    renderer: MarkdownRenderer,
    surface: Box<dyn SlideSurface>,
    actions_tx: Sender<NavAction>,
    actions_rx: Receiver<NavAction>,
}

impl Engine {
    pub fn new(surface: Box<dyn SlideSurface>) -> Self {
        let (actions_tx, actions_rx) = mpsc::channel();
        Self {
            deck: None,
            descriptor: None,
            cursor: Cursor::new(),
            renderer: MarkdownRenderer::new(),
            surface,
            actions_tx,
            actions_rx,
        }
    }

    /// A cloneable sender for delivering [`NavAction`]s from other contexts.
    pub fn action_sender(&self) -> Sender<NavAction> {
        self.actions_tx.clone()
    }

    /// Load (or replace) the deck from `descriptor` and show its first
    /// slide. The previous deck's backing resources are released before the
    /// new deck is read. On failure the engine is left unloaded with the
    /// surface cleared, and the error is surfaced to the caller.
    pub fn load_deck(&mut self, descriptor: &Path) -> Result<()> {
        if let Some(mut old) = self.deck.take() {
            old.dispose();
        }
        self.cursor = Cursor::new();

        match Deck::load(descriptor) {
            Ok(deck) => {
                for warning in deck.warnings() {
                    tracing::warn!("{warning}");
                }
                // Deck::load guarantees at least one slide
                let _ = self.cursor.load(deck.slide_count());
                self.deck = Some(deck);
                self.descriptor = Some(descriptor.to_path_buf());
                self.show_current();
                Ok(())
            }
            Err(e) => {
                self.surface.clear();
                Err(e)
            }
        }
    }

    /// Reload the current descriptor, keeping the position when it is still
    /// in range.
    pub fn reload(&mut self) -> Result<()> {
        let Some(descriptor) = self.descriptor.clone() else {
            return Ok(());
        };
        let previous = self.cursor.current();
        self.load_deck(&descriptor)?;
        if let Some(index) = previous {
            let clamped = index.min(self.cursor.slide_count().saturating_sub(1));
            if self.cursor.go_to(clamped) {
                self.show_current();
            }
        }
        Ok(())
    }

    pub fn has_deck(&self) -> bool {
        self.deck.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.deck.as_ref().map(|deck| deck.title())
    }

    pub fn slide_count(&self) -> usize {
        self.cursor.slide_count()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.cursor.current()
    }

    pub fn affordances(&self) -> Affordances {
        self.cursor.affordances()
    }

    pub fn next(&mut self) -> bool {
        let changed = self.cursor.next();
        if changed {
            self.show_current();
        }
        changed
    }

    pub fn previous(&mut self) -> bool {
        let changed = self.cursor.previous();
        if changed {
            self.show_current();
        }
        changed
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        let changed = self.cursor.go_to(index);
        if changed {
            self.show_current();
        }
        changed
    }

    /// Drain pending actions from other contexts. Returns whether the
    /// displayed slide may have changed. Reload failures are contained here:
    /// the engine ends up unloaded with the surface cleared, and the
    /// operator can select a deck again.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Ok(action) = self.actions_rx.try_recv() {
            match action {
                NavAction::Next => changed |= self.next(),
                NavAction::Previous => changed |= self.previous(),
                NavAction::GoTo(index) => changed |= self.go_to(index),
                NavAction::Reload => {
                    match self.reload() {
                        Ok(()) => tracing::info!("deck reloaded"),
                        Err(e) => tracing::error!("deck reload failed: {e}"),
                    }
                    changed = true;
                }
            }
        }
        changed
    }

    /// Re-render and display the current slide.
    pub fn show_current(&mut self) {
        let Some(deck) = &self.deck else { return };
        let Some(index) = self.cursor.current() else {
            return;
        };
        let Some(slide) = deck.slide(index) else {
            return;
        };
        let html = self.renderer.render_file(slide.path());
        let document = compose(&html, slide.style(), deck.title());
        self.surface.show(&document);
    }

    /// Dispose the deck's backing resources and clear the surface.
    pub fn shutdown(&mut self) {
        if let Some(mut deck) = self.deck.take() {
            deck.dispose();
        }
        self.descriptor = None;
        self.cursor = Cursor::new();
        self.surface.clear();
    }
}
