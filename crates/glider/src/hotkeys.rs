//! Global hotkey chord matching.
//!
//! The matcher is pure state-transition logic over `key_down`/`key_up`
//! events; how those events are produced (an OS-global listener, terminal
//! key reports, a test driver) is the caller's concern. When no event source
//! is available at all, the application simply runs without hotkeys.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::HotkeysConfig;

/// A single key as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyId {
    Cmd,
    Alt,
    Shift,
    Ctrl,
    Left,
    Right,
    Up,
    Down,
    Space,
    Esc,
    Char(char),
}

impl KeyId {
    /// Parse a configured key name.
    ///
    /// Unknown or malformed names degrade to a literal-character key (first
    /// character, lowercased) instead of invalidating the binding table.
    /// Empty names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_lowercase();
        let key = match lowered.as_str() {
            "" => return None,
            "cmd" | "super" | "meta" => Self::Cmd,
            "alt" | "option" => Self::Alt,
            "shift" => Self::Shift,
            "ctrl" | "control" => Self::Ctrl,
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "space" => Self::Space,
            "esc" | "escape" => Self::Esc,
            other => Self::Char(other.chars().next().expect("non-empty name")),
        };
        Some(key)
    }
}

/// Named actions a chord can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextSlide,
    PreviousSlide,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NextSlide => "next_slide",
            Self::PreviousSlide => "previous_slide",
        }
    }
}

/// When a satisfied chord fires.
///
/// `Level` fires on every qualifying key-down while the chord's key-set is a
/// subset of the active set, so OS key-repeat retriggers the action. `Edge`
/// fires only on the transition into the fully satisfied set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FireMode {
    #[default]
    Level,
    Edge,
}

impl FireMode {
    pub fn is_level(&self) -> bool {
        *self == Self::Level
    }
}

#[derive(Debug, Clone)]
struct Binding {
    action: Action,
    keys: HashSet<KeyId>,
    satisfied: bool,
}

/// Matches configured key-sets against the set of currently depressed keys.
///
/// The binding table is built once at startup and immutable for the run.
/// An action fires if and only if its entire key-set is a subset of the
/// active set after a key-down; releases only shrink the set and never fire.
/// Multiple simultaneously satisfied bindings all fire on the same event.
#[derive(Debug)]
pub struct ChordMatcher {
    bindings: Vec<Binding>,
    active: HashSet<KeyId>,
    fire_mode: FireMode,
}

impl ChordMatcher {
    pub fn from_config(config: &HotkeysConfig) -> Self {
        let mut matcher = Self {
            bindings: Vec::new(),
            active: HashSet::new(),
            fire_mode: config.fire_mode,
        };
        matcher.add_binding(Action::NextSlide, &config.next_slide);
        matcher.add_binding(Action::PreviousSlide, &config.previous_slide);
        matcher
    }

    fn add_binding(&mut self, action: Action, names: &[String]) {
        let mut keys = HashSet::new();
        for name in names {
            match KeyId::parse(name) {
                Some(key) => {
                    keys.insert(key);
                }
                None => tracing::warn!(
                    action = action.name(),
                    "ignoring empty key name in hotkey binding"
                ),
            }
        }
        // An empty set is a subset of every active set and would fire on
        // every key-down; such a binding is dropped instead.
        if keys.is_empty() {
            tracing::warn!(
                action = action.name(),
                "hotkey binding has no usable keys; disabled"
            );
            return;
        }
        self.bindings.push(Binding {
            action,
            keys,
            satisfied: false,
        });
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Record a key press and return every action whose chord is satisfied
    /// by the new active set.
    pub fn key_down(&mut self, key: KeyId) -> Vec<Action> {
        self.active.insert(key);
        let mut fired = Vec::new();
        for binding in &mut self.bindings {
            let satisfied = binding.keys.is_subset(&self.active);
            let fire = match self.fire_mode {
                FireMode::Level => satisfied,
                FireMode::Edge => satisfied && !binding.satisfied,
            };
            binding.satisfied = satisfied;
            if fire {
                fired.push(binding.action);
            }
        }
        fired
    }

    /// Record a key release. Releasing never fires an action.
    pub fn key_up(&mut self, key: KeyId) {
        self.active.remove(&key);
        for binding in &mut self.bindings {
            binding.satisfied = binding.keys.is_subset(&self.active);
        }
    }
}

type Handler = Box<dyn FnMut() + Send>;

/// Owns the chord matcher plus the single next/previous handler slots.
///
/// Handlers run synchronously on whatever thread delivers the raw key
/// events; they are expected to marshal into the engine's owning context
/// (e.g. by sending a `NavAction` over its channel).
pub struct HotkeyManager {
    matcher: ChordMatcher,
    next_handler: Option<Handler>,
    previous_handler: Option<Handler>,
}

impl HotkeyManager {
    pub fn new(config: &HotkeysConfig) -> Self {
        Self {
            matcher: ChordMatcher::from_config(config),
            next_handler: None,
            previous_handler: None,
        }
    }

    pub fn set_next_handler(&mut self, handler: impl FnMut() + Send + 'static) {
        self.next_handler = Some(Box::new(handler));
    }

    pub fn set_previous_handler(&mut self, handler: impl FnMut() + Send + 'static) {
        self.previous_handler = Some(Box::new(handler));
    }

    pub fn has_bindings(&self) -> bool {
        self.matcher.binding_count() > 0
    }

    pub fn key_down(&mut self, key: KeyId) {
        for action in self.matcher.key_down(key) {
            let handler = match action {
                Action::NextSlide => self.next_handler.as_mut(),
                Action::PreviousSlide => self.previous_handler.as_mut(),
            };
            if let Some(handler) = handler {
                handler();
            }
        }
    }

    pub fn key_up(&mut self, key: KeyId) {
        self.matcher.key_up(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn config(next: &[&str], previous: &[&str], fire_mode: FireMode) -> HotkeysConfig {
        HotkeysConfig {
            next_slide: next.iter().map(|s| s.to_string()).collect(),
            previous_slide: previous.iter().map(|s| s.to_string()).collect(),
            fire_mode,
        }
    }

    fn matcher(next: &[&str], previous: &[&str]) -> ChordMatcher {
        ChordMatcher::from_config(&config(next, previous, FireMode::Level))
    }

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(KeyId::parse("cmd"), Some(KeyId::Cmd));
        assert_eq!(KeyId::parse("SHIFT"), Some(KeyId::Shift));
        assert_eq!(KeyId::parse("right"), Some(KeyId::Right));
        assert_eq!(KeyId::parse("esc"), Some(KeyId::Esc));
    }

    #[test]
    fn test_parse_character_keys() {
        assert_eq!(KeyId::parse("n"), Some(KeyId::Char('n')));
        assert_eq!(KeyId::parse("P"), Some(KeyId::Char('p')));
    }

    #[test]
    fn test_parse_unknown_name_degrades_to_char() {
        assert_eq!(KeyId::parse("frobnicate"), Some(KeyId::Char('f')));
    }

    #[test]
    fn test_parse_empty_name() {
        assert_eq!(KeyId::parse(""), None);
        assert_eq!(KeyId::parse("   "), None);
    }

    #[test]
    fn test_chord_fires_when_completed() {
        let mut m = matcher(&["cmd", "right"], &["cmd", "left"]);
        assert!(m.key_down(KeyId::Cmd).is_empty());
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
    }

    #[test]
    fn test_key_repeat_fires_again() {
        let mut m = matcher(&["cmd", "right"], &["cmd", "left"]);
        m.key_down(KeyId::Cmd);
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
        // OS key-repeat delivers another key-down for an already-active key
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
    }

    #[test]
    fn test_release_breaks_chord() {
        let mut m = matcher(&["cmd", "right"], &["cmd", "left"]);
        m.key_down(KeyId::Cmd);
        m.key_down(KeyId::Right);
        m.key_up(KeyId::Cmd);
        assert!(m.key_down(KeyId::Right).is_empty());
    }

    #[test]
    fn test_release_never_fires() {
        let mut m = matcher(&["cmd", "right"], &["cmd", "left"]);
        m.key_down(KeyId::Cmd);
        m.key_down(KeyId::Right);
        // key_up has no return; the observable effect is that the chord is
        // no longer satisfied afterwards
        m.key_up(KeyId::Right);
        m.key_up(KeyId::Cmd);
        assert!(m.key_down(KeyId::Left).is_empty());
    }

    #[test]
    fn test_extra_active_keys_still_match() {
        let mut m = matcher(&["cmd", "right"], &["cmd", "left"]);
        m.key_down(KeyId::Cmd);
        m.key_down(KeyId::Shift);
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
    }

    #[test]
    fn test_overlapping_bindings_all_fire() {
        let mut m = matcher(&["space"], &["space", "shift"]);
        m.key_down(KeyId::Shift);
        let fired = m.key_down(KeyId::Space);
        assert_eq!(fired, vec![Action::NextSlide, Action::PreviousSlide]);
    }

    #[test]
    fn test_edge_mode_fires_once_per_formation() {
        let mut m =
            ChordMatcher::from_config(&config(&["cmd", "right"], &["cmd", "left"], FireMode::Edge));
        m.key_down(KeyId::Cmd);
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
        // Repeat of an already-included key does not re-fire in edge mode
        assert!(m.key_down(KeyId::Right).is_empty());
        // Breaking and re-forming the chord fires again
        m.key_up(KeyId::Right);
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
    }

    #[test]
    fn test_empty_binding_disabled() {
        let m = matcher(&[], &["cmd", "left"]);
        assert_eq!(m.binding_count(), 1);
    }

    #[test]
    fn test_blank_names_dropped_from_set() {
        let mut m = matcher(&["", "right"], &["cmd", "left"]);
        assert_eq!(m.key_down(KeyId::Right), vec![Action::NextSlide]);
    }

    #[test]
    fn test_manager_invokes_handler_slots() {
        let next_count = Arc::new(AtomicUsize::new(0));
        let previous_count = Arc::new(AtomicUsize::new(0));
        let mut manager = HotkeyManager::new(&config(
            &["cmd", "right"],
            &["cmd", "left"],
            FireMode::Level,
        ));
        {
            let count = Arc::clone(&next_count);
            manager.set_next_handler(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let count = Arc::clone(&previous_count);
            manager.set_previous_handler(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        manager.key_down(KeyId::Cmd);
        manager.key_down(KeyId::Right);
        assert_eq!(next_count.load(Ordering::SeqCst), 1);
        assert_eq!(previous_count.load(Ordering::SeqCst), 0);

        manager.key_up(KeyId::Right);
        manager.key_down(KeyId::Left);
        assert_eq!(previous_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_manager_without_handlers_is_harmless() {
        let mut manager = HotkeyManager::new(&config(
            &["cmd", "right"],
            &["cmd", "left"],
            FireMode::Level,
        ));
        manager.key_down(KeyId::Cmd);
        manager.key_down(KeyId::Right);
    }
}
