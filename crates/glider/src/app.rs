use anyhow::Result;
use colored::Colorize;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    ModifierKeyCode, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement};
use notify_debouncer_mini::notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use glider::config::AppConfig;
use glider::engine::{Engine, NavAction};
use glider::error::Error;
use glider::hotkeys::{HotkeyManager, KeyId};
use glider::surface::HtmlFileSurface;

type DescriptorWatcher = Debouncer<notify_debouncer_mini::notify::RecommendedWatcher>;

/// Present a deck in the terminal.
///
/// The composed documents go to an [`HtmlFileSurface`]; the terminal owns
/// navigation. Arrow keys, space and backspace navigate directly; when the
/// terminal can report key releases, raw press/release events additionally
/// feed the chord matcher so the configured hotkey combinations work. The
/// engine stays on this thread; key handlers and the descriptor watcher
/// only send `NavAction`s over its channel.
pub fn run(file: Option<PathBuf>, open_preview: bool) -> Result<()> {
    let config = AppConfig::load_or_default();

    let interactive = file.is_none();
    let mut descriptor = match file {
        Some(file) => file,
        None => prompt_for_deck(&config)?,
    };

    let surface = HtmlFileSurface::new(open_preview)?;
    let preview_path = surface.path().to_path_buf();
    let mut engine = Engine::new(Box::new(surface));

    // Deck-load failures require a retry, never a silent fallback: re-prompt
    // when we prompted in the first place, otherwise surface the error.
    loop {
        match engine.load_deck(&descriptor) {
            Ok(()) => break,
            Err(e) if interactive => {
                eprintln!("{} {e}", "error:".red());
                descriptor = prompt_for_deck(&config)?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let actions = engine.action_sender();
    let mut hotkeys = HotkeyManager::new(&config.hotkeys);
    {
        let tx = actions.clone();
        hotkeys.set_next_handler(move || {
            let _ = tx.send(NavAction::Next);
        });
    }
    {
        let tx = actions.clone();
        hotkeys.set_previous_handler(move || {
            let _ = tx.send(NavAction::Previous);
        });
    }

    // Held for the whole run; dropping it would stop reload notifications
    let _watcher = watch_descriptor(&descriptor, actions.clone());

    eprintln!(
        "Presenting {} (slides render to {})",
        descriptor.display(),
        preview_path.display()
    );
    eprintln!("Right/Space: next   Left/Backspace: previous   r: reload   q/Esc: quit");

    let chords_enabled = supports_keyboard_enhancement().unwrap_or(false);
    enable_raw_mode()?;
    if chords_enabled {
        execute!(
            stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    } else {
        let degraded = Error::HotkeyRegistration(
            "terminal does not report key releases".to_string(),
        );
        tracing::warn!("{degraded}; chords disabled, local navigation remains available");
        print_line(&format!(
            "{} chorded hotkeys unavailable in this terminal; use the navigation keys",
            "warning:".yellow()
        ));
    }
    print_status(&engine);

    let result = event_loop(&mut engine, &mut hotkeys, &actions, chords_enabled);

    if chords_enabled {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    let _ = disable_raw_mode();
    engine.shutdown();
    result
}

fn event_loop(
    engine: &mut Engine,
    hotkeys: &mut HotkeyManager,
    actions: &Sender<NavAction>,
    chords_enabled: bool,
) -> Result<()> {
    loop {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if handle_key(actions, hotkeys, chords_enabled, key) {
                    return Ok(());
                }
            }
        }
        if engine.pump() {
            print_status(engine);
        }
    }
}

/// Feed one terminal key event to the chord matcher and the local
/// navigation keys. Returns `true` when the app should quit.
fn handle_key(
    actions: &Sender<NavAction>,
    hotkeys: &mut HotkeyManager,
    chords_enabled: bool,
    key: KeyEvent,
) -> bool {
    if chords_enabled {
        if let Some(id) = key_id(key.code) {
            match key.kind {
                // OS key-repeat is a fresh key-down as far as chords care
                KeyEventKind::Press | KeyEventKind::Repeat => hotkeys.key_down(id),
                KeyEventKind::Release => hotkeys.key_up(id),
            }
        }
    }

    if key.kind != KeyEventKind::Press {
        return false;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    // Modified keys belong to chords, not local navigation
    if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return true,
        KeyCode::Right | KeyCode::Char(' ') => {
            let _ = actions.send(NavAction::Next);
        }
        KeyCode::Left | KeyCode::Backspace => {
            let _ = actions.send(NavAction::Previous);
        }
        KeyCode::Home => {
            let _ = actions.send(NavAction::GoTo(0));
        }
        KeyCode::Char('r') => {
            let _ = actions.send(NavAction::Reload);
        }
        _ => {}
    }
    false
}

fn key_id(code: KeyCode) -> Option<KeyId> {
    match code {
        KeyCode::Char(' ') => Some(KeyId::Space),
        KeyCode::Char(c) => Some(KeyId::Char(c.to_ascii_lowercase())),
        KeyCode::Left => Some(KeyId::Left),
        KeyCode::Right => Some(KeyId::Right),
        KeyCode::Up => Some(KeyId::Up),
        KeyCode::Down => Some(KeyId::Down),
        KeyCode::Esc => Some(KeyId::Esc),
        KeyCode::Modifier(modifier) => modifier_key_id(modifier),
        _ => None,
    }
}

fn modifier_key_id(code: ModifierKeyCode) -> Option<KeyId> {
    match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Some(KeyId::Shift),
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Some(KeyId::Ctrl),
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Some(KeyId::Alt),
        ModifierKeyCode::LeftSuper
        | ModifierKeyCode::RightSuper
        | ModifierKeyCode::LeftMeta
        | ModifierKeyCode::RightMeta => Some(KeyId::Cmd),
        _ => None,
    }
}

fn print_status(engine: &Engine) {
    let Some(index) = engine.current_index() else {
        print_line(&format!("{}", "no deck loaded".yellow()));
        return;
    };
    let affordances = engine.affordances();
    let previous = if affordances.can_previous { "<" } else { " " };
    let next = if affordances.can_next { ">" } else { " " };
    print_line(&format!(
        "{previous} slide {}/{} {next}  {}",
        index + 1,
        engine.slide_count(),
        engine.title().unwrap_or_default().dimmed()
    ));
}

/// Raw mode needs explicit carriage returns.
fn print_line(line: &str) {
    print!("{line}\r\n");
    let _ = stdout().flush();
}

fn prompt_for_deck(config: &AppConfig) -> Result<PathBuf> {
    let start_dir = expand_home(&config.slides.default_directory);
    let mut initial = start_dir.display().to_string();
    if !initial.ends_with('/') {
        initial.push('/');
    }
    let answer = inquire::Text::new("Deck descriptor:")
        .with_help_message("path to a YAML deck descriptor, e.g. slides.yaml")
        .with_initial_value(&initial)
        .prompt()?;
    Ok(expand_home(answer.trim()))
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.strip_prefix('/').unwrap_or(rest);
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }
    PathBuf::from(path)
}

fn watch_descriptor(descriptor: &Path, actions: Sender<NavAction>) -> Option<DescriptorWatcher> {
    let debouncer = new_debouncer(
        Duration::from_millis(300),
        move |result: DebounceEventResult| match result {
            Ok(events) if !events.is_empty() => {
                let _ = actions.send(NavAction::Reload);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("descriptor watch error: {e}"),
        },
    );
    match debouncer {
        Ok(mut debouncer) => match debouncer
            .watcher()
            .watch(descriptor, RecursiveMode::NonRecursive)
        {
            Ok(()) => Some(debouncer),
            Err(e) => {
                tracing::warn!("live reload unavailable: {e}");
                None
            }
        },
        Err(e) => {
            tracing::warn!("live reload unavailable: {e}");
            None
        }
    }
}
