//! Engine configuration: key bindings and their persistence.
//!
//! Bindings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/<app>/config.toml` (default `~/.config/<app>/config.toml`).
//! The engine never touches the file on its own; applications opt in with
//! [`EngineConfig::load`].

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// Keys the engine and its widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Leave the event loop immediately.
    Cancel,
    /// Pop the active scene.
    Back,
    /// Move a table selection up.
    SelectUp,
    /// Move a table selection down.
    SelectDown,
    /// Delete the last character of an edit field.
    Erase,
}

impl Action {
    /// Ordered list of all actions (used for the config file and hints).
    pub const ALL: &[Action] = &[
        Action::Cancel,
        Action::Back,
        Action::SelectUp,
        Action::SelectDown,
        Action::Erase,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::Cancel => "Quit",
            Action::Back => "Back",
            Action::SelectUp => "Select Up",
            Action::SelectDown => "Select Down",
            Action::Erase => "Erase",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::Cancel => "cancel",
            Action::Back => "back",
            Action::SelectUp => "select_up",
            Action::SelectDown => "select_down",
            Action::Erase => "erase",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "cancel" => Some(Action::Cancel),
            "back" => Some(Action::Back),
            "select_up" => Some(Action::SelectUp),
            "select_down" => Some(Action::SelectDown),
            "erase" => Some(Action::Erase),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"↑"`, `"Esc"`).
    pub fn display(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            other => key_name(other),
        });
        s
    }

    /// Serialise to config-file format (e.g. `"Ctrl+c"`, `"Up"`).
    fn to_config_string(&self) -> String {
        let mut s = modifier_prefix(self.modifiers);
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            other => key_name(other),
        });
        s
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"Esc"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            // Single characters keep their case: `Q` and `q` are distinct keys.
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

fn modifier_prefix(modifiers: KeyModifiers) -> String {
    let mut s = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        s.push_str("Ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        s.push_str("Alt+");
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        s.push_str("Shift+");
    }
    s
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Engine configuration: which keys trigger which [`Action`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
        }
    }
}

impl EngineConfig {
    /// Built-in bindings: Ctrl+c quits, Esc goes back, arrows move table
    /// selections, Backspace erases.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(
            Cancel,
            vec![KeyBind::new(KeyCode::Char('c'), KeyModifiers::CONTROL)],
        );
        m.insert(Back, vec![KeyBind::new(KeyCode::Esc, n)]);
        m.insert(SelectUp, vec![KeyBind::new(KeyCode::Up, n)]);
        m.insert(SelectDown, vec![KeyBind::new(KeyCode::Down, n)]);
        m.insert(Erase, vec![KeyBind::new(KeyCode::Backspace, n)]);

        m
    }

    /// Does `event` trigger `action`?
    pub fn matches(&self, action: Action, event: KeyEvent) -> bool {
        self.bindings
            .get(&action)
            .is_some_and(|binds| binds.iter().any(|b| b.matches(event)))
    }

    /// Format the binding list for a given action (e.g. `"Esc/q"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// One-line hint for a status bar, built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: {} | {}: {}",
            self.display_bindings(Action::Back),
            Action::Back.label().to_lowercase(),
            self.display_bindings(Action::Cancel),
            Action::Cancel.label().to_lowercase(),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load `$XDG_CONFIG_HOME/<app_name>/config.toml`, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load(app_name: &str) -> Self {
        let path = config_path(app_name);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!("loaded key bindings from {}", path.display());
                Self::parse_config(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Persist the current bindings, creating the config directory if needed.
    pub fn save(&self, app_name: &str) -> anyhow::Result<PathBuf> {
        let path = config_path(app_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    /// Parse the config text. Unknown keys and unparsable bindings are
    /// skipped; actions without a valid binding keep their default.
    pub fn parse_config(s: &str) -> Self {
        let mut bindings = Self::default_bindings();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };

            let Some(action) = Action::from_config_key(key.trim()) else {
                continue;
            };

            let mut parsed = Vec::new();
            for part in value.split(',') {
                let part = part.trim().trim_matches('"');
                if let Some(bind) = KeyBind::parse(part) {
                    parsed.push(bind);
                }
            }
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Self { bindings }
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# imtui key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/<app_name>/config.toml`).
fn config_path(app_name: &str) -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(app_name).join("config.toml")
}
