use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::focus::Direction;
use crate::session::SessionInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    FocusUp,
    FocusDown,
    FocusLeft,
    FocusRight,
    Activate,
    Cancel,
}

impl Action {
    pub fn session_input(self) -> SessionInput {
        match self {
            Action::FocusUp => SessionInput::Navigate(Direction::Up),
            Action::FocusDown => SessionInput::Navigate(Direction::Down),
            Action::FocusLeft => SessionInput::Navigate(Direction::Left),
            Action::FocusRight => SessionInput::Navigate(Direction::Right),
            Action::Activate => SessionInput::Activate,
            Action::Cancel => SessionInput::Cancel,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::FocusUp => "Focus window above",
            Action::FocusDown => "Focus window below",
            Action::FocusLeft => "Focus window to the left",
            Action::FocusRight => "Focus window to the right",
            Action::Activate => "Switch to focused window",
            Action::Cancel => "Close overview",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(FocusUp, KeyCombo::plain(KeyCode::Up));
        kb.add(FocusUp, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(FocusDown, KeyCombo::plain(KeyCode::Down));
        kb.add(FocusDown, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(FocusLeft, KeyCombo::plain(KeyCode::Left));
        kb.add(FocusLeft, KeyCombo::plain(KeyCode::Char('h')));
        kb.add(FocusRight, KeyCombo::plain(KeyCode::Right));
        kb.add(FocusRight, KeyCombo::plain(KeyCode::Char('l')));
        kb.add(Activate, KeyCombo::plain(KeyCode::Char(' ')));
        kb.add(Activate, KeyCombo::plain(KeyCode::Enter));
        kb.add(Cancel, KeyCombo::plain(KeyCode::Esc));
        kb.add(Cancel, KeyCombo::plain(KeyCode::Char('q')));
        kb.add(
            Cancel,
            KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_space_to_activate_and_esc_to_cancel() {
        let kb = KeyBindings::default();
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&space), Some(Action::Activate));
        assert_eq!(kb.action_for_key(&esc), Some(Action::Cancel));
    }

    #[test]
    fn arrows_and_vi_keys_navigate() {
        let kb = KeyBindings::default();
        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        let l = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        assert_eq!(
            kb.action_for_key(&left).map(Action::session_input),
            Some(SessionInput::Navigate(Direction::Left))
        );
        assert!(kb.matches(Action::FocusRight, &l));
    }

    #[test]
    fn modified_keys_do_not_match_plain_bindings() {
        let kb = KeyBindings::default();
        let shifted = KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT);
        assert_eq!(kb.action_for_key(&shifted), None);
    }

    #[test]
    fn combos_render_for_help() {
        let kb = KeyBindings::default();
        let combos = kb.combos_for(Action::Activate);
        assert!(combos.contains(&"Space".to_string()));
        assert!(kb.combos_for(Action::Cancel).contains(&"Ctrl+C".to_string()));
    }
}
