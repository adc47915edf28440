//! Keyboard affordances for the drawing surface.
//!
//! Shortcuts are ignored while a text input has focus, so typing a label
//! elsewhere on the page never deletes or cancels a line.

use serde::{Deserialize, Serialize};

use crate::session::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusTarget {
    #[default]
    Canvas,
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, modifiers: Modifiers::default(), focus: FocusTarget::Canvas }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.focus = FocusTarget::TextInput;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    DeleteLast,
    CancelLine,
    Undo,
    Redo,
}

impl EditorCommand {
    pub fn from_key(event: &KeyEvent) -> Option<Self> {
        if event.focus == FocusTarget::TextInput {
            return None;
        }

        let mods = event.modifiers;
        match event.key {
            Key::Delete | Key::Backspace if !mods.command() => Some(EditorCommand::DeleteLast),
            Key::Escape => Some(EditorCommand::CancelLine),
            Key::Char(c) if mods.command() => match c.to_ascii_lowercase() {
                'z' if mods.shift => Some(EditorCommand::Redo),
                'z' => Some(EditorCommand::Undo),
                'y' if mods.ctrl => Some(EditorCommand::Redo),
                _ => None,
            },
            _ => None,
        }
    }
}

impl EditorSession {
    /// Apply a key press; returns true when the session changed
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match EditorCommand::from_key(event) {
            Some(EditorCommand::DeleteLast) => self.delete_last(),
            Some(EditorCommand::CancelLine) => self.cancel(),
            Some(EditorCommand::Undo) => self.undo(),
            Some(EditorCommand::Redo) => self.redo(),
            None => false,
        }
    }
}
