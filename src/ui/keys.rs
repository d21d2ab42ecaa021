use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};

use crate::Message;

/// What a shortcut asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    First,
    Last,
    /// Close the lightbox, or clear the selection in the grid
    Close,
    CycleViewMode,
    ToggleSelected,
    ToggleDiscarded,
    MarkReviewed,
    CycleFilter,
    SelectAll,
}

pub fn key_action(key: &Key, modifiers: Modifiers) -> Option<KeyAction> {
    match key {
        Key::Named(Named::ArrowRight) => Some(KeyAction::Next),
        Key::Named(Named::ArrowLeft) => Some(KeyAction::Previous),
        Key::Named(Named::Home) => Some(KeyAction::First),
        Key::Named(Named::End) => Some(KeyAction::Last),
        Key::Named(Named::Escape) => Some(KeyAction::Close),
        Key::Named(Named::Space) => Some(KeyAction::ToggleSelected),
        Key::Character(c) => match c.as_str() {
            "a" if modifiers.command() => Some(KeyAction::SelectAll),
            "v" => Some(KeyAction::CycleViewMode),
            "d" => Some(KeyAction::ToggleDiscarded),
            "r" => Some(KeyAction::MarkReviewed),
            "f" => Some(KeyAction::CycleFilter),
            _ => None,
        },
        _ => None,
    }
}

/// Handler for `keyboard::on_key_press`
pub fn on_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    key_action(&key, modifiers).map(Message::Key)
}
