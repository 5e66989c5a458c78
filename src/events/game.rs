//! Application events carried by the [`EventBus`](crate::events::bus::EventBus).

use crate::events::bus::{BusEvent, EventKind};
use crate::menu::MenuData;

/// Dense tag of a [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEventType {
    MenuSel,
    MenuClick,
    BgMusic,
    MenuMusic,
    PauseMusic,
    ResumeMusic,
    MenuAction,
}

impl GameEventType {
    pub const ALL: [GameEventType; 7] = [
        GameEventType::MenuSel,
        GameEventType::MenuClick,
        GameEventType::BgMusic,
        GameEventType::MenuMusic,
        GameEventType::PauseMusic,
        GameEventType::ResumeMusic,
        GameEventType::MenuAction,
    ];
}

impl EventKind for GameEventType {
    const COUNT: usize = GameEventType::ALL.len();

    fn index(self) -> usize {
        self as usize
    }
}

/// Events raised by layers and consumed by observers such as the audio system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A menu entry was confirmed or the menu was opened/closed.
    MenuSel,
    /// Menu highlight moved.
    MenuClick,
    /// Switch to the in-game music track.
    BgMusic,
    /// Switch to the menu music track.
    MenuMusic,
    PauseMusic,
    ResumeMusic,
    /// A menu selection the menu layer does not handle itself.
    MenuAction(MenuData),
}

impl BusEvent for GameEvent {
    type Kind = GameEventType;

    fn kind(&self) -> GameEventType {
        match self {
            GameEvent::MenuSel => GameEventType::MenuSel,
            GameEvent::MenuClick => GameEventType::MenuClick,
            GameEvent::BgMusic => GameEventType::BgMusic,
            GameEvent::MenuMusic => GameEventType::MenuMusic,
            GameEvent::PauseMusic => GameEventType::PauseMusic,
            GameEvent::ResumeMusic => GameEventType::ResumeMusic,
            GameEvent::MenuAction(_) => GameEventType::MenuAction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense() {
        for (i, kind) in GameEventType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(GameEventType::COUNT, 7);
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(GameEvent::BgMusic.kind(), GameEventType::BgMusic);
        let data = MenuData { key: 1, value: 2 };
        assert_eq!(GameEvent::MenuAction(data).kind(), GameEventType::MenuAction);
    }
}
