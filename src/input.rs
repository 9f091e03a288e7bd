//! Keyboard routing: raw key events → player commands.
//!
//! Two `InputRouter`s exist per game, one for key-down and one for key-up.
//! Each knows its own direction and translates a key code into at most one
//! `PlayerCommand`. Unknown keys are silently dropped.

use std::collections::HashMap;

use crossterm::event::KeyCode;

use crate::entities::PlayerCommand;
use crate::world::World;

/// Key frames a held key stays live without a fresh press or repeat event,
/// on terminals that never report key releases.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Release,
}

/// A platform key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub code: KeyCode,
    pub action: KeyAction,
}

impl KeyInput {
    pub fn press(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Press,
        }
    }

    pub fn release(code: KeyCode) -> Self {
        Self {
            code,
            action: KeyAction::Release,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputRouter {
    action: KeyAction,
}

impl InputRouter {
    pub fn new(action: KeyAction) -> Self {
        Self { action }
    }

    /// The command this router issues for `code`, if any.
    pub fn command_for(&self, code: KeyCode) -> Option<PlayerCommand> {
        let left = matches!(code, KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A'));
        let right = matches!(code, KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D'));
        let fire = code == KeyCode::Char(' ');

        match self.action {
            KeyAction::Press if left => Some(PlayerCommand::MoveLeft),
            KeyAction::Press if right => Some(PlayerCommand::MoveRight),
            KeyAction::Press if fire => Some(PlayerCommand::Fire),
            KeyAction::Release if left => Some(PlayerCommand::StopLeft),
            KeyAction::Release if right => Some(PlayerCommand::StopRight),
            _ => None,
        }
    }

    /// Issue the command for `code` to the world's player. Returns whether
    /// the key was recognised.
    pub fn handle(&self, code: KeyCode, world: &mut World) -> bool {
        match self.command_for(code) {
            Some(cmd) => {
                world.command(cmd);
                true
            }
            None => false,
        }
    }
}

/// The press/release router pair a game owns.
#[derive(Clone, Copy, Debug)]
pub struct Controls {
    pressed: InputRouter,
    released: InputRouter,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            pressed: InputRouter::new(KeyAction::Press),
            released: InputRouter::new(KeyAction::Release),
        }
    }
}

impl Controls {
    pub fn dispatch(&self, input: KeyInput, world: &mut World) -> bool {
        match input.action {
            KeyAction::Press => self.pressed.handle(input.code, world),
            KeyAction::Release => self.released.handle(input.code, world),
        }
    }
}

/// Synthesises key releases for terminals that only report presses.
///
/// Records the frame each key was last pressed (OS key-repeat shows up as a
/// stream of presses); a key silent for longer than the window counts as
/// released.
#[derive(Clone, Debug)]
pub struct HoldTracker {
    window: u64,
    last_seen: HashMap<KeyCode, u64>,
}

impl HoldTracker {
    pub fn new(window: u64) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    pub fn observe(&mut self, input: KeyInput, frame: u64) {
        match input.action {
            KeyAction::Press => {
                self.last_seen.insert(input.code, frame);
            }
            KeyAction::Release => {
                self.last_seen.remove(&input.code);
            }
        }
    }

    /// Drop keys gone quiet by `frame` and return their release events.
    pub fn expire(&mut self, frame: u64) -> Vec<KeyInput> {
        let window = self.window;
        let mut expired = Vec::new();
        self.last_seen.retain(|code, last| {
            let live = frame.saturating_sub(*last) <= window;
            if !live {
                expired.push(KeyInput::release(*code));
            }
            live
        });
        expired
    }
}
