//! Keyboard state and intent sampling
//!
//! Hosts feed `InputEvent`s into a `KeyboardState`; once per frame the
//! simulation samples the held keys into per-paddle intent vectors.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    S,
    Up,
    Down,
    Q,
}

impl Key {
    /// Map a host key name (`KeyboardEvent.key` on the web) to a logical key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "w" | "W" => Some(Key::W),
            "s" | "S" => Some(Key::S),
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "q" | "Q" => Some(Key::Q),
            _ => None,
        }
    }
}

/// Platform-agnostic input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Window close / quit request
    Quit,
}

/// Keys currently held down, plus the quit toggle
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    quit_toggles: u32,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one host event
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                // Quit fires on the press edge only, not while held
                if self.held.insert(key) && key == Key::Q {
                    self.quit_toggles += 1;
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
            InputEvent::Quit => self.quit_toggles += 1,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Number of quit toggles since the last call; each one flips the running flag
    pub fn take_quit_toggles(&mut self) -> u32 {
        std::mem::take(&mut self.quit_toggles)
    }
}

/// Rescale to unit length when longer than 1 (direction is kept)
#[inline]
pub fn clamp_to_unit(v: Vec3) -> Vec3 {
    if v.length() > 1.0 { v.normalize() } else { v }
}

/// Turn held keys into a movement intent; `up` wins when both are held
pub fn sample_intent(keys: &KeyboardState, up: Key, down: Key) -> Vec3 {
    let mut intent = Vec3::ZERO;
    if keys.is_held(up) {
        intent.y = 1.0;
    } else if keys.is_held(down) {
        intent.y = -1.0;
    }
    clamp_to_unit(intent)
}
