//! Game state and match state machine
//!
//! Everything the frame loop mutates lives in one `GameState` owned by the
//! host and passed by reference to each phase.

use serde::{Deserialize, Serialize};

use super::collision::PlayField;
use super::entity::{Behavior, Entity};
use crate::consts::COLLISION_FACTOR;
use crate::scene::SceneConfig;

/// A player side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Match progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchState {
    #[default]
    Running,
    /// Terminal: no reset path short of rebuilding the state
    Ended(Side),
}

impl MatchState {
    pub fn is_running(&self) -> bool {
        matches!(self, MatchState::Running)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            MatchState::Running => None,
            MatchState::Ended(side) => Some(*side),
        }
    }

    /// Fire `Running → Ended(winner)`; returns false if the match already ended
    pub fn end(&mut self, winner: Side) -> bool {
        match self {
            MatchState::Running => {
                *self = MatchState::Ended(winner);
                true
            }
            MatchState::Ended(_) => false,
        }
    }
}

/// Complete frame-loop state
///
/// Serializes as a write-only snapshot. Entity transforms are derived data
/// and are left out, so there is no way back from a snapshot to a state.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub scene_name: String,
    pub play_field: PlayField,
    /// Clear color (RGBA)
    pub background: [f32; 4],
    /// Entities in draw order
    pub entities: Vec<Entity>,
    pub match_state: MatchState,
    /// Cleared (or toggled) by quit events; the host loop stops when false
    pub running: bool,
    /// Hitbox multiplier for entity overlap tests
    pub collision_factor: f32,
    /// Simulated seconds while the match was running
    pub elapsed: f32,
    /// Number of updates applied
    pub frame_count: u64,
}

impl GameState {
    /// Build the initial state of a scene
    pub fn new(scene: &SceneConfig) -> Self {
        let mut entities = scene.entities.clone();
        for entity in &mut entities {
            entity.rebuild_transform();
        }

        Self {
            scene_name: scene.name.clone(),
            play_field: scene.play_field,
            background: scene.background,
            entities,
            match_state: MatchState::Running,
            running: true,
            collision_factor: COLLISION_FACTOR,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    pub fn with_collision_factor(mut self, collision_factor: f32) -> Self {
        self.collision_factor = collision_factor;
        self
    }

    /// Flip the running flag (quit key / window close)
    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.name == name)
    }

    /// The paddle entity for a side, if the scene has one
    pub fn paddle(&self, side: Side) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| matches!(e.behavior, Behavior::Paddle { side: s, .. } if s == side))
    }

    /// The first ball entity, if the scene has one
    pub fn ball(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| matches!(e.behavior, Behavior::Ball { .. }))
    }
}
