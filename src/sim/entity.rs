//! Sprite entities and their per-frame transform
//!
//! An entity never accumulates matrices across frames: each update starts
//! from its anchor and rebuilds translate → rotate → scale from scratch.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::collision::{Axis, PlayField, is_out_of_vertical_bound};
use super::input::Key;
use super::motion::Oscillator;
use super::state::Side;

/// Constant angular velocity about the depth axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    /// Accumulated angle (degrees)
    pub angle: f32,
    /// Degrees per second
    pub angular_speed: f32,
}

impl Spin {
    pub fn new(angular_speed: f32) -> Self {
        Self {
            angle: 0.0,
            angular_speed,
        }
    }
}

/// How an entity moves each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Behavior {
    /// Never moves (labels, center line, banners)
    Static,
    /// Keyboard-driven, cannot leave the vertical band
    Paddle { side: Side, up: Key, down: Key },
    /// Bounces off paddles and walls, scores on the side walls
    Ball { velocity: Vec3 },
    /// Displacement along `axis` follows the oscillator
    Patrol { axis: Axis, patrol: Oscillator },
    /// Falls at the entity's speed and respawns at its anchor
    Drop {
        /// World y at or below which the entity respawns
        floor: f32,
        /// Optional horizontal sway
        #[serde(default)]
        sway: Option<Oscillator>,
        /// Name of the entity that catches it (respawn on overlap)
        #[serde(default)]
        catcher: Option<String>,
    },
    /// Scale multiplier follows the oscillator
    Pulse { pulse: Oscillator },
}

/// When an entity is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Always,
    /// Only once the match ended with this winner
    WhenWon(Side),
}

/// A movable or static sprite instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Texture path, relative to the asset root
    pub sprite: String,
    /// Fixed reference position
    pub anchor: Vec3,
    /// Full sprite size; also the bounding box
    pub extent: Vec3,
    /// Accumulated offset from the anchor
    #[serde(default)]
    pub displacement: Vec3,
    /// Desired direction for this frame (|intent| <= 1), consumed by the update
    #[serde(skip)]
    pub intent: Vec3,
    /// Units per second along intent/velocity
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub spin: Option<Spin>,
    /// Multiplier on `extent` for drawing (pulse)
    #[serde(default = "unit_scale")]
    pub scale: f32,
    pub behavior: Behavior,
    #[serde(default)]
    pub visibility: Visibility,
    /// Model matrix, rebuilt every update
    #[serde(skip)]
    transform: Mat4,
}

fn unit_scale() -> f32 {
    1.0
}

impl Entity {
    pub fn new(name: &str, sprite: &str, anchor: Vec3, extent: Vec3) -> Self {
        let mut entity = Self {
            name: name.to_owned(),
            sprite: sprite.to_owned(),
            anchor,
            extent,
            displacement: Vec3::ZERO,
            intent: Vec3::ZERO,
            speed: 0.0,
            spin: None,
            scale: 1.0,
            behavior: Behavior::Static,
            visibility: Visibility::Always,
            transform: Mat4::IDENTITY,
        };
        entity.rebuild_transform();
        entity
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_spin(mut self, angular_speed: f32) -> Self {
        self.spin = Some(Spin::new(angular_speed));
        self.rebuild_transform();
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Current world-space center
    #[inline]
    pub fn world_position(&self) -> Vec3 {
        self.anchor + self.displacement
    }

    /// Current rotation in degrees (0 for entities that do not spin)
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.spin.map_or(0.0, |s| s.angle)
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Reset step: discard last frame's composition, keep only the anchor
    pub fn begin_frame(&mut self) {
        self.transform = Mat4::from_translation(self.anchor);
    }

    /// Move along the current intent unless that leaves the vertical band
    ///
    /// Returns false when the move was rejected; the displacement is then
    /// left untouched.
    pub fn step_guarded(&mut self, field: &PlayField, dt: f32) -> bool {
        let candidate = self.displacement + self.intent * self.speed * dt;
        if is_out_of_vertical_bound(field, self.anchor, candidate, self.extent) {
            return false;
        }
        self.displacement = candidate;
        true
    }

    /// Finish the frame: translate by displacement, advance and apply spin, scale last
    pub fn finish_frame(&mut self, dt: f32) {
        if let Some(spin) = self.spin.as_mut() {
            spin.angle += spin.angular_speed * dt;
        }
        self.transform = self.transform * Mat4::from_translation(self.displacement);
        if let Some(spin) = self.spin {
            self.transform = self.transform * Mat4::from_rotation_z(spin.angle.to_radians());
        }
        self.transform = self.transform * Mat4::from_scale(self.extent * self.scale);
        self.intent = Vec3::ZERO;
    }

    /// Recompute the transform from current state without advancing anything
    pub fn rebuild_transform(&mut self) {
        self.transform = compose_transform(
            self.anchor,
            self.displacement,
            self.spin.map(|s| s.angle),
            self.extent * self.scale,
        );
    }
}

/// Model matrix from scratch: anchor, then displacement, then rotation, then scale
pub fn compose_transform(anchor: Vec3, displacement: Vec3, rotation_deg: Option<f32>, scale: Vec3) -> Mat4 {
    let mut m = Mat4::from_translation(anchor);
    m = m * Mat4::from_translation(displacement);
    if let Some(angle) = rotation_deg {
        m = m * Mat4::from_rotation_z(angle.to_radians());
    }
    m * Mat4::from_scale(scale)
}
