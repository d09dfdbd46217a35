//! Pokepong - sprite Pong and animated 2D scenes
//!
//! Core modules:
//! - `sim`: Frame simulation (clock, input, transforms, collisions, match state)
//! - `scene`: Scene variants as data
//! - `game`: Host-independent frame loop (input → update → render)
//! - `renderer`: Renderer adapter, textured-quad WebGPU pipeline, headless recorder
//! - `settings`: Player/host preferences

pub mod game;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use scene::{SceneConfig, SceneKind};
pub use settings::{Autopilot, Settings};

/// Game configuration constants
pub mod consts {
    /// Play field half width (orthographic projection spans -5..5)
    pub const PLAY_FIELD_HALF_WIDTH: f32 = 5.0;
    /// Play field half height (orthographic projection spans -3.75..3.75)
    pub const PLAY_FIELD_HALF_HEIGHT: f32 = 3.75;

    /// Paddle defaults
    pub const PADDLE_SPEED: f32 = 3.0;
    pub const PADDLE_OFFSET_X: f32 = 3.5;

    /// Ball defaults
    pub const BALL_SPEED: f32 = 2.5;
    /// Ball spin (degrees per second)
    pub const BALL_SPIN: f32 = 45.0;

    /// Hitbox multiplier applied to combined extents
    pub const COLLISION_FACTOR: f32 = 1.0;

    /// Simulated frame step for the headless host (60 Hz, milliseconds)
    pub const HEADLESS_STEP_MS: f64 = 1000.0 / 60.0;
}
