//! Frame simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform code:
//! - Time enters only as the per-frame delta passed to `tick`
//! - Entities update in draw order
//! - Collision tests are pure functions

pub mod clock;
pub mod collision;
pub mod entity;
pub mod input;
pub mod motion;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{
    Axis, PlayField, is_out_of_horizontal_bound, is_out_of_vertical_bound, overlaps,
    reflect_axis, reflect_on_collision,
};
pub use entity::{Behavior, Entity, Spin, Visibility, compose_transform};
pub use input::{InputEvent, Key, KeyboardState, clamp_to_unit, sample_intent};
pub use motion::{Heading, Oscillator};
pub use state::{GameState, MatchState, Side};
pub use tick::{TickInput, default_binding, tick};
