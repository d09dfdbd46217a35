//! Boundary and collision detection for axis-aligned sprites
//!
//! Everything here is a pure function of its inputs. Positions are always
//! given as `anchor + displacement`, mirroring how entities store them.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{PLAY_FIELD_HALF_HEIGHT, PLAY_FIELD_HALF_WIDTH};

/// Rectangular world-space region bounding legal positions, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub half_width: f32,
    pub half_height: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            half_width: PLAY_FIELD_HALF_WIDTH,
            half_height: PLAY_FIELD_HALF_HEIGHT,
        }
    }
}

impl PlayField {
    /// Largest |y| a sprite of the given extent may reach
    #[inline]
    pub fn vertical_limit(&self, extent: Vec3) -> f32 {
        self.half_height - 0.5 * extent.y
    }

    /// Largest |x| a sprite of the given extent may reach
    #[inline]
    pub fn horizontal_limit(&self, extent: Vec3) -> f32 {
        self.half_width - 0.5 * extent.x
    }

    /// Orthographic projection covering exactly the play field
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            -self.half_height,
            self.half_height,
            -1.0,
            1.0,
        )
    }
}

/// Check whether a sprite touches or crosses the top/bottom walls
pub fn is_out_of_vertical_bound(
    field: &PlayField,
    anchor: Vec3,
    displacement: Vec3,
    extent: Vec3,
) -> bool {
    (anchor.y + displacement.y).abs() >= field.vertical_limit(extent)
}

/// Check whether the ball touches or crosses the left/right walls (a score, not a bounce)
pub fn is_out_of_horizontal_bound(
    field: &PlayField,
    anchor: Vec3,
    displacement: Vec3,
    ball_extent: Vec3,
) -> bool {
    (anchor.x + displacement.x).abs() >= field.horizontal_limit(ball_extent)
}

/// Axis-aligned bounding box overlap
///
/// Boxes overlap when the center gap minus the combined half-extents is
/// negative on both axes. `collision_factor` scales the combined extents to
/// tune hitbox generosity without touching sprite size.
pub fn overlaps(
    pos_a: Vec3,
    pos_b: Vec3,
    anchor_a: Vec3,
    anchor_b: Vec3,
    extent_a: Vec3,
    extent_b: Vec3,
    collision_factor: f32,
) -> bool {
    let a = anchor_a + pos_a;
    let b = anchor_b + pos_b;
    let x_gap = (a.x - b.x).abs() - collision_factor * (extent_a.x + extent_b.x) / 2.0;
    let y_gap = (a.y - b.y).abs() - collision_factor * (extent_a.y + extent_b.y) / 2.0;
    x_gap < 0.0 && y_gap < 0.0
}

/// World axis used by reflections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Flip one component of a velocity
#[inline]
pub fn reflect_axis(velocity: Vec3, axis: Axis) -> Vec3 {
    match axis {
        Axis::X => Vec3::new(-velocity.x, velocity.y, velocity.z),
        Axis::Y => Vec3::new(velocity.x, -velocity.y, velocity.z),
    }
}

/// Reflect-on-collision: undo the last step, flip the offending axis, redo the step
///
/// `step` is the scalar `speed * dt` that produced the last displacement
/// change. Returns the corrected `(displacement, velocity)`.
pub fn reflect_on_collision(displacement: Vec3, velocity: Vec3, step: f32, axis: Axis) -> (Vec3, Vec3) {
    let undone = displacement - velocity * step;
    let reflected = reflect_axis(velocity, axis);
    (undone + reflected * step, reflected)
}
