//! Rendering module
//!
//! Every sprite is the same unit quad, textured and placed by its model
//! matrix. The frame loop talks to a `Renderer`; the WebGPU pipeline draws to
//! a canvas and the recorder keeps draw calls for headless runs and tests.

pub mod recorder;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

use glam::Mat4;

use crate::sim::{GameState, Visibility};

pub use recorder::{DrawCall, FrameRecorder, RecordedFrame};
pub use sprite_pipeline::{SetupError, SpriteRenderState};
pub use texture::{SpriteImage, TextureError, decode_sprite, read_sprite};
pub use vertex::{QUAD_POSITIONS, QUAD_UVS, QuadVertex, quad_vertices};

/// Index of a texture loaded into a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub usize);

/// Renderer adapter used by the frame loop
pub trait Renderer {
    /// Load a sprite by asset path; a failure here is fatal to the caller
    fn load_texture(&mut self, path: &str) -> Result<TextureHandle, TextureError>;

    /// World → clip space for subsequent draws
    fn set_projection(&mut self, _projection: Mat4) {}

    /// Start a frame cleared to `background` (RGBA)
    fn begin_frame(&mut self, background: [f32; 4]);

    /// One unit-quad draw with the given model matrix and texture
    fn draw(&mut self, transform: &Mat4, texture: TextureHandle);

    /// Submit the frame
    fn end_frame(&mut self);
}

/// Whether an entity with this visibility is drawn in the current state
pub fn is_visible(visibility: Visibility, state: &GameState) -> bool {
    match visibility {
        Visibility::Always => true,
        Visibility::WhenWon(side) => state.match_state.winner() == Some(side),
    }
}

/// Draw every visible entity in list order
///
/// `textures` holds one handle per entity, in the same order as
/// `state.entities`.
pub fn draw_state<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState, textures: &[TextureHandle]) {
    debug_assert_eq!(textures.len(), state.entities.len());

    renderer.begin_frame(state.background);
    for (entity, texture) in state.entities.iter().zip(textures) {
        if is_visible(entity.visibility, state) {
            renderer.draw(entity.transform(), *texture);
        }
    }
    renderer.end_frame();
}
