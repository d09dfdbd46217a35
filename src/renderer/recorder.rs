//! Headless renderer
//!
//! Validates sprites the same way the GPU path does (decode must succeed)
//! and keeps the draw calls of the most recent frame.

use glam::Mat4;

use super::texture::{TextureError, read_sprite};
use super::{Renderer, TextureHandle};

/// One recorded quad draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Projection × model
    pub mvp: Mat4,
    pub texture: TextureHandle,
}

/// Draw calls issued between `begin_frame` and `end_frame`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub background: [f32; 4],
    pub draws: Vec<DrawCall>,
}

#[derive(Debug, Default)]
pub struct FrameRecorder {
    /// Loaded sprite paths; the handle is the index
    textures: Vec<String>,
    projection: Mat4,
    current: RecordedFrame,
    last: Option<RecordedFrame>,
    frames: u64,
    draw_calls: u64,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            ..Default::default()
        }
    }

    /// The last completed frame
    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last.as_ref()
    }

    /// Path a handle was loaded from
    pub fn texture_path(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.get(handle.0).map(String::as_str)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }
}

impl Renderer for FrameRecorder {
    fn load_texture(&mut self, path: &str) -> Result<TextureHandle, TextureError> {
        read_sprite(path)?;
        self.textures.push(path.to_owned());
        Ok(TextureHandle(self.textures.len() - 1))
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    fn begin_frame(&mut self, background: [f32; 4]) {
        self.current = RecordedFrame {
            background,
            draws: Vec::new(),
        };
    }

    fn draw(&mut self, transform: &Mat4, texture: TextureHandle) {
        self.current.draws.push(DrawCall {
            mvp: self.projection * *transform,
            texture,
        });
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.draw_calls += self.current.draws.len() as u64;
        self.last = Some(std::mem::take(&mut self.current));
    }
}
