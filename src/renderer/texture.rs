//! Sprite image loading
//!
//! Sprites are PNG files addressed by a path relative to the asset root
//! (`sprites/ball.png`). The native build reads them from disk; the browser
//! build embeds them at compile time since there is no filesystem.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Directory that sprite paths are relative to
pub const ASSET_ROOT: &str = "assets";

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("Can't read sprite {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Can't decode sprite {path}: {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
    #[error("No embedded sprite for {path}")]
    Missing { path: String },
}

/// Decoded RGBA8 sprite, rows top to bottom
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode an encoded image (PNG) into RGBA8
pub fn decode_sprite(path: &str, bytes: &[u8]) -> Result<SpriteImage, TextureError> {
    let image = image::load_from_memory(bytes).map_err(|source| TextureError::Decode {
        path: path.to_owned(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Decoded sprite {} ({}x{})", path, width, height);

    Ok(SpriteImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Asset directory: `./assets` when present, else the one next to the manifest
#[cfg(not(target_arch = "wasm32"))]
pub fn asset_root() -> PathBuf {
    let local = PathBuf::from(ASSET_ROOT);
    if local.is_dir() {
        local
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(ASSET_ROOT)
    }
}

/// Load and decode a sprite from the asset directory
#[cfg(not(target_arch = "wasm32"))]
pub fn read_sprite(path: &str) -> Result<SpriteImage, TextureError> {
    let full = asset_root().join(path);
    let bytes = std::fs::read(&full).map_err(|source| TextureError::Io {
        path: full.display().to_string(),
        source,
    })?;
    decode_sprite(path, &bytes)
}

/// Sprites compiled into the browser build
#[cfg(target_arch = "wasm32")]
const EMBEDDED: &[(&str, &[u8])] = &[
    ("sprites/apple.png", include_bytes!("../../assets/sprites/apple.png")),
    ("sprites/ball.png", include_bytes!("../../assets/sprites/ball.png")),
    ("sprites/basket_boy.png", include_bytes!("../../assets/sprites/basket_boy.png")),
    ("sprites/dotted_line.png", include_bytes!("../../assets/sprites/dotted_line.png")),
    ("sprites/left_paddle.png", include_bytes!("../../assets/sprites/left_paddle.png")),
    ("sprites/p1_win.png", include_bytes!("../../assets/sprites/p1_win.png")),
    ("sprites/p2_win.png", include_bytes!("../../assets/sprites/p2_win.png")),
    ("sprites/player_1.png", include_bytes!("../../assets/sprites/player_1.png")),
    ("sprites/player_2.png", include_bytes!("../../assets/sprites/player_2.png")),
    ("sprites/right_paddle.png", include_bytes!("../../assets/sprites/right_paddle.png")),
    ("sprites/sun.png", include_bytes!("../../assets/sprites/sun.png")),
];

/// Decode an embedded sprite
#[cfg(target_arch = "wasm32")]
pub fn read_sprite(path: &str) -> Result<SpriteImage, TextureError> {
    let bytes = EMBEDDED
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, bytes)| *bytes)
        .ok_or_else(|| TextureError::Missing {
            path: path.to_owned(),
        })?;
    decode_sprite(path, bytes)
}
