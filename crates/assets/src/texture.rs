use crate::AssetError;
use std::path::{Path, PathBuf};

/// Decoded 8-bit RGBA image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// 2x2 magenta/black checker that stands in for a texture that failed
    /// to load, so the failure is visible without stopping the program.
    pub fn sentinel() -> Self {
        const M: [u8; 4] = [255, 0, 255, 255];
        const K: [u8; 4] = [0, 0, 0, 255];
        Self {
            label: "sentinel".into(),
            width: 2,
            height: 2,
            rgba: [M, K, K, M].concat(),
        }
    }

    /// 1x1 texture of a single color.
    pub fn solid(label: impl Into<String>, rgba: [u8; 4]) -> Self {
        Self {
            label: label.into(),
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// Bytes per row of `rgba`.
    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

/// Decode an in-memory image of any enabled format into RGBA.
pub fn decode_texture(bytes: &[u8], label: &str) -> Result<TextureData, AssetError> {
    let image = image::load_from_memory(bytes).map_err(|source| AssetError::Image {
        path: PathBuf::from(label),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage(PathBuf::from(label)));
    }
    Ok(TextureData {
        label: label.to_string(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureData, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture(&bytes, &path.display().to_string())
}

/// Load a texture, falling back to [`TextureData::sentinel`] on any failure.
pub fn load_texture_or_sentinel(path: impl AsRef<Path>) -> TextureData {
    let path = path.as_ref();
    match load_texture(path) {
        Ok(texture) => {
            tracing::info!(
                path = %path.display(),
                width = texture.width,
                height = texture.height,
                "texture loaded"
            );
            texture
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "texture failed to load: {err}");
            TextureData::sentinel()
        }
    }
}
