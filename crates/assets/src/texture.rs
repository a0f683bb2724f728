use crate::AssetError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    #[default]
    Srgb,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Clamp,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagFilter {
    Nearest,
    #[default]
    Linear,
}

/// How a texture is sourced and sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureDesc {
    pub source: PathBuf,
    pub color_space: ColorSpace,
    pub wrap: WrapMode,
    pub mag_filter: MagFilter,
    /// UV multiplier; only meaningful with [`WrapMode::Repeat`].
    pub repeat: [f32; 2],
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            color_space: ColorSpace::Srgb,
            wrap: WrapMode::Clamp,
            mag_filter: MagFilter::Linear,
            repeat: [1.0, 1.0],
        }
    }
}

impl TextureDesc {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Tile the texture `repeats` times along both axes.
    pub fn tiled(mut self, repeats: f32) -> Self {
        self.wrap = WrapMode::Repeat;
        self.repeat = [repeats, repeats];
        self
    }

    pub fn with_mag_filter(mut self, filter: MagFilter) -> Self {
        self.mag_filter = filter;
        self
    }

    /// Resolve a relative source against `base`. Absolute sources are kept.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.source.is_relative() {
            self.source = base.join(&self.source);
        }
        self
    }
}

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }
}

/// Read and decode the texture file named by `desc`.
pub fn load_texture(desc: &TextureDesc) -> Result<TextureData, AssetError> {
    let bytes = std::fs::read(&desc.source).map_err(|source| AssetError::Read {
        path: desc.source.clone(),
        source,
    })?;
    let image = image::load_from_memory(&bytes)
        .map_err(|source| AssetError::Image {
            path: desc.source.clone(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    tracing::debug!(path = %desc.source.display(), width, height, "decoded texture");
    Ok(TextureData {
        width,
        height,
        rgba: image.into_raw(),
    })
}
