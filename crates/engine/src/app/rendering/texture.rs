use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::ImageReader;
use thiserror::Error;
use tracing::warn;

use super::text::{rasterize_text, TextColor};
use super::TILE_SIZE;

const MISSING_TEXTURE_COLOR: [u8; 4] = [169, 169, 169, 255];

/// Decoded RGBA image owned by the registry.
#[derive(Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    path: Option<PathBuf>,
    keep: bool,
}

impl Texture {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// Shared reference to a registry entry. Cloning a handle keeps the entry
/// alive across [`TextureRegistry::cleanup`]; dropping the last handle makes
/// the entry collectable again.
#[derive(Debug, Clone)]
pub struct TextureHandle(Rc<Texture>);

impl TextureHandle {
    pub fn texture(&self) -> &Texture {
        &self.0
    }

    /// True when both handles point at the same registry entry.
    pub fn same_entry(&self, other: &TextureHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to open image {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Arena of loaded images. Entry 0 is a permanent solid-fill stand-in used
/// wherever a real image cannot be produced; it is created with the keep
/// flag and survives every cleanup pass.
pub struct TextureRegistry {
    entries: Vec<Rc<Texture>>,
    warned_missing_paths: HashSet<PathBuf>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        let missing = Rc::new(Texture {
            width: TILE_SIZE,
            height: TILE_SIZE,
            rgba: solid_fill_rgba(TILE_SIZE, TILE_SIZE, MISSING_TEXTURE_COLOR),
            path: None,
            keep: true,
        });
        Self {
            entries: vec![missing],
            warned_missing_paths: HashSet::new(),
        }
    }

    /// Handle to the permanent stand-in texture.
    pub fn missing(&self) -> TextureHandle {
        TextureHandle(Rc::clone(&self.entries[0]))
    }

    /// Loads `path`, reusing the existing entry when the same path was
    /// loaded before. A path that does not exist on disk yields a solid-fill
    /// entry and a once-per-path warning; a file that exists but fails to
    /// decode is a hard error.
    pub fn load(&mut self, path: &Path) -> Result<TextureHandle, TextureError> {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.path.as_deref() == Some(path))
        {
            return Ok(TextureHandle(Rc::clone(entry)));
        }

        let texture = if path.is_file() {
            let decoded = ImageReader::open(path)
                .map_err(|source| TextureError::Open {
                    path: path.to_path_buf(),
                    source,
                })?
                .decode()
                .map_err(|source| TextureError::Decode {
                    path: path.to_path_buf(),
                    source,
                })?
                .to_rgba8();
            Texture {
                width: decoded.width(),
                height: decoded.height(),
                rgba: decoded.into_raw(),
                path: Some(path.to_path_buf()),
                keep: false,
            }
        } else {
            self.warn_missing_once(path);
            Texture {
                width: TILE_SIZE,
                height: TILE_SIZE,
                rgba: solid_fill_rgba(TILE_SIZE, TILE_SIZE, MISSING_TEXTURE_COLOR),
                path: Some(path.to_path_buf()),
                keep: false,
            }
        };

        let entry = Rc::new(texture);
        self.entries.push(Rc::clone(&entry));
        Ok(TextureHandle(entry))
    }

    /// Rasterizes `text` into a fresh entry. Text entries are never shared
    /// or deduplicated; they live exactly as long as their handles.
    pub fn make_text(&mut self, text: &str, color: TextColor) -> TextureHandle {
        let (width, height, rgba) = rasterize_text(text, color);
        let entry = Rc::new(Texture {
            width,
            height,
            rgba,
            path: None,
            keep: false,
        });
        self.entries.push(Rc::clone(&entry));
        TextureHandle(entry)
    }

    /// Evicts every entry no longer referenced outside the registry, except
    /// entries marked keep.
    pub fn cleanup(&mut self) {
        self.entries
            .retain(|entry| entry.keep || Rc::strong_count(entry) > 1);
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn warn_missing_once(&mut self, path: &Path) {
        if !self.warned_missing_paths.insert(path.to_path_buf()) {
            return;
        }
        warn!(path = %path.display(), "texture_missing_using_stand_in");
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn solid_fill_rgba(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for _ in 0..(width * height) {
        rgba.extend_from_slice(&color);
    }
    rgba
}
