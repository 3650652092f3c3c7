use std::sync::Arc;

use rustybuzz::ttf_parser;

use crate::font::{FontError, FontMetrics, FontStyle, Result, Typeface};

/// Loaded font face backed by a font file (TTF/OTF).
///
/// Owns the underlying font data; metrics and style are extracted once at
/// load time, character coverage goes through a transient table parse.
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Full font data.
    data: Arc<[u8]>,
    /// Face index within the file (for collections).
    index: u32,
    /// Extracted font metrics in font units.
    metrics: FontMetrics,
    /// Weight and slant from the OS/2 table.
    style: FontStyle,
}

impl FontFace {
    /// Create a font face from raw bytes and a face index within the file.
    pub fn from_bytes(data: Arc<[u8]>, index: u32) -> Result<Self> {
        let (metrics, style) = {
            let face =
                ttf_parser::Face::parse(&data, index).map_err(|_| FontError::InvalidFont)?;
            let metrics = FontMetrics {
                ascent: face.ascender() as f32,
                descent: -(face.descender() as f32),
                leading: face.line_gap() as f32,
                units_per_em: face.units_per_em(),
            };
            let style = FontStyle {
                weight: face.weight().to_number(),
                italic: face.is_italic(),
            };
            (metrics, style)
        };
        Ok(Self {
            data,
            index,
            metrics,
            style,
        })
    }

    /// Create a font face from raw bytes owned by a `Vec<u8>`.
    pub fn from_vec(data: Vec<u8>, index: u32) -> Result<Self> {
        Self::from_bytes(Arc::from(data), index)
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: u32) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    fn parse(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }
}

impl Typeface for FontFace {
    fn data(&self) -> Arc<[u8]> {
        self.data.clone()
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn units_per_em(&self) -> u16 {
        self.metrics.units_per_em
    }

    fn style(&self) -> FontStyle {
        self.style
    }

    fn covers(&self, c: char) -> bool {
        self.parse()
            .and_then(|face| face.glyph_index(c))
            .is_some()
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }
}
