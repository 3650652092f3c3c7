//! Shaping engine backed by rustybuzz.

use std::sync::Arc;

use rustybuzz::ttf_parser::Tag;
use rustybuzz::{BufferClusterLevel, Face, UnicodeBuffer};
use unicode_script::Script;

use super::{Direction, RawGlyph, ShapeRequest, ShapingEngine};
use crate::font::Typeface;

/// [`ShapingEngine`] implementation over rustybuzz.
///
/// rustybuzz exposes no public pre/post-context API, so the context fields
/// of the request are not consulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuzzEngine;

impl BuzzEngine {
    pub fn new() -> Self {
        Self
    }
}

/// Font data prepared for rustybuzz shaping. The face itself borrows the
/// data, so it is re-parsed per shaping call; parsing is a cheap header walk.
pub struct BuzzFont {
    data: Arc<[u8]>,
    index: u32,
    units_per_em: u16,
    variations: Vec<rustybuzz::Variation>,
}

impl BuzzFont {
    fn parse(&self) -> Option<Face<'_>> {
        let mut face = Face::from_slice(&self.data, self.index)?;
        if !self.variations.is_empty() {
            face.set_variations(&self.variations);
        }
        Some(face)
    }
}

impl ShapingEngine for BuzzEngine {
    type Font = BuzzFont;

    fn create_font(&self, typeface: &dyn Typeface) -> Option<BuzzFont> {
        let data = typeface.data();
        let index = typeface.index();
        Face::from_slice(&data, index)?;
        let units_per_em = typeface.units_per_em();
        let variations = typeface
            .variations()
            .iter()
            .map(|variation| rustybuzz::Variation {
                tag: Tag::from_bytes(&variation.tag),
                value: variation.value,
            })
            .collect();
        Some(BuzzFont {
            data,
            index,
            units_per_em,
            variations,
        })
    }

    fn font_scale(&self, font: &BuzzFont) -> (i32, i32) {
        (font.units_per_em as i32, font.units_per_em as i32)
    }

    fn shape(&self, font: &BuzzFont, request: &ShapeRequest<'_>) -> Vec<RawGlyph> {
        let face = match font.parse() {
            Some(face) => face,
            None => return Vec::new(),
        };

        let mut buffer = UnicodeBuffer::new();
        buffer.set_cluster_level(BufferClusterLevel::MonotoneCharacters);
        for &(ch, cluster) in request.codepoints {
            buffer.add(ch, cluster);
        }
        buffer.set_direction(match request.direction {
            Direction::LeftToRight => rustybuzz::Direction::LeftToRight,
            Direction::RightToLeft => rustybuzz::Direction::RightToLeft,
        });
        if let Some(script) = buzz_script(request.script) {
            buffer.set_script(script);
        }
        buffer.guess_segment_properties();

        let output = rustybuzz::shape(&face, &[], buffer);
        let infos = output.glyph_infos();
        let positions = output.glyph_positions();
        infos
            .iter()
            .zip(positions)
            .map(|(info, pos)| RawGlyph {
                glyph_id: info.glyph_id,
                cluster: info.cluster,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
            })
            .collect()
    }
}

fn buzz_script(script: Script) -> Option<rustybuzz::Script> {
    let name = script.short_name().as_bytes();
    let tag = match name {
        [a, b, c, d] => Tag::from_bytes(&[*a, *b, *c, *d]),
        _ => return None,
    };
    rustybuzz::Script::from_iso15924_tag(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_round_trip() {
        assert!(buzz_script(Script::Latin).is_some());
        assert!(buzz_script(Script::Arabic).is_some());
        assert!(buzz_script(Script::Han).is_some());
    }
}
