use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::font::{FontFace, FontProvider, FontStyle, Result, Typeface};

/// Key for identifying a file-loaded font within the library.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    /// Path to the font file on disk.
    pub path: PathBuf,
    /// Face index within the file (for collections).
    pub index: u32,
}

impl FontKey {
    pub fn new(path: impl AsRef<Path>, index: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            index,
        }
    }
}

/// In-memory set of typefaces serving as a [`FontProvider`].
///
/// The first registered face is the default; fallback matching filters by
/// character coverage and picks the nearest style.
#[derive(Default)]
pub struct FontLibrary {
    faces: Vec<Arc<dyn Typeface>>,
    loaded: HashMap<FontKey, usize>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already constructed typeface; returns its position.
    pub fn register(&mut self, face: Arc<dyn Typeface>) -> usize {
        self.faces.push(face);
        self.faces.len() - 1
    }

    /// Load a face from disk, or reuse the one already loaded for this
    /// path and index.
    pub fn load(&mut self, path: impl AsRef<Path>, index: u32) -> Result<Arc<dyn Typeface>> {
        let key = FontKey::new(&path, index);
        if let Some(&position) = self.loaded.get(&key) {
            return Ok(self.faces[position].clone());
        }
        let face: Arc<dyn Typeface> = Arc::new(FontFace::from_path(&key.path, index)?);
        self.faces.push(face.clone());
        self.loaded.insert(key, self.faces.len() - 1);
        Ok(face)
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

fn style_distance(requested: FontStyle, candidate: FontStyle) -> u32 {
    let weight = requested.weight.abs_diff(candidate.weight) as u32;
    let slant = if requested.italic != candidate.italic {
        1000
    } else {
        0
    };
    weight + slant
}

impl FontProvider for FontLibrary {
    fn default_typeface(&self) -> Option<Arc<dyn Typeface>> {
        self.faces.first().cloned()
    }

    fn match_family_style_character(
        &self,
        _family: Option<&str>,
        style: FontStyle,
        c: char,
    ) -> Option<Arc<dyn Typeface>> {
        let mut best: Option<(usize, u32)> = None;
        for (position, face) in self.faces.iter().enumerate() {
            if !face.covers(c) {
                continue;
            }
            let distance = style_distance(style, face.style());
            match best {
                Some((_, current)) if current <= distance => {}
                _ => best = Some((position, distance)),
            }
        }
        best.map(|(position, _)| self.faces[position].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontMetrics;

    struct FakeFace {
        style: FontStyle,
        covered: &'static [char],
    }

    impl Typeface for FakeFace {
        fn data(&self) -> Arc<[u8]> {
            Arc::from(Vec::new())
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn style(&self) -> FontStyle {
            self.style
        }

        fn covers(&self, c: char) -> bool {
            self.covered.contains(&c)
        }

        fn metrics(&self) -> FontMetrics {
            FontMetrics {
                ascent: 800.0,
                descent: 200.0,
                leading: 0.0,
                units_per_em: 1000,
            }
        }
    }

    fn face(style: FontStyle, covered: &'static [char]) -> Arc<dyn Typeface> {
        Arc::new(FakeFace { style, covered })
    }

    #[test]
    fn first_registered_face_is_default() {
        let mut library = FontLibrary::new();
        let regular = face(FontStyle::default(), &['a']);
        library.register(regular.clone());
        library.register(face(FontStyle { weight: 700, italic: false }, &['a']));

        let default = library.default_typeface().unwrap();
        assert!(Arc::ptr_eq(&default, &regular));
    }

    #[test]
    fn matching_requires_coverage() {
        let mut library = FontLibrary::new();
        library.register(face(FontStyle::default(), &['a']));

        assert!(library
            .match_family_style_character(None, FontStyle::default(), 'z')
            .is_none());
        assert!(library
            .match_family_style_character(None, FontStyle::default(), 'a')
            .is_some());
    }

    #[test]
    fn matching_prefers_nearest_style() {
        let mut library = FontLibrary::new();
        let bold = FontStyle { weight: 700, italic: false };
        library.register(face(FontStyle::default(), &['x']));
        let bold_face = face(bold, &['x']);
        library.register(bold_face.clone());

        let matched = library
            .match_family_style_character(None, bold, 'x')
            .unwrap();
        assert!(Arc::ptr_eq(&matched, &bold_face));
    }
}
