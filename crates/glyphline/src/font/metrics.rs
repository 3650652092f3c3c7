/// Font-level metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub leading: f32,
    /// Units per em.
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Scale metrics to a font size, in the y-down device convention used by
    /// the layout passes: ascent comes back negative (above the baseline),
    /// descent and leading positive.
    pub fn scale_to_size(&self, size: f32) -> LineMetrics {
        let scale = if self.units_per_em != 0 {
            size / self.units_per_em as f32
        } else {
            1.0
        };
        LineMetrics {
            ascent: -self.ascent * scale,
            descent: self.descent * scale,
            leading: self.leading * scale,
        }
    }
}

/// Scaled line metrics in device units. Ascent is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_flips_ascent_sign() {
        let metrics = FontMetrics {
            ascent: 800.0,
            descent: 200.0,
            leading: 50.0,
            units_per_em: 1000,
        };
        let scaled = metrics.scale_to_size(10.0);
        assert_eq!(scaled.ascent, -8.0);
        assert_eq!(scaled.descent, 2.0);
        assert_eq!(scaled.leading, 0.5);
    }

    #[test]
    fn zero_units_per_em_does_not_divide() {
        let metrics = FontMetrics {
            ascent: 1.0,
            descent: 1.0,
            leading: 0.0,
            units_per_em: 0,
        };
        let scaled = metrics.scale_to_size(16.0);
        assert!(scaled.ascent.is_finite());
    }
}
