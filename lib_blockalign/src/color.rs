//! The color contract between the alignment and a renderer.

/// An RGB color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Maps a scalar in [0.0, 1.0] to a color.
///
/// All conservation colors are looked up through one of these.
pub trait ColorMap {
    fn color(&self, scale: f64) -> Color;
}

/// A piecewise linear color map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorRamp {
    /// Control points sorted by value.
    points: Vec<(f64, Color)>,
}

/// Fixed colors used for cells that are not colored by conservation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AlignmentPalette {
    pub aligned: Color,
    pub unaligned: Color,
    pub no_residue: Color,
    pub marked_block: Color,
    pub geometry_violation: Color,
    pub merge_fail: Color,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (self.r * 255.0).clamp(0.0, 255.0) as u8,
            (self.g * 255.0).clamp(0.0, 255.0) as u8,
            (self.b * 255.0).clamp(0.0, 255.0) as u8,
        ]
    }

    pub fn lerp(&self, other: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5);
}

impl ColorRamp {
    pub fn new(points: impl IntoIterator<Item = (f64, Color)>) -> Self {
        let mut points: Vec<_> = points.into_iter().collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { points }
    }

    /// Blue for unconserved, through white, to red for conserved.
    pub fn conservation() -> Self {
        Self::new([(0.0, Color::BLUE), (0.5, Color::WHITE), (1.0, Color::RED)])
    }
}

impl ColorMap for ColorRamp {
    fn color(&self, scale: f64) -> Color {
        let Some(&(first_value, first_color)) = self.points.first() else {
            return Color::WHITE;
        };
        if scale <= first_value {
            return first_color;
        }

        for window in self.points.windows(2) {
            let (v0, c0) = window[0];
            let (v1, c1) = window[1];
            if scale <= v1 {
                let t = if v1 - v0 > f64::EPSILON {
                    (scale - v0) / (v1 - v0)
                } else {
                    1.0
                };
                return c0.lerp(&c1, t as f32);
            }
        }

        self.points.last().map(|&(_, color)| color).unwrap_or(Color::WHITE)
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::conservation()
    }
}

impl Default for AlignmentPalette {
    fn default() -> Self {
        Self {
            aligned: Color::RED,
            unaligned: Color::GRAY,
            no_residue: Color::new(0.2, 0.2, 0.2),
            marked_block: Color::YELLOW,
            geometry_violation: Color::from_rgb8(0xff, 0x80, 0x80),
            merge_fail: Color::from_rgb8(0xff, 0xc0, 0xc0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, ColorMap, ColorRamp};

    #[test]
    fn test_conservation_ramp() {
        let ramp = ColorRamp::conservation();
        assert_eq!(ramp.color(0.0), Color::BLUE);
        assert_eq!(ramp.color(0.5), Color::WHITE);
        assert_eq!(ramp.color(1.0), Color::RED);
        assert_eq!(ramp.color(-3.0), Color::BLUE);
        assert_eq!(ramp.color(7.0), Color::RED);
    }

    #[test]
    fn test_empty_ramp_is_white() {
        assert_eq!(ColorRamp::new([]).color(0.3), Color::WHITE);
    }
}
