use eframe::egui::Color32;
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Plot colours shared by the image renderer and the display window
// ---------------------------------------------------------------------------

/// An sRGB colour, convertible to each drawing library's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BACKGROUND: Rgb = Rgb(255, 255, 255);
pub const FOREGROUND: Rgb = Rgb(30, 30, 30);
pub const GRID: Rgb = Rgb(225, 225, 225);
/// Observation markers (steel blue).
pub const MARKER: Rgb = Rgb(70, 130, 180);
pub const ERROR_BAR: Rgb = Rgb(150, 150, 150);
pub const PLACEHOLDER: Rgb = Rgb(160, 60, 60);

impl From<Rgb> for Color32 {
    fn from(c: Rgb) -> Self {
        Color32::from_rgb(c.0, c.1, c.2)
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_keep_channels() {
        assert_eq!(Color32::from(MARKER), Color32::from_rgb(70, 130, 180));
        let RGBColor(r, g, b) = RGBColor::from(PLACEHOLDER);
        assert_eq!((r, g, b), (160, 60, 60));
    }
}
