use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential palettes for the bar charts
// ---------------------------------------------------------------------------

/// A single-hue ramp, dark to light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    Blues,
    Greens,
    /// Orange → red, light to dark (low scores light, high scores dark).
    OrangeRed,
}

impl Ramp {
    /// `n` colours along the ramp. The first bar of a top-N chart gets the
    /// darkest shade.
    pub fn colors(self, n: usize) -> Vec<Color32> {
        match self {
            Ramp::Blues => shades(n, 212.0, 212.0, 0.25, 0.80),
            Ramp::Greens => shades(n, 135.0, 135.0, 0.22, 0.78),
            Ramp::OrangeRed => shades(n, 40.0, 0.0, 0.78, 0.35),
        }
    }
}

/// Interpolate hue and lightness linearly across `n` steps.
fn shades(n: usize, hue_from: f32, hue_to: f32, light_from: f32, light_to: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let span = (n.max(2) - 1) as f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / span;
            let hue = hue_from + (hue_to - hue_from) * t;
            let lightness = light_from + (light_to - light_from) * t;
            let hsl: Hsl = Hsl::new_srgb(hue, 0.70, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}
