use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dashboard accents
// ---------------------------------------------------------------------------

/// Accent colours: one per indicator line, one for the chart bars.
#[derive(Debug, Clone)]
pub struct Accents {
    indicators: Vec<Color32>,
    pub bars: Color32,
}

impl Accents {
    pub fn new(indicator_count: usize) -> Self {
        let mut colors = generate_palette(indicator_count + 1);
        let bars = colors.pop().unwrap_or(Color32::LIGHT_BLUE);
        Self {
            indicators: colors,
            bars,
        }
    }

    /// Colour of the `i`-th indicator line.
    pub fn indicator(&self, i: usize) -> Color32 {
        self.indicators.get(i).copied().unwrap_or(Color32::GRAY)
    }
}

impl Default for Accents {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_length_and_distinct_colours() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn accents_fall_back_to_gray_past_the_end() {
        let accents = Accents::default();
        assert_ne!(accents.indicator(3), Color32::GRAY);
        assert_eq!(accents.indicator(4), Color32::GRAY);
        assert!(!accents.indicators.contains(&accents.bars));
    }
}
