use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Series colours: numeric column → Color32
// ---------------------------------------------------------------------------

/// Maps each numeric column to a distinct colour for multi-series charts.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    pub fn new(columns: &[String]) -> Self {
        let palette = generate_palette(columns.len());
        SeriesColors {
            mapping: columns.iter().cloned().zip(palette).collect(),
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, column: &str) -> Color32 {
        self.mapping
            .get(column)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for correlation cells
// ---------------------------------------------------------------------------

/// Blue → light grey → red over `[-1, 1]`; undefined cells are grey.
pub fn coolwarm(value: Option<f64>) -> Color32 {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return Color32::DARK_GRAY;
    };

    let cold: LinSrgb = Srgb::new(0.230f32, 0.299, 0.754).into_linear();
    let mid: LinSrgb = Srgb::new(0.865f32, 0.865, 0.865).into_linear();
    let warm: LinSrgb = Srgb::new(0.706f32, 0.016, 0.150).into_linear();

    let t = v.clamp(-1.0, 1.0) as f32;
    let mixed = if t < 0.0 {
        mid.mix(cold, -t)
    } else {
        mid.mix(warm, t)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Dark text on pale cells, light text on saturated ones.
pub fn label_color(value: Option<f64>) -> Color32 {
    match value {
        Some(v) if v.abs() > 0.6 => Color32::WHITE,
        _ => Color32::BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_and_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[1]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_series_colors_fall_back_for_unknown() {
        let colors = SeriesColors::new(&["a".to_string(), "b".to_string()]);
        assert_ne!(colors.color_for("a"), colors.color_for("b"));
        assert_eq!(colors.color_for("zzz"), Color32::LIGHT_BLUE);
    }

    #[test]
    fn test_coolwarm_ends() {
        let cold = coolwarm(Some(-1.0));
        let warm = coolwarm(Some(1.0));
        assert!(cold.b() > cold.r());
        assert!(warm.r() > warm.b());
        assert_eq!(coolwarm(None), Color32::DARK_GRAY);
    }
}
