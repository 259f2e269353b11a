use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::coords::ColorRgb;

/// Number of color wells the shader can evaluate.
pub const MAX_CENTERS: usize = 6;

/// Named palettes + tunables shipped with the engine.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Preset {
    /// Warm orange wells over a deep navy base, strong swirl.
    #[default]
    Liquid,
    /// Cooler violet/teal wells, calmer motion and lighter grain.
    Studio,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[Preset::Liquid, Preset::Studio]
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Liquid => "liquid",
            Preset::Studio => "studio",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// The preset after this one, wrapping around.
    pub fn next(self) -> Self {
        let all = Self::all();
        let i = all.iter().position(|p| *p == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }

    pub fn config(self) -> SurfaceConfig {
        match self {
            Preset::Liquid => {
                let orange = ColorRgb::from_u8(0xF1, 0x5A, 0x22);
                let navy = ColorRgb::from_u8(0x0A, 0x0E, 0x27);
                SurfaceConfig {
                    palette_colors: vec![orange, navy, orange, navy, orange, navy],
                    color_weights: vec![0.5, 1.8, 0.5, 1.8, 0.5, 1.8],
                    speed: 1.2,
                    intensity: 1.8,
                    grain_intensity: 0.08,
                    gradient_radius: 0.45,
                    gradient_center_count: 6,
                    dark_base: navy,
                    distortion: 0.8,
                }
            }
            Preset::Studio => SurfaceConfig {
                palette_colors: vec![
                    ColorRgb::from_u8(0x6C, 0x3B, 0xF5),
                    ColorRgb::from_u8(0x13, 0xC0, 0xCC),
                    ColorRgb::from_u8(0xF2, 0x4B, 0x8B),
                    ColorRgb::from_u8(0x1B, 0x1F, 0x4A),
                    ColorRgb::from_u8(0xF5, 0xA6, 0x23),
                ],
                color_weights: vec![1.0, 0.9, 0.8, 1.2, 0.6],
                speed: 0.9,
                intensity: 1.5,
                grain_intensity: 0.05,
                gradient_radius: 0.55,
                gradient_center_count: 5,
                dark_base: ColorRgb::from_u8(0x07, 0x09, 0x1A),
                distortion: 0.6,
            },
        }
    }
}

/// Palette and tunables of the procedural surface.
///
/// Deserializes from the flat camelCase object
/// `{ preset, paletteColors, colorWeights, speed, intensity, grainIntensity,
/// gradientRadius, gradientCenterCount, darkBase, distortion }`.
/// Unknown keys are ignored, missing keys come from `preset` (default
/// `liquid`), and unusable values (wrong type, out of range) are replaced
/// rather than rejected.
/// Colors may be `[r, g, b]` in `[0, 1]` or `"#rrggbb"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSurfaceConfig")]
pub struct SurfaceConfig {
    pub palette_colors: Vec<ColorRgb>,
    /// One weight per palette color; missing entries weigh 1.0.
    pub color_weights: Vec<f32>,
    pub speed: f32,
    pub intensity: f32,
    pub grain_intensity: f32,
    pub gradient_radius: f32,
    pub gradient_center_count: u32,
    /// Color dark pixels settle on instead of black.
    pub dark_base: ColorRgb,
    /// Scale of the touch-driven UV warp.
    pub distortion: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

impl SurfaceConfig {
    /// Parses a JSON configuration object.
    ///
    /// Only malformed JSON (or a non-object document) is an error. A
    /// recognized key holding a value of the wrong type is logged and falls
    /// back to the preset's value.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Weight of palette entry `i`.
    pub fn weight(&self, i: usize) -> f32 {
        self.color_weights.get(i).copied().unwrap_or(1.0)
    }

    /// Returns a copy where every field is usable by the shader.
    ///
    /// Falls back to `fallback`'s values field by field.
    pub fn sanitized_with(&self, fallback: &SurfaceConfig) -> SurfaceConfig {
        let finite_or = |v: f32, d: f32| if v.is_finite() { v } else { d };

        let mut palette_colors: Vec<ColorRgb> = self
            .palette_colors
            .iter()
            .filter(|c| c.is_finite())
            .map(|c| c.clamped())
            .take(MAX_CENTERS)
            .collect();
        let mut color_weights = self.color_weights.clone();
        if palette_colors.is_empty() {
            log::warn!("surface config has no usable palette colors; using fallback palette");
            palette_colors = fallback.palette_colors.iter().take(MAX_CENTERS).copied().collect();
            color_weights = fallback.color_weights.clone();
        }
        color_weights.resize(palette_colors.len(), 1.0);
        for w in &mut color_weights {
            *w = finite_or(*w, 1.0).max(0.0);
        }

        SurfaceConfig {
            palette_colors,
            color_weights,
            speed: finite_or(self.speed, fallback.speed).max(0.0),
            intensity: finite_or(self.intensity, fallback.intensity).max(0.0),
            grain_intensity: finite_or(self.grain_intensity, fallback.grain_intensity).clamp(0.0, 1.0),
            gradient_radius: finite_or(self.gradient_radius, fallback.gradient_radius).max(0.01),
            gradient_center_count: self.gradient_center_count.clamp(1, MAX_CENTERS as u32),
            dark_base: if self.dark_base.is_finite() {
                self.dark_base.clamped()
            } else {
                fallback.dark_base
            },
            distortion: finite_or(self.distortion, fallback.distortion).max(0.0),
        }
    }

    /// `sanitized_with` the default preset.
    pub fn sanitized(&self) -> SurfaceConfig {
        self.sanitized_with(&SurfaceConfig::default())
    }
}

/// Color as accepted in configuration files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Rgb([f32; 3]),
    Hex(String),
    Invalid(Value),
}

impl ColorValue {
    fn resolve(&self) -> Option<ColorRgb> {
        match self {
            ColorValue::Rgb(v) => Some(ColorRgb::from(*v)),
            ColorValue::Hex(s) => {
                let c = ColorRgb::from_hex(s);
                if c.is_none() {
                    log::warn!("ignoring unparsable color {s:?}");
                }
                c
            }
            ColorValue::Invalid(v) => {
                log::warn!("ignoring color {v}: expected [r, g, b] or \"#rrggbb\"");
                None
            }
        }
    }
}

/// Wire shape of `SurfaceConfig`: everything optional, nothing rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSurfaceConfig {
    #[serde(deserialize_with = "lenient")]
    preset: Option<String>,
    #[serde(deserialize_with = "lenient")]
    palette_colors: Option<Vec<ColorValue>>,
    #[serde(deserialize_with = "lenient_weights")]
    color_weights: Option<Vec<f32>>,
    #[serde(deserialize_with = "lenient")]
    speed: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    intensity: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    grain_intensity: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    gradient_radius: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    gradient_center_count: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    dark_base: Option<ColorValue>,
    #[serde(deserialize_with = "lenient")]
    distortion: Option<f32>,
}

/// Reads any JSON value; one that does not fit `T` becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(convert(&value))
}

/// Like `lenient`, per element. Bad weights become NaN so later entries
/// keep their palette index; sanitizing turns them into 1.0.
fn lenient_weights<'de, D>(deserializer: D) -> Result<Option<Vec<f32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| convert(item).unwrap_or(f32::NAN))
                .collect(),
        ),
        other => {
            log::warn!("ignoring color weights {other}: expected an array of numbers");
            None
        }
    })
}

fn convert<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("ignoring config value {value}: {e}");
            None
        }
    }
}

impl From<RawSurfaceConfig> for SurfaceConfig {
    fn from(raw: RawSurfaceConfig) -> Self {
        let preset = match raw.preset.as_deref() {
            None => Preset::default(),
            Some(name) => Preset::from_name(name).unwrap_or_else(|| {
                log::warn!("unknown preset {name:?}; using {}", Preset::default().name());
                Preset::default()
            }),
        };
        let base = preset.config();

        let (palette_colors, color_weights) = match raw.palette_colors {
            Some(colors) => {
                let colors: Vec<ColorRgb> = colors.iter().filter_map(ColorValue::resolve).collect();
                // A custom palette does not inherit the preset's per-color weights.
                (colors, raw.color_weights.unwrap_or_default())
            }
            None => (
                base.palette_colors.clone(),
                raw.color_weights.unwrap_or_else(|| base.color_weights.clone()),
            ),
        };

        let cfg = SurfaceConfig {
            palette_colors,
            color_weights,
            speed: raw.speed.unwrap_or(base.speed),
            intensity: raw.intensity.unwrap_or(base.intensity),
            grain_intensity: raw.grain_intensity.unwrap_or(base.grain_intensity),
            gradient_radius: raw.gradient_radius.unwrap_or(base.gradient_radius),
            gradient_center_count: raw.gradient_center_count.unwrap_or(base.gradient_center_count),
            dark_base: raw
                .dark_base
                .as_ref()
                .and_then(ColorValue::resolve)
                .unwrap_or(base.dark_base),
            distortion: raw.distortion.unwrap_or(base.distortion),
        };
        cfg.sanitized_with(&base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── presets ───────────────────────────────────────────────────────────

    #[test]
    fn presets_are_already_sane() {
        for p in Preset::all() {
            let cfg = p.config();
            assert_eq!(cfg.sanitized(), cfg, "{}", p.name());
            assert!((4..=MAX_CENTERS).contains(&cfg.palette_colors.len()));
        }
    }

    #[test]
    fn preset_lookup_and_cycle() {
        assert_eq!(Preset::from_name(" Studio "), Some(Preset::Studio));
        assert_eq!(Preset::from_name("nope"), None);
        assert_eq!(Preset::Liquid.next(), Preset::Studio);
        assert_eq!(Preset::Studio.next(), Preset::Liquid);
    }

    // ── from_json ─────────────────────────────────────────────────────────

    #[test]
    fn empty_object_is_the_default_preset() {
        assert_eq!(SurfaceConfig::from_json("{}").unwrap(), SurfaceConfig::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = SurfaceConfig::from_json(r#"{ "speed": 2.5, "sparkle": true, "nested": {"a": 1} }"#).unwrap();
        assert_eq!(cfg.speed, 2.5);
        assert_eq!(cfg.intensity, SurfaceConfig::default().intensity);
    }

    #[test]
    fn missing_keys_come_from_the_named_preset() {
        let cfg = SurfaceConfig::from_json(r#"{ "preset": "studio", "grainIntensity": 0.2 }"#).unwrap();
        let studio = Preset::Studio.config();
        assert_eq!(cfg.grain_intensity, 0.2);
        assert_eq!(cfg.palette_colors, studio.palette_colors);
        assert_eq!(cfg.speed, studio.speed);
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        let cfg = SurfaceConfig::from_json(r#"{ "preset": "disco" }"#).unwrap();
        assert_eq!(cfg, SurfaceConfig::default());
    }

    #[test]
    fn hex_and_array_colors_mix() {
        let cfg = SurfaceConfig::from_json(
            r##"{ "paletteColors": ["#ff0000", [0.0, 1.0, 0.0], "bogus", "#0000ff"], "colorWeights": [2.0] }"##,
        )
        .unwrap();
        assert_eq!(
            cfg.palette_colors,
            vec![ColorRgb::new(1.0, 0.0, 0.0), ColorRgb::new(0.0, 1.0, 0.0), ColorRgb::new(0.0, 0.0, 1.0)]
        );
        assert_eq!(cfg.color_weights, vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let cfg = SurfaceConfig::from_json(
            r#"{ "gradientCenterCount": 40, "grainIntensity": 7.0, "gradientRadius": -1.0, "speed": -3.0,
                 "paletteColors": [[2.0, -1.0, 0.5]] }"#,
        )
        .unwrap();
        assert_eq!(cfg.gradient_center_count, MAX_CENTERS as u32);
        assert_eq!(cfg.grain_intensity, 1.0);
        assert_eq!(cfg.gradient_radius, 0.01);
        assert_eq!(cfg.speed, 0.0);
        assert_eq!(cfg.palette_colors, vec![ColorRgb::new(1.0, 0.0, 0.5)]);
    }

    #[test]
    fn empty_palette_uses_preset_palette() {
        let cfg = SurfaceConfig::from_json(r#"{ "paletteColors": [] }"#).unwrap();
        assert_eq!(cfg.palette_colors, SurfaceConfig::default().palette_colors);
        assert_eq!(cfg.color_weights, SurfaceConfig::default().color_weights);
    }

    #[test]
    fn long_palettes_are_truncated() {
        let colors = vec![ColorRgb::new(0.1, 0.2, 0.3); 9];
        let cfg = SurfaceConfig { palette_colors: colors, ..SurfaceConfig::default() }.sanitized();
        assert_eq!(cfg.palette_colors.len(), MAX_CENTERS);
        assert_eq!(cfg.color_weights.len(), MAX_CENTERS);
    }

    #[test]
    fn wrongly_typed_scalars_fall_back_to_the_preset() {
        let base = SurfaceConfig::default();
        let cfg = SurfaceConfig::from_json(r#"{ "speed": "fast", "intensity": 2.0 }"#).unwrap();
        assert_eq!(cfg.speed, base.speed);
        assert_eq!(cfg.intensity, 2.0);

        let cfg = SurfaceConfig::from_json(r#"{ "gradientCenterCount": 3.5, "preset": 7 }"#).unwrap();
        assert_eq!(cfg, base);
    }

    #[test]
    fn bad_weight_entries_weigh_one() {
        let cfg = SurfaceConfig::from_json(r#"{ "colorWeights": [0.5, null, "heavy", 2.0] }"#).unwrap();
        assert_eq!(cfg.color_weights, vec![0.5, 1.0, 1.0, 2.0, 1.0, 1.0]);

        let cfg = SurfaceConfig::from_json(r#"{ "colorWeights": 3 }"#).unwrap();
        assert_eq!(cfg.color_weights, SurfaceConfig::default().color_weights);
    }

    #[test]
    fn malformed_colors_are_skipped() {
        let cfg = SurfaceConfig::from_json(r#"{ "paletteColors": [[1.0, 0.0]] }"#).unwrap();
        assert_eq!(cfg.palette_colors, SurfaceConfig::default().palette_colors);

        let cfg = SurfaceConfig::from_json(
            r##"{ "paletteColors": [[1.0, 0.0], {"r": 1}, "#00ff00"], "darkBase": [0.1] }"##,
        )
        .unwrap();
        assert_eq!(cfg.palette_colors, vec![ColorRgb::new(0.0, 1.0, 0.0)]);
        assert_eq!(cfg.dark_base, SurfaceConfig::default().dark_base);

        let cfg = SurfaceConfig::from_json(r#"{ "paletteColors": "red" }"#).unwrap();
        assert_eq!(cfg.palette_colors, SurfaceConfig::default().palette_colors);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SurfaceConfig::from_json("{ speed: ").is_err());
        assert!(SurfaceConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn serialized_config_reads_back() {
        let cfg = Preset::Studio.config();
        let text = serde_json::to_string(&cfg).unwrap();
        assert!(text.contains("\"gradientCenterCount\":5"));
        assert_eq!(SurfaceConfig::from_json(&text).unwrap(), cfg);
    }
}
