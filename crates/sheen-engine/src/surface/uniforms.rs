use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgb, PhysicalSize};

use super::config::{SurfaceConfig, MAX_CENTERS};

/// Orbit of each color well: `[freq_x, freq_y, amplitude, wobble_freq]`.
///
/// Even wells trace `(sin, cos)`, odd wells `(cos, sin)`. Frequencies are
/// pairwise distinct so the combined motion does not visibly repeat within
/// a viewing session.
pub const WELL_ORBITS: [[f32; 4]; MAX_CENTERS] = [
    [0.40, 0.50, 0.40, 1.00],
    [0.60, 0.45, 0.50, 1.20],
    [0.35, 0.55, 0.45, 0.80],
    [0.50, 0.40, 0.40, 1.10],
    [0.70, 0.60, 0.35, 0.90],
    [0.45, 0.65, 0.50, 1.30],
];

/// Uniform values of the procedural surface.
///
/// Static fields come from `SurfaceConfig`; `time` and `resolution` are the
/// only per-frame/per-resize state.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceUniforms {
    /// Seconds of animation time.
    pub time: f32,
    /// Backing-store size in physical pixels.
    pub resolution: PhysicalSize,
    pub palette_colors: Vec<ColorRgb>,
    pub color_weights: Vec<f32>,
    pub speed: f32,
    pub intensity: f32,
    pub grain_intensity: f32,
    pub gradient_radius: f32,
    pub gradient_center_count: u32,
    pub dark_base: ColorRgb,
    pub distortion: f32,
}

impl SurfaceUniforms {
    pub fn new(config: &SurfaceConfig) -> Self {
        let mut u = Self {
            time: 0.0,
            resolution: PhysicalSize::new(1, 1),
            palette_colors: Vec::new(),
            color_weights: Vec::new(),
            speed: 0.0,
            intensity: 0.0,
            grain_intensity: 0.0,
            gradient_radius: 0.0,
            gradient_center_count: 0,
            dark_base: ColorRgb::black(),
            distortion: 0.0,
        };
        u.apply_config(config);
        u
    }

    /// Overwrites the static fields. `time` and `resolution` are untouched.
    pub fn apply_config(&mut self, config: &SurfaceConfig) {
        let cfg = config.sanitized();
        self.palette_colors = cfg.palette_colors;
        self.color_weights = cfg.color_weights;
        self.speed = cfg.speed;
        self.intensity = cfg.intensity;
        self.grain_intensity = cfg.grain_intensity;
        self.gradient_radius = cfg.gradient_radius;
        self.gradient_center_count = cfg.gradient_center_count;
        self.dark_base = cfg.dark_base;
        self.distortion = cfg.distortion;
    }

    /// Packs everything into the GPU layout.
    ///
    /// Wells beyond the palette length reuse palette colors cyclically.
    pub fn to_block(&self, view_proj: glam::Mat4) -> UniformBlock {
        let mut colors = [[0.0f32; 4]; MAX_CENTERS];
        if !self.palette_colors.is_empty() {
            for (i, slot) in colors.iter_mut().enumerate() {
                let j = i % self.palette_colors.len();
                let c = self.palette_colors[j];
                let w = self.color_weights.get(j).copied().unwrap_or(1.0);
                *slot = [c.r, c.g, c.b, w];
            }
        }

        let base = self.dark_base;
        UniformBlock {
            view_proj: view_proj.to_cols_array_2d(),
            resolution: [self.resolution.width as f32, self.resolution.height as f32],
            time: self.time,
            speed: self.speed,
            intensity: self.intensity,
            grain_intensity: self.grain_intensity,
            gradient_radius: self.gradient_radius,
            center_count: self.gradient_center_count.min(MAX_CENTERS as u32),
            distortion: self.distortion,
            _pad: [0.0; 3],
            dark_base: [base.r, base.g, base.b, 1.0],
            colors,
            orbits: WELL_ORBITS,
        }
    }
}

/// GPU uniform block (320 bytes). Field order and sizes match `Uniforms`
/// in `shader.wgsl`:
///
///  offset   0  view_proj        mat4x4<f32>
///  offset  64  resolution       vec2<f32>
///  offset  72  time             f32
///  offset  76  speed            f32
///  offset  80  intensity        f32
///  offset  84  grain_intensity  f32
///  offset  88  gradient_radius  f32
///  offset  92  center_count     u32
///  offset  96  distortion       f32
///  offset 100  _pad             3 × f32
///  offset 112  dark_base        vec4<f32>
///  offset 128  colors           array<vec4<f32>, 6>   (.w = weight)
///  offset 224  orbits           array<vec4<f32>, 6>
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct UniformBlock {
    pub view_proj: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub speed: f32,
    pub intensity: f32,
    pub grain_intensity: f32,
    pub gradient_radius: f32,
    pub center_count: u32,
    pub distortion: f32,
    pub _pad: [f32; 3],
    pub dark_base: [f32; 4],
    pub colors: [[f32; 4]; MAX_CENTERS],
    pub orbits: [[f32; 4]; MAX_CENTERS],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::config::Preset;

    #[test]
    fn block_layout_matches_shader() {
        assert_eq!(std::mem::size_of::<UniformBlock>(), 320);
        assert_eq!(std::mem::offset_of!(UniformBlock, resolution), 64);
        assert_eq!(std::mem::offset_of!(UniformBlock, center_count), 92);
        assert_eq!(std::mem::offset_of!(UniformBlock, dark_base), 112);
        assert_eq!(std::mem::offset_of!(UniformBlock, colors), 128);
        assert_eq!(std::mem::offset_of!(UniformBlock, orbits), 224);
    }

    #[test]
    fn short_palette_cycles_across_wells() {
        let cfg = Preset::Studio.config();
        let u = SurfaceUniforms::new(&cfg);
        let block = u.to_block(glam::Mat4::IDENTITY);
        let first = cfg.palette_colors[0];
        assert_eq!(block.colors[5], [first.r, first.g, first.b, cfg.color_weights[0]]);
        assert_eq!(block.center_count, 5);
    }

    #[test]
    fn apply_config_keeps_time_and_resolution() {
        let mut u = SurfaceUniforms::new(&Preset::Liquid.config());
        u.time = 12.5;
        u.resolution = PhysicalSize::new(800, 600);
        u.apply_config(&Preset::Studio.config());
        assert_eq!(u.time, 12.5);
        assert_eq!(u.resolution, PhysicalSize::new(800, 600));
        assert_eq!(u.palette_colors, Preset::Studio.config().palette_colors);
    }

    #[test]
    fn orbit_frequencies_are_distinct_per_axis() {
        for (i, a) in WELL_ORBITS.iter().enumerate() {
            assert_ne!(a[0], a[1], "well {i} repeats its own frequency");
            for b in &WELL_ORBITS[i + 1..] {
                assert!(a[0] != b[0] || a[1] != b[1]);
            }
        }
    }
}
