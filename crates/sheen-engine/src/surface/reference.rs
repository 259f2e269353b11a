//! CPU evaluation of the surface fragment shader.
//!
//! Follows `shader.wgsl` step by step. Used for headless snapshots and for
//! checking shading properties without a GPU. Grain differs from the GPU in
//! the low bits because `sin` of large arguments is not bit-exact across
//! implementations.

use crate::coords::Vec2;
use crate::trail::codec::decode_unorm;
use crate::trail::TouchBitmap;

use super::config::MAX_CENTERS;
use super::uniforms::UniformBlock;

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn mix3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t, a[2] + (b[2] - a[2]) * t]
}

#[inline]
fn clamp3(c: [f32; 3]) -> [f32; 3] {
    c.map(|v| v.clamp(0.0, 1.0))
}

/// Bilinear sample with clamp-to-edge, as the linear sampler reads the texture.
pub fn sample_touch(bitmap: &TouchBitmap, uv: Vec2) -> [f32; 3] {
    let size = bitmap.size() as f32;
    let x = uv.x * size - 0.5;
    let y = uv.y * size - 0.5;
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (ix, iy) = (x0 as i64, y0 as i64);

    let texel = |dx: i64, dy: i64| {
        let t = bitmap.texel(ix + dx, iy + dy);
        [t[0] as f32 / 255.0, t[1] as f32 / 255.0, t[2] as f32 / 255.0]
    };

    let top = mix3(texel(0, 0), texel(1, 0), fx);
    let bottom = mix3(texel(0, 1), texel(1, 1), fx);
    mix3(top, bottom, fy)
}

/// Center of color well `i` at scaled time `t`.
pub fn well_center(block: &UniformBlock, i: usize, t: f32) -> Vec2 {
    let o = block.orbits[i];
    let p = if i % 2 == 0 {
        Vec2::new((t * o[0]).sin(), (t * o[1]).cos())
    } else {
        Vec2::new((t * o[0]).cos(), (t * o[1]).sin())
    };
    Vec2::splat(0.5) + p * (o[2] * 0.5)
}

/// Hash noise in `[-1, 1)`.
fn grain(seed: Vec2) -> f32 {
    let h = (seed.dot(Vec2::new(12.9898, 78.233)).sin() * 43758.5453).fract();
    // `fract` in WGSL is always non-negative.
    let h = if h < 0.0 { h + 1.0 } else { h };
    h * 2.0 - 1.0
}

/// Shades one pixel at `uv` (top-left origin). Returns linear RGB in `[0, 1]`.
pub fn shade_pixel(block: &UniformBlock, bitmap: &TouchBitmap, uv: Vec2) -> [f32; 3] {
    let t = block.time * block.speed;

    let touch = decode_unorm(sample_touch(bitmap, uv));
    let mut uv = uv - touch.distortion() * block.distortion;

    let d = (uv - Vec2::splat(0.5)).length();
    let ripple = (d * 20.0 - t * 3.0).sin() * (0.004 + 0.04 * touch.strength);
    let wave = (d * 15.0 - t * 2.0).sin() * (0.003 + 0.03 * touch.strength);
    uv += Vec2::new(ripple, wave);

    let mut color = [0.0f32; 3];
    let count = (block.center_count as usize).min(MAX_CENTERS);
    for i in 0..count {
        let c = block.colors[i];
        let dist = (uv - well_center(block, i, t)).length();
        let falloff = 1.0 - smoothstep(0.0, block.gradient_radius, dist);
        let wobble = 0.55 + 0.45 * (t * block.orbits[i][3] + i as f32 * 1.7).sin();
        let k = falloff * c[3] * wobble;
        color[0] += c[0] * k;
        color[1] += c[1] * k;
        color[2] += c[2] * k;
    }

    let color = clamp3(color.map(|v| v * block.intensity));

    let luma = color[0] * 0.299 + color[1] * 0.587 + color[2] * 0.114;
    let color = clamp3(mix3([luma; 3], color, 1.35));
    let color = color.map(|v| v.max(1e-6).powf(0.92));

    let len = (color[0] * color[0] + color[1] * color[1] + color[2] * color[2]).sqrt();
    let brightness = (len * 1.2).max(0.15).clamp(0.0, 1.0);
    let base = [block.dark_base[0], block.dark_base[1], block.dark_base[2]];
    let color = mix3(base, color, brightness);

    let res = Vec2::new(block.resolution[0], block.resolution[1]);
    let seed = Vec2::new(uv.x * res.x, uv.y * res.y) * 0.5 + Vec2::splat(block.time);
    let g = grain(seed) * block.grain_intensity;
    clamp3(color.map(|v| v + g))
}

/// Renders a `width × height` RGBA8 image, row 0 at the top.
pub fn render_image(block: &UniformBlock, bitmap: &TouchBitmap, width: u32, height: u32) -> Vec<u8> {
    let (width, height) = (width.max(1), height.max(1));
    let mut out = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let uv = Vec2::new(
                (x as f32 + 0.5) / width as f32,
                (y as f32 + 0.5) / height as f32,
            );
            let c = shade_pixel(block, bitmap, uv);
            out.extend(c.map(|v| (v * 255.0).round() as u8));
            out.push(255);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PhysicalSize;
    use crate::surface::config::Preset;
    use crate::surface::uniforms::SurfaceUniforms;
    use crate::trail::TrailBuffer;

    fn block_for(preset: Preset) -> UniformBlock {
        let mut u = SurfaceUniforms::new(&preset.config());
        u.resolution = PhysicalSize::new(64, 64);
        u.time = 1.25;
        u.to_block(glam::Mat4::IDENTITY)
    }

    // ── shading ───────────────────────────────────────────────────────────

    #[test]
    fn pixels_far_from_every_well_land_near_dark_base() {
        let mut block = block_for(Preset::Liquid);
        block.grain_intensity = 0.0;
        block.center_count = 0;
        let bitmap = TouchBitmap::new(8);

        let c = shade_pixel(&block, &bitmap, Vec2::new(0.3, 0.7));
        for ch in 0..3 {
            let expected = block.dark_base[ch] * 0.85;
            assert!((c[ch] - expected).abs() < 1e-3, "channel {ch}: {} vs {}", c[ch], expected);
        }
    }

    #[test]
    fn output_is_deterministic_and_in_range() {
        let block = block_for(Preset::Studio);
        let bitmap = TouchBitmap::new(16);
        let a = render_image(&block, &bitmap, 12, 9);
        let b = render_image(&block, &bitmap, 12, 9);
        assert_eq!(a, b);
        assert_eq!(a.len(), 12 * 9 * 4);
        assert!(a.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn touch_trail_changes_the_image() {
        let mut block = block_for(Preset::Liquid);
        block.grain_intensity = 0.0;

        let mut trail = TrailBuffer::new();
        let still = render_image(&block, trail.bitmap(), 16, 16);

        trail.add_touch(Vec2::new(0.3, 0.3));
        trail.add_touch(Vec2::new(0.6, 0.6));
        for _ in 0..8 {
            trail.tick();
        }
        let touched = render_image(&block, trail.bitmap(), 16, 16);
        assert_ne!(still, touched);
    }

    // ── sampling ──────────────────────────────────────────────────────────

    #[test]
    fn neutral_bitmap_samples_to_zero_strength() {
        let bitmap = TouchBitmap::new(4);
        for uv in [Vec2::zero(), Vec2::splat(0.5), Vec2::splat(1.0)] {
            let s = decode_unorm(sample_touch(&bitmap, uv));
            assert_eq!(s.strength, 0.0);
        }
    }

    #[test]
    fn grain_stays_in_unit_range() {
        for i in 0..200 {
            let g = grain(Vec2::new(i as f32 * 3.7, i as f32 * -1.3));
            assert!((-1.0..=1.0).contains(&g));
        }
    }
}
