//! Touch bitmap channel encoding.
//!
//! One RGBA8 texel carries a direction and a strength:
//!
//! | channel | value                         |
//! |---------|-------------------------------|
//! | R       | `(dir.x + 1) / 2 * 255`       |
//! | G       | `(dir.y + 1) / 2 * 255`       |
//! | B       | `strength * 255`              |
//! | A       | 255                           |
//!
//! `dir` lies in `[-1, 1]²`, `strength` in `[0, 1]`. The distortion applied
//! by the shader is `dir * strength`, so any texel with `B == 0` is a
//! no-op regardless of R and G. `surface/shader.wgsl` mirrors
//! [`decode_texel`]; keep the two in step.

use crate::coords::Vec2;

/// Texel written where no trail point reaches. Decodes to zero distortion.
pub const NEUTRAL_TEXEL: [u8; 4] = [128, 128, 0, 255];

/// Decoded texel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchSample {
    pub direction: Vec2,
    pub strength: f32,
}

impl TouchSample {
    pub const NEUTRAL: TouchSample = TouchSample {
        direction: Vec2::zero(),
        strength: 0.0,
    };

    /// Offset the shader applies before scaling by the distortion amount.
    #[inline]
    pub fn distortion(self) -> Vec2 {
        self.direction * self.strength
    }
}

#[inline]
fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Packs a direction and strength into one texel.
pub fn encode_texel(direction: Vec2, strength: f32) -> [u8; 4] {
    let d = if direction.is_finite() { direction } else { Vec2::zero() };
    let s = if strength.is_finite() { strength } else { 0.0 };
    [
        unorm8((d.x.clamp(-1.0, 1.0) + 1.0) * 0.5),
        unorm8((d.y.clamp(-1.0, 1.0) + 1.0) * 0.5),
        unorm8(s),
        255,
    ]
}

/// Unpacks a texel. Inverse of [`encode_texel`] up to 8-bit quantization.
pub fn decode_texel(texel: [u8; 4]) -> TouchSample {
    let f = |c: u8| c as f32 / 255.0;
    decode_unorm([f(texel[0]), f(texel[1]), f(texel[2])])
}

/// Decodes already-normalized RGB, as a filtering sampler returns it.
pub fn decode_unorm(rgb: [f32; 3]) -> TouchSample {
    TouchSample {
        direction: Vec2::new(rgb[0] * 2.0 - 1.0, rgb[1] * 2.0 - 1.0),
        strength: rgb[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_texel_is_a_no_op() {
        assert_eq!(encode_texel(Vec2::zero(), 0.0), NEUTRAL_TEXEL);
        assert_eq!(decode_texel(NEUTRAL_TEXEL).distortion(), Vec2::zero());
    }

    #[test]
    fn extremes_use_the_full_byte_range() {
        assert_eq!(encode_texel(Vec2::new(-1.0, 1.0), 1.0), [0, 255, 255, 255]);
    }

    #[test]
    fn decode_recovers_direction_within_quantization() {
        let dir = Vec2::new(0.6, -0.8);
        let s = decode_texel(encode_texel(dir, 0.5));
        assert!((s.direction.x - 0.6).abs() < 1.0 / 127.0);
        assert!((s.direction.y + 0.8).abs() < 1.0 / 127.0);
        assert!((s.strength - 0.5).abs() < 1.0 / 255.0);
    }

    #[test]
    fn out_of_range_and_nan_inputs_are_clamped() {
        assert_eq!(encode_texel(Vec2::new(5.0, -5.0), 3.0), [255, 0, 255, 255]);
        assert_eq!(encode_texel(Vec2::new(f32::NAN, 0.0), f32::NAN), NEUTRAL_TEXEL);
    }
}
