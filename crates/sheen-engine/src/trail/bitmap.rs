use crate::coords::Vec2;

use super::codec::{encode_texel, NEUTRAL_TEXEL};

/// Radius of a splat's solid core plus half its soft edge, relative to the canvas.
const SPLAT_RADIUS: f32 = 0.25;

/// Width of the soft edge, relative to the splat radius.
const SPLAT_SOFTNESS: f32 = 0.5;

/// Per-point contribution to the strength channel at full coverage.
const SPLAT_OPACITY: f32 = 0.2;

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Square RGBA8 touch bitmap plus the accumulation buffer used to build it.
///
/// Splats are additive, so the result does not depend on point order.
#[derive(Debug, Clone)]
pub struct TouchBitmap {
    size: u32,
    texels: Vec<[u8; 4]>,
    // Per texel: Σ dir.x·w, Σ dir.y·w, Σ w
    accum: Vec<[f32; 3]>,
    dirty: bool,
}

impl TouchBitmap {
    pub fn new(size: u32) -> Self {
        let size = size.max(1);
        let n = (size * size) as usize;
        Self {
            size,
            texels: vec![NEUTRAL_TEXEL; n],
            accum: vec![[0.0; 3]; n],
            dirty: true,
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major texels, row 0 at the top.
    #[inline]
    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    /// Texel bytes for upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Whether the contents changed since the last `mark_uploaded`.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    /// True when every texel is the neutral texel.
    pub fn is_neutral(&self) -> bool {
        self.texels.iter().all(|t| *t == NEUTRAL_TEXEL)
    }

    /// Texel at integer coordinates, clamped to the edge.
    pub fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        let max = self.size as i64 - 1;
        let (x, y) = (x.clamp(0, max), y.clamp(0, max));
        self.texels[(y * self.size as i64 + x) as usize]
    }

    /// Clears the accumulation buffer; nothing is visible until `resolve`.
    pub(crate) fn begin(&mut self) {
        self.accum.fill([0.0; 3]);
    }

    /// Adds one soft radial splat centered at a normalized position.
    pub(crate) fn splat(&mut self, center: Vec2, direction: Vec2, intensity: f32) {
        if intensity <= 0.0 || !center.is_finite() {
            return;
        }

        let size = self.size as f32;
        let radius = SPLAT_RADIUS * size;
        let soft = radius * SPLAT_SOFTNESS;
        let inner = radius - soft;
        let outer = radius + soft;

        let cx = center.x * size;
        let cy = center.y * size;

        let x0 = ((cx - outer).floor().max(0.0)) as u32;
        let y0 = ((cy - outer).floor().max(0.0)) as u32;
        let x1 = ((cx + outer).ceil().min(size - 1.0)).max(0.0) as u32;
        let y1 = ((cy + outer).ceil().min(size - 1.0)).max(0.0) as u32;
        if cx + outer < 0.0 || cy + outer < 0.0 || cx - outer > size || cy - outer > size {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                // Texel centers sit at half-integer coordinates.
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                let coverage = 1.0 - smoothstep(inner, outer, d);
                if coverage <= 0.0 {
                    continue;
                }
                let w = SPLAT_OPACITY * intensity * coverage;
                let a = &mut self.accum[(y * self.size + x) as usize];
                a[0] += direction.x * w;
                a[1] += direction.y * w;
                a[2] += w;
            }
        }
    }

    /// Quantizes the accumulation buffer into texels and marks the bitmap dirty.
    pub(crate) fn resolve(&mut self) {
        for (texel, a) in self.texels.iter_mut().zip(self.accum.iter()) {
            *texel = if a[2] > 0.0 {
                encode_texel(Vec2::new(a[0] / a[2], a[1] / a[2]), a[2])
            } else {
                NEUTRAL_TEXEL
            };
        }
        self.dirty = true;
    }
}
