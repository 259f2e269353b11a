use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::coords::PhysicalSize;

/// Perspective camera looking down -Z at the surface plane (z = 0).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Distance from the eye to the surface plane.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov_y_deg: 45.0,
            distance: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Height of the frustum cross-section at the surface plane.
    pub fn visible_height(&self) -> f32 {
        2.0 * self.distance * (self.fov_y_deg.to_radians() * 0.5).tan()
    }

    /// Width and height of the plane that exactly fills the frustum.
    pub fn fill_extent(&self, aspect: f32) -> (f32, f32) {
        let h = self.visible_height();
        (h * aspect, h)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance), Vec3::ZERO, Vec3::Y);
        proj * view
    }
}

/// Vertex of the surface quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl SurfaceVertex {
    pub const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SurfaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Quad covering the camera frustum at the surface plane.
///
/// uv (0, 0) is the top-left corner, matching row 0 of the touch bitmap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuadGeometry {
    pub size: PhysicalSize,
    pub width: f32,
    pub height: f32,
    pub vertices: [SurfaceVertex; 4],
    pub view_proj: Mat4,
}

impl QuadGeometry {
    pub fn new(camera: &Camera, size: PhysicalSize) -> Self {
        let size = size.at_least_one();
        let aspect = size.aspect();
        let (width, height) = camera.fill_extent(aspect);
        let (hw, hh) = (width * 0.5, height * 0.5);

        let vertices = [
            SurfaceVertex { position: [-hw, hh], uv: [0.0, 0.0] },
            SurfaceVertex { position: [-hw, -hh], uv: [0.0, 1.0] },
            SurfaceVertex { position: [hw, -hh], uv: [1.0, 1.0] },
            SurfaceVertex { position: [hw, hh], uv: [1.0, 0.0] },
        ];

        Self {
            size,
            width,
            height,
            vertices,
            view_proj: camera.view_proj(aspect),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn quad_corners_land_on_clip_edges() {
        let cam = Camera::default();
        for size in [PhysicalSize::new(400, 300), PhysicalSize::new(300, 900), PhysicalSize::new(1, 1)] {
            let quad = QuadGeometry::new(&cam, size);
            for v in quad.vertices {
                let clip = quad.view_proj * Vec4::new(v.position[0], v.position[1], 0.0, 1.0);
                let ndc = clip.truncate() / clip.w;
                assert!(approx(ndc.x.abs(), 1.0), "x = {} for {:?}", ndc.x, size);
                assert!(approx(ndc.y.abs(), 1.0), "y = {} for {:?}", ndc.y, size);
            }
        }
    }

    #[test]
    fn top_left_vertex_has_origin_uv() {
        let quad = QuadGeometry::new(&Camera::default(), PhysicalSize::new(64, 64));
        let v = quad.vertices[0];
        assert!(v.position[0] < 0.0 && v.position[1] > 0.0);
        assert_eq!(v.uv, [0.0, 0.0]);
    }

    #[test]
    fn extent_follows_aspect() {
        let cam = Camera { distance: 3.0, ..Camera::default() };
        let quad = QuadGeometry::new(&cam, PhysicalSize::new(800, 400));
        assert!(approx(quad.width, quad.height * 2.0));
        assert!(approx(quad.height, 6.0 * (22.5f32).to_radians().tan()));
    }

    #[test]
    fn zero_size_is_clamped() {
        let quad = QuadGeometry::new(&Camera::default(), PhysicalSize::new(0, 0));
        assert_eq!(quad.size, PhysicalSize::new(1, 1));
        assert!(quad.width.is_finite() && quad.height.is_finite());
    }
}
