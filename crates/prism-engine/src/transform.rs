//! Model-view-projection math for the spinning-triangle demo.
//!
//! Matrices follow the OpenGL clip-space convention and are stored
//! column-major, which is also what WGSL `mat4x4<f32>` expects.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Rotation about +Z by `angle` radians.
#[inline]
pub fn model_rotation(angle: f32) -> Mat4 {
    Mat4::from_rotation_z(angle)
}

/// Orthographic projection spanning `[-aspect, aspect] x [-1, 1]`.
///
/// Near/far are `1` and `-1`, so `z` passes through unchanged.
#[inline]
pub fn ortho_projection(aspect: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(-aspect, aspect, -1.0, 1.0, 1.0, -1.0)
}

/// `projection * model` for a triangle rotated by `angle` in a framebuffer of
/// the given aspect ratio.
#[inline]
pub fn rotating_mvp(angle: f32, aspect: f32) -> Mat4 {
    ortho_projection(aspect) * model_rotation(angle)
}

/// GPU layout of the MVP uniform (64 bytes, column-major).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MvpUniform {
    pub mvp: [[f32; 4]; 4],
}

impl From<Mat4> for MvpUniform {
    fn from(m: Mat4) -> Self {
        Self {
            mvp: m.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn unit_aspect_without_rotation_is_identity() {
        let m = rotating_mvp(0.0, 1.0);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn projection_squeezes_x_by_aspect() {
        let p = ortho_projection(2.0);
        let v = p * Vec4::new(2.0, 1.0, 0.0, 1.0);
        assert!(approx(v, Vec4::new(1.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn quarter_turn_maps_x_axis_to_y_axis() {
        let m = model_rotation(FRAC_PI_2);
        let v = m.transform_point3(Vec3::X);
        assert!((v - Vec3::Y).length() < EPS);
    }

    #[test]
    fn model_is_applied_before_projection() {
        // Rotate (1, 0) to (0, 1), then the projection leaves y alone.
        let aspect = 640.0 / 480.0;
        let v = rotating_mvp(FRAC_PI_2, aspect) * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx(v, Vec4::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn depth_passes_through() {
        let v = ortho_projection(1.5) * Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert!((v.z - 0.5).abs() < EPS);
    }

    #[test]
    fn uniform_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(3.0, 4.0, 5.0));
        let u = MvpUniform::from(m);
        assert_eq!(u.mvp[3], [3.0, 4.0, 5.0, 1.0]);
        assert_eq!(std::mem::size_of::<MvpUniform>(), 64);
    }
}
