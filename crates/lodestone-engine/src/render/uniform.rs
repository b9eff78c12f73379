use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Per-frame constants mirrored into the GPU uniform buffer.
///
/// Field order, `#[repr(C)]` layout and the trailing padding match the WGSL
/// `Uniforms` struct exactly; the byte offsets below are used for partial
/// uploads and must stay in sync.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub time: f32,
    _pad: [f32; 3],
}

// Uniform buffers bind in 16-byte units.
const _: () = assert!(std::mem::size_of::<SceneUniforms>() % 16 == 0);

impl SceneUniforms {
    /// Byte offset of the model matrix, the only matrix rewritten per frame.
    pub const MODEL_OFFSET: u64 = std::mem::offset_of!(SceneUniforms, model) as u64;

    /// Byte offset of the animated `time` field.
    pub const TIME_OFFSET: u64 = std::mem::offset_of!(SceneUniforms, time) as u64;

    /// Buffer size for creation and bind-group binding.
    pub const SIZE: u64 = std::mem::size_of::<SceneUniforms>() as u64;

    /// Initial uniform contents at `time = 0`.
    pub fn initial(params: &ViewParams, aspect: f32) -> Self {
        Self {
            projection: params.projection_matrix(aspect).to_cols_array_2d(),
            view: params.view_matrix().to_cols_array_2d(),
            model: params.model_matrix(0.0).to_cols_array_2d(),
            color: params.object_color,
            time: 0.0,
            _pad: [0.0; 3],
        }
    }
}

/// Fixed camera and model placement for the single scene of this renderer.
///
/// The defaults frame the loaded mesh below a tilted camera; only the model
/// spin angle (driven by elapsed time) changes after startup.
#[derive(Debug, Clone, Copy)]
pub struct ViewParams {
    /// Uniform scale applied to the mesh.
    pub model_scale: f32,
    /// Offset applied after scaling, before the spin.
    pub model_translation: Vec3,
    /// Camera tilt around X, radians.
    pub camera_tilt: f32,
    /// Point the view transform is centered on.
    pub focal_point: Vec3,
    /// Focal length of the pinhole projection; field of view is
    /// `2 * atan(1 / focal_length)`.
    pub focal_length: f32,
    pub near: f32,
    pub far: f32,
    /// Constant color written to the uniform block (alpha feeds blending).
    pub object_color: [f32; 4],
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            model_scale: 0.3,
            model_translation: Vec3::new(0.5, 0.0, 0.0),
            camera_tilt: 3.0 * std::f32::consts::FRAC_PI_4,
            focal_point: Vec3::new(0.0, 0.0, -2.0),
            focal_length: 2.0,
            near: 0.01,
            far: 100.0,
            object_color: [0.0, 1.0, 0.4, 1.0],
        }
    }
}

impl ViewParams {
    /// Model transform at the given spin angle: spin ∘ translate ∘ scale.
    pub fn model_matrix(&self, angle: f32) -> Mat4 {
        Mat4::from_rotation_z(angle)
            * Mat4::from_translation(self.model_translation)
            * Mat4::from_scale(Vec3::splat(self.model_scale))
    }

    /// View transform: recenter on the focal point, then tilt the camera.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(-self.focal_point) * Mat4::from_rotation_x(-self.camera_tilt)
    }

    /// Perspective projection with 0..1 depth, matching the depth test.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let fov_y = 2.0 * (1.0 / self.focal_length).atan();
        Mat4::perspective_rh(fov_y, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
    }

    #[test]
    fn field_offsets_match_wgsl_layout() {
        // Three mat4x4f, then vec4f, then f32.
        assert_eq!(std::mem::offset_of!(SceneUniforms, projection), 0);
        assert_eq!(std::mem::offset_of!(SceneUniforms, view), 64);
        assert_eq!(SceneUniforms::MODEL_OFFSET, 128);
        assert_eq!(std::mem::offset_of!(SceneUniforms, color), 192);
        assert_eq!(SceneUniforms::TIME_OFFSET, 208);
        assert_eq!(SceneUniforms::SIZE, 224);
    }

    #[test]
    fn partial_write_offsets_are_copy_aligned() {
        // wgpu requires write_buffer offsets/sizes in 4-byte units.
        assert_eq!(SceneUniforms::MODEL_OFFSET % 4, 0);
        assert_eq!(SceneUniforms::TIME_OFFSET % 4, 0);
    }

    #[test]
    fn initial_uniforms_carry_the_configured_color() {
        let u = SceneUniforms::initial(&ViewParams::default(), 800.0 / 600.0);
        assert_eq!(u.color, [0.0, 1.0, 0.4, 1.0]);
        assert_eq!(u.time, 0.0);
    }

    #[test]
    fn model_matrix_at_zero_angle_has_no_rotation() {
        let params = ViewParams::default();
        let m = params.model_matrix(0.0);
        // Column 0 is the scaled X basis vector, unrotated.
        let x_axis = m.x_axis;
        assert!((x_axis.x - params.model_scale).abs() < 1e-6);
        assert!(x_axis.y.abs() < 1e-6);
        assert!(x_axis.z.abs() < 1e-6);
    }

    #[test]
    fn model_matrix_spins_around_z() {
        let params = ViewParams::default();
        let quarter = params.model_matrix(std::f32::consts::FRAC_PI_2);
        // After a quarter turn the scaled X basis points along +Y.
        assert!(quarter.x_axis.x.abs() < 1e-6);
        assert!((quarter.x_axis.y - params.model_scale).abs() < 1e-6);
    }

    #[test]
    fn projection_is_finite_for_typical_aspects() {
        let params = ViewParams::default();
        for aspect in [800.0 / 600.0, 1.0, 2.0] {
            let p = params.projection_matrix(aspect);
            assert!(p.to_cols_array().iter().all(|v| v.is_finite()));
        }
    }
}
