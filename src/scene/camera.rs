use crate::app::input::Key;
use crate::context::RenderContext;
use crate::gpu::GpuBackend;
use crate::math::{self, Mat4f, Vec3f};

/// First-person perspective camera.
///
/// The camera does not hold its matrices; it writes the projection into the
/// render context once at construction and the view on every
/// [`update_fps`](Self::update_fps).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3f,
    /// Accumulated look rotation. Yaw is applied on the left, pitch on the
    /// right.
    pub rotation: Mat4f,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Creates the camera and installs its projection, using the context's
    /// current window aspect ratio.
    pub fn new<B: GpuBackend>(
        ctx: &mut RenderContext<B>,
        position: Vec3f,
        fov: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let (width, height) = ctx.window_size();
        let aspect = width as f32 / height.max(1) as f32;
        ctx.set_projection_matrix(math::perspective(fov, aspect, near, far));

        Self {
            position,
            rotation: math::identity(),
            fov,
            near,
            far,
        }
    }

    /// One step of WASD movement and pointer look.
    ///
    /// Movement keys produce a fixed step along the camera's local -Z/+Z/-X/+X
    /// axes, turned by the current yaw so the camera walks where it faces but
    /// never climbs. Pointer motion since the previous update is consumed,
    /// normalized by the window size and scaled by the look sensitivity.
    pub fn update_fps<B: GpuBackend>(&mut self, ctx: &mut RenderContext<B>) {
        let step = ctx.settings().camera.move_step;
        let sensitivity = ctx.settings().camera.look_sensitivity;

        let input = ctx.input();
        let mut ds = Vec3f::ZERO;
        if input.is_key_down(Key::W) {
            ds.z -= step;
        }
        if input.is_key_down(Key::S) {
            ds.z += step;
        }
        if input.is_key_down(Key::A) {
            ds.x -= step;
        }
        if input.is_key_down(Key::D) {
            ds.x += step;
        }

        let (width, height) = ctx.window_size();
        let delta = ctx.input_mut().take_pointer_delta();
        let dx = delta.x / width.max(1) as f32 * sensitivity;
        let dy = delta.y / height.max(1) as f32 * sensitivity;

        self.rotation = math::multiply(math::rotate_y(dx), self.rotation);
        self.rotation = math::multiply(self.rotation, math::rotate_x(dy));

        // Points are row vectors, so walking along the view direction needs
        // the inverse yaw.
        let yaw = math::euler_from_rotation(&self.rotation).yaw;
        let ds = math::transform_point(ds, &math::rotate_y(-yaw));
        self.position = math::add(self.position, ds);

        let translation = math::translate(-self.position.x, -self.position.y, -self.position.z);
        ctx.set_view_matrix(math::multiply(translation, self.rotation));
    }
}
