use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, Vector3};

pub struct Camera {
    pub position: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
    fov_y: Rad<f32>,
    z_near: f32,
    z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new((5.0, 5.0, 15.0), Deg(-90.0), Deg(0.0), Deg(45.0), 0.1, 100.0)
    }
}

impl Camera {
    pub fn new<V, Y, P, F>(position: V, yaw: Y, pitch: P, fov_y: F, z_near: f32, z_far: f32) -> Self
    where
        V: Into<Point3<f32>>,
        Y: Into<Rad<f32>>,
        P: Into<Rad<f32>>,
        F: Into<Rad<f32>>,
    {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            fov_y: fov_y.into(),
            z_near,
            z_far,
        }
    }

    pub fn front(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();

        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.front(), Vector3::unit_y())
    }

    /// OpenGL style perspective projection, clip space z in `[-1, 1]`
    pub fn projection_matrix(&self, viewport_width: f32, viewport_height: f32) -> Matrix4<f32> {
        cgmath::perspective(self.fov_y, viewport_width / viewport_height, self.z_near, self.z_far)
    }
}
