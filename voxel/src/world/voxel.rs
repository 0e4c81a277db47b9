use cgmath::{Vector3, Zero};

/// Tint given to voxels that are activated without an explicit color.
pub const PLACEHOLDER_COLOR: Vector3<f32> = Vector3::new(0.5, 0.2, 0.7);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Voxel {
    active: bool,
    color: Vector3<f32>,
}

impl Default for Voxel {
    fn default() -> Self {
        Self {
            active: true,
            color: PLACEHOLDER_COLOR,
        }
    }
}

impl Voxel {
    pub const fn new(color: Vector3<f32>) -> Self {
        Self { active: true, color }
    }

    /// An inactive voxel. It is colored black, which never shows up because inactive voxels are not meshed.
    pub fn inactive() -> Self {
        Self {
            active: false,
            color: Vector3::zero(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }

    pub fn color(&self) -> Vector3<f32> {
        self.color
    }

    pub fn set_color(&mut self, color: Vector3<f32>) {
        self.color = color;
    }
}
