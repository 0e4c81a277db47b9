use cgmath::Vector3;
use strum_macros::EnumIter;

/// The six faces of a voxel, in the order they are meshed.
#[derive(EnumIter, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    XNeg,
    XPos,
    YNeg,
    YPos,
    ZNeg,
    ZPos,
}

impl Direction {
    pub fn to_vec(self) -> Vector3<i32> {
        match self {
            Direction::XNeg => -Vector3::unit_x(),
            Direction::XPos => Vector3::unit_x(),
            Direction::YNeg => -Vector3::unit_y(),
            Direction::YPos => Vector3::unit_y(),
            Direction::ZNeg => -Vector3::unit_z(),
            Direction::ZPos => Vector3::unit_z(),
        }
    }

    /// Indices into the unit cube corners, counterclockwise when looking at the face from outside of the voxel
    pub(crate) fn quad_corners(self) -> [usize; 4] {
        match self {
            Direction::XNeg => [2, 0, 4, 6],
            Direction::XPos => [7, 5, 1, 3],
            Direction::YNeg => [0, 1, 5, 4],
            Direction::YPos => [2, 6, 7, 3],
            Direction::ZNeg => [3, 1, 0, 2],
            Direction::ZPos => [6, 4, 5, 7],
        }
    }
}

impl From<Direction> for Vector3<i32> {
    fn from(value: Direction) -> Self {
        value.to_vec()
    }
}
