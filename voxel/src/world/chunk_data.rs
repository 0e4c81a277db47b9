use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use crate::world::location::{Extents, LocalLocation, OutsideBounds, WithinBounds};
use crate::world::voxel::Voxel;

/// Dense voxel storage of a single chunk. The shape is fixed at construction, only the voxels themselves can change.
#[derive(Clone, PartialEq)]
pub struct ChunkData {
    extents: Extents,
    voxels: Vec<Voxel>,
}

impl Debug for ChunkData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChunkData({})", self.extents)
    }
}

impl ChunkData {
    /// Every voxel starts out as [Voxel::default], which is active.
    pub fn new(extents: Extents) -> Self {
        Self::new_filled_with_uniform_data(extents, Voxel::default())
    }

    pub fn new_filled_with_uniform_data(extents: Extents, voxel: Voxel) -> Self {
        Self {
            extents,
            voxels: vec![voxel; extents.volume()],
        }
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn get_voxel(&self, location: LocalLocation<WithinBounds>) -> &Voxel {
        &self.voxels[location.to_index(self.extents)]
    }

    pub fn get_voxel_mut(&mut self, location: LocalLocation<WithinBounds>) -> &mut Voxel {
        &mut self.voxels[location.to_index(self.extents)]
    }

    pub fn set_voxel_data(&mut self, location: LocalLocation<WithinBounds>, new_voxel: Voxel) {
        *self.get_voxel_mut(location) = new_voxel;
    }

    pub fn try_get_voxel(&self, location: LocalLocation<OutsideBounds>) -> Option<&Voxel> {
        Some(self.get_voxel(location.try_into_checked(self.extents)?))
    }

    pub fn is_active(&self, location: LocalLocation<OutsideBounds>) -> bool {
        self.try_get_voxel(location)
            .is_some_and(Voxel::is_active)
    }

    pub fn num_active(&self) -> usize {
        self.voxels
            .iter()
            .filter(|voxel| voxel.is_active())
            .count()
    }

    pub fn size_in_bytes(&self) -> usize {
        self.voxels.len() * size_of::<Voxel>()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use crate::world::chunk_data::ChunkData;
    use crate::world::location::{Extents, LocalLocation};
    use crate::world::voxel::Voxel;

    #[test]
    fn new_chunk_data_is_filled_with_default_voxels() {
        let data = ChunkData::new(Extents::new(2, 3, 4));

        assert_eq!(data.voxels().len(), 24);
        assert!(data.voxels().iter().all(|voxel| *voxel == Voxel::default()));
        assert_eq!(data.num_active(), 24);
    }

    #[test]
    fn writes_only_touch_their_own_cell() {
        let extents = Extents::new(3, 3, 3);
        let mut data = ChunkData::new_filled_with_uniform_data(extents, Voxel::inactive());
        let red = Voxel::new(Vector3::new(1.0, 0.0, 0.0));

        let loc = LocalLocation::new(Vector3::new(1, 2, 0))
            .try_into_checked(extents)
            .expect("Location is inside boundaries because it's hardcoded");
        data.set_voxel_data(loc, red);

        assert_eq!(*data.get_voxel(loc), red);
        assert_eq!(data.num_active(), 1);
        assert_eq!(data.voxels()[extents.index(1, 2, 0)], red);
    }

    #[test]
    fn out_of_bounds_lookups_find_nothing() {
        let data = ChunkData::new(Extents::new(2, 2, 2));

        assert!(data.try_get_voxel(LocalLocation::new(Vector3::new(2, 0, 0))).is_none());
        assert!(data.try_get_voxel(LocalLocation::new(Vector3::new(0, -1, 0))).is_none());
        assert!(!data.is_active(LocalLocation::new(Vector3::new(0, 0, 2))));
        assert!(data.is_active(LocalLocation::new(Vector3::new(1, 1, 1))));
    }
}
