pub mod chunk;
pub mod chunk_data;
pub mod chunk_manager;
pub mod location;
pub mod mesh;
pub mod meshing;
pub mod terrain;
pub mod voxel;
