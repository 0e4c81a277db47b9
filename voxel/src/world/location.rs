use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::{Add, Deref};
use std::str::FromStr;

use anyhow::{Context, bail};
use cgmath::Vector3;
use itertools::iproduct;

/// The size of a three dimensional grid, either of voxels inside a chunk or of chunks inside the world.
/// Grid cells are stored in a flat array in x-fastest order, so `(x, y, z)` lives at `x + width * (y + height * z)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Extents {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl Extents {
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self { width, height, depth }
    }

    pub const fn volume(&self) -> usize {
        self.width * self.height * self.depth
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        (0..self.width as i64).contains(&(x as i64))
            && (0..self.height as i64).contains(&(y as i64))
            && (0..self.depth as i64).contains(&(z as i64))
    }

    /// Flat index of a cell. Callers must make sure the cell lies inside of these extents.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && z < self.depth, "({x}, {y}, {z}) is outside of {self}");

        x + self.width * (y + self.height * z)
    }

    /// Inverse of [Extents::index]
    pub fn location_of(&self, index: usize) -> Vector3<usize> {
        let x = index % self.width;
        let y = index / self.width % self.height;
        let z = index / (self.width * self.height);

        Vector3::new(x, y, z)
    }

    /// All locations inside of these extents with x as the outermost and z as the innermost coordinate.
    pub fn iter(&self) -> impl Iterator<Item = LocalLocation<WithinBounds>> + use<> {
        iproduct!(0..self.width as i32, 0..self.height as i32, 0..self.depth as i32)
            .map(|coords| LocalLocation::new_unchecked(coords.into()))
    }
}

impl Display for Extents {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// Parses extents written as `WIDTHxHEIGHTxDEPTH`, e.g. `16x10x16`
impl FromStr for Extents {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split('x')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .with_context(|| format!("invalid extent component `{part}` in `{s}`"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match parts[..] {
            [width, height, depth] => Ok(Self::new(width, height, depth)),
            _ => bail!("expected extents in the form WIDTHxHEIGHTxDEPTH, got `{s}`"),
        }
    }
}

/// The slot of a chunk in the world grid.
/// Each ChunkLocation unit is equal to the chunk extents along that axis when rendering.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChunkLocation(Vector3<usize>);

impl ChunkLocation {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn to_world_offset(self, chunk_extents: Extents) -> Vector3<f32> {
        Vector3::new(
            (self.0.x * chunk_extents.width) as f32,
            (self.0.y * chunk_extents.height) as f32,
            (self.0.z * chunk_extents.depth) as f32,
        )
    }
}

impl From<Vector3<usize>> for ChunkLocation {
    fn from(value: Vector3<usize>) -> Self {
        Self(value)
    }
}

impl Deref for ChunkLocation {
    type Target = Vector3<usize>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A local location inside of a specific chunk.
/// The generic type `State` signals whether it is confirmed that the location is within the extents of the chunk.
/// It can be either one of [WithinBounds] or [OutsideBounds].
/// When creating a new location, State=OutsideBounds is assumed. To get a State=WithinBounds the method [LocalLocation::try_into_checked] can be called.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LocalLocation<State = OutsideBounds> {
    location: Vector3<i32>,
    phantom: PhantomData<State>,
}

/// Marker type for [LocalLocation]
/// It is known for the local location to be within the chunk boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct WithinBounds;

/// Marker type for [LocalLocation]
/// It is unknown whether the local location is within the chunk boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutsideBounds;

impl LocalLocation<OutsideBounds> {
    pub fn new(location: Vector3<i32>) -> Self {
        Self {
            location,
            phantom: PhantomData,
        }
    }

    pub fn try_into_checked(self, extents: Extents) -> Option<LocalLocation<WithinBounds>> {
        extents
            .contains(self.location.x, self.location.y, self.location.z)
            .then(|| LocalLocation::new_unchecked(self.location))
    }
}

impl LocalLocation<WithinBounds> {
    pub fn new_unchecked(location: Vector3<i32>) -> Self {
        LocalLocation {
            location,
            phantom: PhantomData,
        }
    }

    pub fn to_index(self, extents: Extents) -> usize {
        extents.index(self.location.x as usize, self.location.y as usize, self.location.z as usize)
    }
}

impl<T> LocalLocation<T> {
    pub fn to_f32(self) -> Vector3<f32> {
        Vector3::new(self.location.x as f32, self.location.y as f32, self.location.z as f32)
    }
}

impl<T, A: Into<Vector3<i32>>> Add<A> for LocalLocation<T> {
    type Output = LocalLocation<OutsideBounds>;

    fn add(self, rhs: A) -> Self::Output {
        LocalLocation::new(self.location + rhs.into())
    }
}

impl<T> Deref for LocalLocation<T> {
    type Target = Vector3<i32>;

    fn deref(&self) -> &Self::Target {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use cgmath::Vector3;

    use crate::world::location::{ChunkLocation, Extents, LocalLocation};

    #[test]
    fn index_is_a_bijection() {
        let extents = Extents::new(3, 4, 5);

        let indices: HashSet<usize> = extents.iter().map(|loc| loc.to_index(extents)).collect();

        assert_eq!(indices.len(), extents.volume());
        assert_eq!(extents.index(0, 0, 0), 0);
        assert_eq!(extents.index(2, 3, 4), extents.volume() - 1);
        assert_eq!(extents.index(1, 2, 3), 1 + 3 * (2 + 4 * 3));

        for index in 0..extents.volume() {
            let location = extents.location_of(index);
            assert_eq!(extents.index(location.x, location.y, location.z), index);
        }
    }

    #[test]
    fn iteration_order_has_z_innermost() {
        let extents = Extents::new(2, 2, 2);
        let order: Vec<Vector3<i32>> = extents.iter().map(|loc| *loc).collect();

        assert_eq!(order[0], Vector3::new(0, 0, 0));
        assert_eq!(order[1], Vector3::new(0, 0, 1));
        assert_eq!(order[2], Vector3::new(0, 1, 0));
        assert_eq!(order[4], Vector3::new(1, 0, 0));
        assert_eq!(order.len(), 8);
    }

    #[test]
    fn bounds_check() {
        let extents = Extents::new(2, 3, 4);

        assert!(LocalLocation::new(Vector3::new(1, 2, 3)).try_into_checked(extents).is_some());
        assert!(LocalLocation::new(Vector3::new(2, 0, 0)).try_into_checked(extents).is_none());
        assert!(LocalLocation::new(Vector3::new(0, 3, 0)).try_into_checked(extents).is_none());
        assert!(LocalLocation::new(Vector3::new(0, 0, 4)).try_into_checked(extents).is_none());
        assert!(LocalLocation::new(Vector3::new(-1, 0, 0)).try_into_checked(extents).is_none());

        let corner = LocalLocation::new(Vector3::new(1, 2, 3))
            .try_into_checked(extents)
            .expect("Location is inside boundaries because it's hardcoded");
        assert!((corner + Vector3::<i32>::unit_x()).try_into_checked(extents).is_none());
        assert!((corner + -Vector3::<i32>::unit_x()).try_into_checked(extents).is_some());
    }

    #[test]
    fn parse_extents() {
        assert_eq!("16x10x16".parse::<Extents>().unwrap(), Extents::new(16, 10, 16));
        assert_eq!(" 4 x 4 x 4 ".parse::<Extents>().unwrap(), Extents::new(4, 4, 4));
        assert!("16x16".parse::<Extents>().is_err());
        assert!("axbxc".parse::<Extents>().is_err());
        assert_eq!(Extents::new(1, 2, 3).to_string(), "1x2x3");
    }

    #[test]
    fn chunk_world_offset() {
        let chunk_extents = Extents::new(4, 8, 16);

        assert_eq!(ChunkLocation::new(0, 0, 0).to_world_offset(chunk_extents), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(ChunkLocation::new(1, 2, 3).to_world_offset(chunk_extents), Vector3::new(4.0, 16.0, 48.0));
    }
}
