use std::path::Path;

use units::todo::Intensityf32;

use crate::{
    Error, Result,
    fov::FOV,
    index::{BoxDim_u, Index1_u, Index3_u, index3_to_1},
    io,
};

/// Access contract for 3-d grids of voxel values, as required by projectors.
///
/// Indices passed by projectors are always within `dims()`.
pub trait VolumeStore {
    fn dims(&self) -> BoxDim_u;
    fn get(&self, index: Index3_u) -> Intensityf32;
    fn set(&mut self, index: Index3_u, value: Intensityf32);
    fn add(&mut self, index: Index3_u, value: Intensityf32);
}

pub type VolumeData = Vec<Intensityf32>;

#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    pub fov: FOV,
    pub data: VolumeData,
}

impl Volume {

    pub fn new(fov: FOV, data: VolumeData) -> Result<Self> {
        let expected = fov.n_voxels();
        if data.len() != expected {
            return Err(Error::DataLength { expected, found: data.len() })
        }
        Ok(Self { fov, data })
    }

    pub fn zeros(fov: FOV) -> Self { Self { data: Self::zeros_buffer(fov), fov } }

    pub fn ones(fov: FOV) -> Self { Self { data: vec![1.0; fov.n_voxels()], fov } }

    /// A new empty data store with matching size
    pub fn zeros_buffer(fov: FOV) -> VolumeData { vec![0.0; fov.n_voxels()] }

    pub fn sum(&self) -> f64 { self.data.iter().map(|&x| x as f64).sum() }

    pub fn max(&self) -> Intensityf32 { self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max) }

    /// Inner product, accumulated in `f64`
    pub fn dot(&self, other: &Self) -> f64 {
        self.data.iter().zip(other.data.iter()).map(|(&a, &b)| a as f64 * b as f64).sum()
    }

    pub fn from_raw_file(path: &Path, fov: FOV) -> Result<Self> {
        let data = io::raw::read(path)?.collect::<std::io::Result<_>>()?;
        Self::new(fov, data)
    }

    pub fn write_to_raw_file(&self, path: &Path) -> Result<()> {
        io::raw::write(self.data.iter().copied(), path)?;
        Ok(())
    }
}

impl core::ops::IndexMut<Index1_u> for Volume {
    #[inline]
    fn index_mut(&mut self, i: Index1_u) -> &mut Self::Output { &mut self.data[i] }
}

impl core::ops::Index<Index1_u> for Volume {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1_u) -> &Self::Output { &self.data[i] }
}

impl core::ops::IndexMut<Index3_u> for Volume {
    #[inline]
    fn index_mut(&mut self, i3: Index3_u) -> &mut Self::Output {
        let i1 = index3_to_1(i3, self.fov.n);
        &mut self.data[i1]
    }
}

impl core::ops::Index<Index3_u> for Volume {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i3: Index3_u) -> &Self::Output {
        let i1 = index3_to_1(i3, self.fov.n);
        &self.data[i1]
    }
}

impl VolumeStore for Volume {
    fn dims(&self) -> BoxDim_u { self.fov.n }
    #[inline] fn get(&self, index: Index3_u) -> Intensityf32 { self[index] }
    #[inline] fn set(&mut self, index: Index3_u, value: Intensityf32) { self[index]  = value; }
    #[inline] fn add(&mut self, index: Index3_u, value: Intensityf32) { self[index] += value; }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    fn fov() -> FOV { FOV::centred([3, 4, 5], [1.0, 1.0, 1.0]) }

    #[test]
    fn data_length_must_match_fov() {
        let err = Volume::new(fov(), vec![0.0; 59]).unwrap_err();
        assert!(matches!(err, Error::DataLength { expected: 60, found: 59 }));
        assert!(Volume::new(fov(), vec![0.0; 60]).is_ok());
    }

    #[test]
    fn store_contract() {
        let mut v = Volume::zeros(fov());
        v.set([2, 3, 4], 1.5);
        v.add([2, 3, 4], 2.0);
        v.add([0, 1, 0], -1.0);
        assert_eq!(v.get([2, 3, 4]), 3.5);
        assert_eq!(v[59], 3.5);
        assert_eq!(v[[0, 1, 0]], -1.0);
        assert_eq!(v.dims(), [3, 4, 5]);
        assert_eq!(v.sum(), 2.5);
        assert_eq!(v.max(), 3.5);
    }

    #[test]
    fn raw_file_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("volume.raw");
        let mut original = Volume::zeros(fov());
        for (i, x) in original.data.iter_mut().enumerate() { *x = i as f32 * 0.25 }
        original.write_to_raw_file(&path)?;
        let reloaded = Volume::from_raw_file(&path, fov())?;
        assert_eq!(original, reloaded);
        // Wrong dimensions are detected
        let smaller = FOV::centred([3, 4, 4], [1.0, 1.0, 1.0]);
        assert!(matches!(Volume::from_raw_file(&path, smaller), Err(Error::DataLength { .. })));
        Ok(())
    }
}
