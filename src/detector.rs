use std::path::Path;

use ndarray::{Array3, Axis, ArrayView2};

use units::todo::Intensityf32;

use crate::{Error, Result, io};

/// Access contract for stacks of detector images, indexed `(view, u, v)`.
pub trait DetectorStore {
    /// `[n_views, n_u, n_v]`
    fn dims(&self) -> [usize; 3];
    fn get(&self, view: usize, u: usize, v: usize) -> Intensityf32;
    fn set(&mut self, view: usize, u: usize, v: usize, value: Intensityf32);
    fn add(&mut self, view: usize, u: usize, v: usize, value: Intensityf32);
}

/// One detector image per view, stored contiguously in `[view][u][v]` order.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorStack {
    pub data: Array3<Intensityf32>,
}

impl DetectorStack {

    pub fn zeros(n_views: usize, [n_u, n_v]: [usize; 2]) -> Self {
        Self { data: Array3::zeros((n_views, n_u, n_v)) }
    }

    pub fn from_shape_vec(n_views: usize, [n_u, n_v]: [usize; 2], data: Vec<Intensityf32>) -> Result<Self> {
        let expected = n_views * n_u * n_v;
        let found = data.len();
        Array3::from_shape_vec((n_views, n_u, n_v), data)
            .map(|data| Self { data })
            .map_err(|_| Error::DataLength { expected, found })
    }

    pub fn n_views(&self) -> usize { self.data.len_of(Axis(0)) }

    pub fn view(&self, view: usize) -> ArrayView2<Intensityf32> { self.data.index_axis(Axis(0), view) }

    pub fn sum(&self) -> f64 { self.data.iter().map(|&x| x as f64).sum() }

    /// Inner product, accumulated in `f64`
    pub fn dot(&self, other: &Self) -> f64 {
        self.data.iter().zip(other.data.iter()).map(|(&a, &b)| a as f64 * b as f64).sum()
    }

    pub fn from_raw_file(path: &Path, n_views: usize, pixels: [usize; 2]) -> Result<Self> {
        let data = io::raw::read(path)?.collect::<std::io::Result<_>>()?;
        Self::from_shape_vec(n_views, pixels, data)
    }

    pub fn write_to_raw_file(&self, path: &Path) -> Result<()> {
        // Standard layout is guaranteed by construction, so iteration order is
        // storage order
        io::raw::write(self.data.iter().copied(), path)?;
        Ok(())
    }
}

impl DetectorStore for DetectorStack {
    fn dims(&self) -> [usize; 3] {
        let (n_views, n_u, n_v) = self.data.dim();
        [n_views, n_u, n_v]
    }
    #[inline] fn get(&self, view: usize, u: usize, v: usize) -> Intensityf32 { self.data[[view, u, v]] }
    #[inline] fn set(&mut self, view: usize, u: usize, v: usize, value: Intensityf32) { self.data[[view, u, v]]  = value; }
    #[inline] fn add(&mut self, view: usize, u: usize, v: usize, value: Intensityf32) { self.data[[view, u, v]] += value; }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn store_contract() {
        let mut d = DetectorStack::zeros(2, [3, 4]);
        d.set(1, 2, 3, 4.0);
        d.add(1, 2, 3, 0.5);
        d.add(0, 0, 0, 1.0);
        assert_eq!(d.dims(), [2, 3, 4]);
        assert_eq!(d.get(1, 2, 3), 4.5);
        assert_eq!(d.view(1)[[2, 3]], 4.5);
        assert_eq!(d.sum(), 5.5);
        // Last element in storage order
        assert_eq!(d.data.as_slice().unwrap()[23], 4.5);
    }

    #[test]
    fn shape_mismatch() {
        let err = DetectorStack::from_shape_vec(2, [3, 4], vec![0.0; 25]).unwrap_err();
        assert!(matches!(err, Error::DataLength { expected: 24, found: 25 }));
    }

    #[test]
    fn raw_file_roundtrip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("projections.raw");
        let original = DetectorStack::from_shape_vec(3, [2, 5], (0..30).map(|i| i as f32).collect())?;
        original.write_to_raw_file(&path)?;
        assert_eq!(DetectorStack::from_raw_file(&path, 3, [2, 5])?, original);
        Ok(())
    }
}
