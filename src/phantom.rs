//! Simple synthetic volumes for exercising the projectors.

use rand::Rng;

use geometry::Point;
use units::todo::{Intensityf32, Lengthf64};

use crate::{fov::FOV, volume::Volume};

/// Axis-aligned ellipsoid of uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    pub centre: Point,
    pub semi_axes: [Lengthf64; 3],
    pub value: Intensityf32,
}

impl Ellipsoid {

    pub fn sphere(centre: Point, radius: Lengthf64, value: Intensityf32) -> Self {
        Self { centre, semi_axes: [radius; 3], value }
    }

    pub fn contains(&self, p: &Point) -> bool {
        let d = *p - self.centre;
        (0..3).map(|i| (d[i] / self.semi_axes[i]).powi(2)).sum::<f64>() <= 1.0
    }
}

/// Rasterize `shapes` by voxel-centre inclusion. Where shapes overlap, their
/// values are added.
pub fn rasterize(fov: FOV, shapes: &[Ellipsoid]) -> Volume {
    let mut volume = Volume::zeros(fov);
    for (i, voxel) in volume.data.iter_mut().enumerate() {
        let centre = fov.voxel_centre1(i);
        *voxel = shapes.iter()
            .filter(|shape| shape.contains(&centre))
            .map(|shape| shape.value)
            .sum();
    }
    volume
}

/// Volume with `n` single-voxel dots of `value` at random positions. Dots
/// landing on the same voxel accumulate.
pub fn random_dots<R: Rng + ?Sized>(fov: FOV, n: usize, value: Intensityf32, rng: &mut R) -> Volume {
    let mut volume = Volume::zeros(fov);
    let n_voxels = fov.n_voxels();
    if n_voxels == 0 { return volume }
    for _ in 0..n {
        volume[rng.gen_range(0..n_voxels)] += value;
    }
    volume
}
