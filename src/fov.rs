/// The size, granularity and placement of the Field of View (FOV) in which
/// volumes are reconstructed.

use geometry::Point;
use units::todo::Lengthf64;

use crate::index::{BoxDim_u, Index3_u, Index1_u, index1_to_3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FOV {
    pub n: BoxDim_u,
    pub voxel_size: [Lengthf64; 3],
    /// Voxel `[0,0,0]` is centred at `-offset`
    pub offset: [Lengthf64; 3],
}

impl FOV {

    pub fn new(n: BoxDim_u, voxel_size: [Lengthf64; 3], offset: [Lengthf64; 3]) -> Self {
        Self { n, voxel_size, offset }
    }

    /// Place the centre of the voxel grid at the world origin
    pub fn centred(n: BoxDim_u, voxel_size: [Lengthf64; 3]) -> Self {
        let offset = [0, 1, 2].map(|d| (n[d] as Lengthf64 - 1.0) * voxel_size[d] / 2.0);
        Self { n, voxel_size, offset }
    }

    pub fn n_voxels(&self) -> usize { self.n.iter().product() }

    /// Find centre of voxel with given 3D index
    pub fn voxel_centre(&self, i: Index3_u) -> Point {
        let [dx, dy, dz] = self.voxel_size;
        let [ox, oy, oz] = self.offset;
        Point::new(i[0] as Lengthf64 * dx - ox,
                   i[1] as Lengthf64 * dy - oy,
                   i[2] as Lengthf64 * dz - oz)
    }

    /// Centre of the whole voxel grid
    pub fn centre(&self) -> Point {
        let [nx, ny, nz] = self.n.map(|n| n as Lengthf64 - 1.0);
        let [dx, dy, dz] = self.voxel_size;
        let [ox, oy, oz] = self.offset;
        Point::new(nx * dx / 2.0 - ox, ny * dy / 2.0 - oy, nz * dz / 2.0 - oz)
    }

    /// Find centre of voxel with given 1D index
    pub fn voxel_centre1(&self, i: Index1_u) -> Point {
        self.voxel_centre(index1_to_3(i, self.n))
    }
}

#[cfg(test)]
mod test_fov {
    use super::*;
    use rstest::rstest;
    use float_eq::assert_float_eq;

    #[rstest(/**/ index,   expected_position,
             case([0,0,0], [-1.0, -1.0, -1.0]),
             case([0,0,1], [-1.0, -1.0,  1.0]),
             case([0,1,0], [-1.0,  1.0, -1.0]),
             case([0,1,1], [-1.0,  1.0,  1.0]),
             case([1,0,0], [ 1.0, -1.0, -1.0]),
             case([1,0,1], [ 1.0, -1.0,  1.0]),
             case([1,1,0], [ 1.0,  1.0, -1.0]),
             case([1,1,1], [ 1.0,  1.0,  1.0]),
    )]
    fn test_voxel_centre(index: Index3_u, expected_position: [Lengthf64; 3]) {
        let fov = FOV::centred([2,2,2], [2.0, 2.0, 2.0]);
        let c = fov.voxel_centre(index);
        assert_float_eq!([c.x, c.y, c.z], expected_position, ulps <= [1, 1, 1]);
    }

    #[test]
    fn explicit_offset() {
        let fov = FOV::new([4, 5, 6], [0.5, 1.0, 2.0], [1.0, 0.0, -3.0]);
        let c = fov.voxel_centre([3, 4, 5]);
        assert_float_eq!([c.x, c.y, c.z], [0.5, 4.0, 13.0], ulps <= [1, 1, 1]);
        assert_eq!(fov.n_voxels(), 120);
        let c = fov.centre();
        assert_float_eq!([c.x, c.y, c.z], [-0.25, 2.0, 8.0], ulps <= [1, 1, 1]);
        assert_eq!(FOV::centred([4, 5, 6], [0.5, 1.0, 2.0]).centre(), Point::origin());
    }
}
