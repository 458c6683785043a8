use nalgebra::{Matrix3, Vector4};

use crate::{Point, ProjectionMatrix};

/// Homogeneous coordinates smaller than this (relative to the magnitude of the
/// vector they belong to) are treated as zero: the point lies at infinity.
pub const DEGENERATE_EPS: f64 = 1e-10;

/// Pinhole projection of world space onto a flat detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    matrix: ProjectionMatrix,
}

impl Projection {

    pub fn new(matrix: ProjectionMatrix) -> Self { Self { matrix } }

    /// Compose `K [R | -R s]` from the intrinsic matrix `k`, the rotation `r`
    /// whose rows are the detector u, v and viewing axes, and the source
    /// position `s`.
    pub fn from_intrinsics(k: Matrix3<f64>, r: Matrix3<f64>, source: Point) -> Self {
        let t = -(r * source.coords);
        let rt = ProjectionMatrix::from_columns(&[
            r.column(0).into_owned(),
            r.column(1).into_owned(),
            r.column(2).into_owned(),
            t,
        ]);
        Self::new(k * rt)
    }

    pub fn matrix(&self) -> &ProjectionMatrix { &self.matrix }

    /// The source position: the point whose image is undefined, i.e. the
    /// right null vector of the matrix, found from its four 3x3 cofactors.
    pub fn camera_center(&self) -> Option<Point> {
        let p = &self.matrix;
        let det = |a: usize, b: usize, c: usize| {
            Matrix3::from_columns(&[
                p.column(a).into_owned(),
                p.column(b).into_owned(),
                p.column(c).into_owned(),
            ]).determinant()
        };
        let null = Vector4::new(det(1, 2, 3), -det(0, 2, 3), det(0, 1, 3), -det(0, 1, 2));
        if null.w.abs() <= DEGENERATE_EPS * null.norm() { return None }
        Point::from_homogeneous(null)
    }

    /// Detector coordinates `(u, v)` of a world point, or `None` if it lies in
    /// the source's focal plane.
    pub fn project(&self, point: Point) -> Option<(f64, f64)> {
        let h = self.matrix * point.to_homogeneous();
        if h.z.abs() <= DEGENERATE_EPS * h.norm() { return None }
        Some((h.x / h.z, h.y / h.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use rstest::rstest;

    #[rstest(/**/   sx ,    sy ,   sz ,
             case(  0.0,    0.0,  0.0),
             case(600.0,    0.0,  0.0),
             case(  0.0, -450.0, 12.5),
             case(-31.0,  250.0, -4.0),
    )]
    fn camera_center_recovers_source(sx: f64, sy: f64, sz: f64) {
        let source = Point::new(sx, sy, sz);
        let k = Matrix3::new(1200.0,    0.0, 63.5,
                                0.0, 1100.0, 47.5,
                                0.0,    0.0,  1.0);
        let (s, c) = (0.3_f64.sin(), 0.3_f64.cos());
        let r = Matrix3::new(  s, -c, 0.0,
                             0.0, 0.0, 1.0,
                              -c,  -s, 0.0);
        let centre = Projection::from_intrinsics(k, r, source).camera_center().unwrap();
        assert_float_eq!([centre.x, centre.y, centre.z], [sx, sy, sz], abs <= [1e-9; 3]);
    }

    #[test]
    fn orthographic_camera_is_at_infinity() {
        let p = ProjectionMatrix::new(1.0, 0.0, 0.0, 5.0,
                                      0.0, 0.0, 1.0, 5.0,
                                      0.0, 0.0, 0.0, 1.0);
        assert_eq!(Projection::new(p).camera_center(), None);
    }

    #[test]
    fn points_in_focal_plane_do_not_project() {
        let p = ProjectionMatrix::new(1.0, 0.0, 0.0, 0.0,
                                      0.0, 1.0, 0.0, 0.0,
                                      0.0, 0.0, 1.0, 0.0);
        let projection = Projection::new(p);
        assert_eq!(projection.project(Point::new(3.0, 4.0, 0.0)), None);
        assert_eq!(projection.project(Point::new(3.0, 4.0, 2.0)), Some((1.5, 2.0)));
    }
}
