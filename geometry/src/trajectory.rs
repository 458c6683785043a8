//! Circular cone-beam acquisition: the source orbits the world z-axis, a flat
//! detector faces it from the far side of the axis.

use nalgebra::Matrix3;

use units::{Angle, Length, mm_, radian_, todo::{Anglef64, Lengthf64}};

use crate::{GeometryProvider, Point, Projection, ProjectionMatrix};

/// Pixel grid of a flat detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detector {
    /// Number of pixels along u (tangential) and v (axial)
    pub n: [usize; 2],
    pub pixel_size: [Lengthf64; 2],
}

impl Detector {
    pub fn new(n: [usize; 2], [du, dv]: [Length; 2]) -> Self {
        Self { n, pixel_size: [mm_(du), mm_(dv)] }
    }

    /// Detector coordinate on which the principal ray lands: the centre of the
    /// pixel grid, with pixel `i` centred on coordinate `i`.
    pub fn principal_point(&self) -> [f64; 2] {
        let [nu, nv] = self.n;
        [(nu as f64 - 1.0) / 2.0, (nv as f64 - 1.0) / 2.0]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircularTrajectory {
    pub n_views: usize,
    pub start_angle: Anglef64,
    pub angular_increment: Anglef64,
    pub source_to_axis: Lengthf64,
    pub source_to_detector: Lengthf64,
    pub detector: Detector,
}

impl CircularTrajectory {

    /// `n_views` views evenly covering `angular_range`, the first at `start_angle`.
    pub fn new(
        n_views           : usize,
        angular_range     : Angle,
        start_angle       : Angle,
        source_to_axis    : Length,
        source_to_detector: Length,
        detector          : Detector,
    ) -> Self {
        let angular_increment = if n_views == 0 { 0.0 }
                                else            { radian_(angular_range) / n_views as f64 };
        Self {
            n_views,
            start_angle: radian_(start_angle),
            angular_increment,
            source_to_axis: mm_(source_to_axis),
            source_to_detector: mm_(source_to_detector),
            detector,
        }
    }

    pub fn angle(&self, view: usize) -> Anglef64 {
        self.start_angle + view as f64 * self.angular_increment
    }

    pub fn source_position(&self, view: usize) -> Point {
        let (s, c) = self.angle(view).sin_cos();
        Point::new(self.source_to_axis * c, self.source_to_axis * s, 0.0)
    }

    /// Magnification of objects on the rotation axis
    pub fn magnification(&self) -> f64 { self.source_to_detector / self.source_to_axis }

    pub fn projection(&self, view: usize) -> Projection {
        let (s, c) = self.angle(view).sin_cos();
        let [du, dv] = self.detector.pixel_size;
        let [u0, v0] = self.detector.principal_point();
        let f = self.source_to_detector;
        let k = Matrix3::new(f / du,    0.0, u0,
                                0.0, f / dv, v0,
                                0.0,    0.0, 1.0);
        // Rows: detector u (tangential), detector v (axial), viewing direction
        // (from the source towards the axis).
        let r = Matrix3::new(  s,  -c, 0.0,
                             0.0, 0.0, 1.0,
                              -c,  -s, 0.0);
        Projection::from_intrinsics(k, r, self.source_position(view))
    }

    pub fn projections(&self) -> Vec<Projection> {
        (0..self.n_views).map(|view| self.projection(view)).collect()
    }
}

impl GeometryProvider for CircularTrajectory {
    fn n_views(&self) -> usize { self.n_views }
    fn projection_matrix(&self, view: usize) -> ProjectionMatrix { *self.projection(view).matrix() }
    fn camera_center(&self, view: usize) -> Option<Point> { Some(self.source_position(view)) }
}
