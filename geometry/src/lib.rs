//! Acquisition geometry for cone-beam projectors: per-view 3x4 projection
//! matrices and the source (camera) positions they imply.

mod projection;
mod trajectory;

pub use projection::{Projection, DEGENERATE_EPS};
pub use trajectory::{CircularTrajectory, Detector};

pub type Point  = nalgebra::Point3 <units::todo::Lengthf64>;
pub type ProjectionMatrix = nalgebra::Matrix3x4<f64>;

/// Source of per-view geometry for forward and back projections.
///
/// Projectors query each view once per projection call, so implementations
/// are free to compute matrices on demand rather than caching them.
pub trait GeometryProvider {

    fn n_views(&self) -> usize;

    /// Maps homogeneous world points `(x, y, z, 1)` to homogeneous detector
    /// coordinates `(u w, v w, w)`.
    fn projection_matrix(&self, view: usize) -> ProjectionMatrix;

    /// Source position for `view`: the right null space of its projection
    /// matrix. `None` if the camera is at infinity.
    fn camera_center(&self, view: usize) -> Option<Point>;
}

impl GeometryProvider for [Projection] {
    fn n_views(&self) -> usize { self.len() }
    fn projection_matrix(&self, view: usize) -> ProjectionMatrix { *self[view].matrix() }
    fn camera_center(&self, view: usize) -> Option<Point> { self[view].camera_center() }
}

impl GeometryProvider for Vec<Projection> {
    fn n_views(&self) -> usize { self.len() }
    fn projection_matrix(&self, view: usize) -> ProjectionMatrix { *self[view].matrix() }
    fn camera_center(&self, view: usize) -> Option<Point> { self[view].camera_center() }
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for &G {
    fn n_views(&self) -> usize { (**self).n_views() }
    fn projection_matrix(&self, view: usize) -> ProjectionMatrix { (**self).projection_matrix(view) }
    fn camera_center(&self, view: usize) -> Option<Point> { (**self).camera_center(view) }
}
