pub use crate::error::{Error, Result};
pub use crate::fov::FOV;
pub use crate::volume::{Volume, VolumeStore};
pub use crate::detector::{DetectorStack, DetectorStore};
pub use crate::projector::{DistanceDriven, Projector, ProjectionStats};

pub use geometry::{CircularTrajectory, Detector, GeometryProvider, Point, Projection, ProjectionMatrix};
