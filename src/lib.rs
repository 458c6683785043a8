//! Distance-driven forward and back projection for cone-beam CT.
//!
//! A [`DistanceDriven`] projector maps a [`Volume`] onto a [`DetectorStack`]
//! (one detector image per view of a [`GeometryProvider`]), and its adjoint
//! maps detector images back into the volume.

mod exports;
pub use exports::*;

pub mod config;
pub mod detector;
pub mod error;
pub mod fov;
pub mod index;
pub mod io;
pub mod phantom;
pub mod projector;
pub mod utils;
pub mod volume;
