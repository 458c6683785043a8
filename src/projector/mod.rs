//! Forward and backward projection between volumes and detector stacks.
//!
//! The `Projector` trait is the interface consumed by reconstruction
//! algorithms; `DistanceDriven` is its implementation.

pub mod footprint;
pub mod distance_driven;

pub use distance_driven::DistanceDriven;
pub use footprint::{Footprint, SliceWalk, MAX_FOOTPRINT_PIXELS};

/// Abstract interface for forward-backward projection implementations.
///
/// Both operations overwrite their output completely: within a single call
/// contributions from all views are summed, but nothing is carried over from
/// earlier calls.
pub trait Projector {

    /// Simulate the detector images of `volume`, replacing the contents of
    /// `detector`.
    ///
    /// Unlike `back_project`, this requires the concrete `DetectorStack`
    /// rather than any `DetectorStore`: views are projected in parallel, each
    /// into its own disjoint plane of the stack (`axis_iter_mut`), which
    /// per-pixel `add` through a shared store cannot provide without locking.
    fn forward_project<V>(&self, detector: &mut DetectorStack, volume: &V) -> Result<ProjectionStats>
    where
        V: VolumeStore + Sync + ?Sized;

    /// Apply the adjoint of `forward_project` to `detector`, replacing the
    /// contents of `volume`.
    fn back_project<D, V>(&self, detector: &D, volume: &mut V) -> Result<ProjectionStats>
    where
        D: DetectorStore + Sync + ?Sized,
        V: VolumeStore + ?Sized;
}

/// Diagnostic counters gathered during a projection.
///
/// Degenerate columns and truncated footprints are not errors, but they do
/// mean that the projection is less accurate than usual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    /// (view, voxel column) pairs whose footprint overlaps the detector
    pub columns_projected: usize,
    /// (view, voxel column) pairs whose footprint misses the detector
    pub columns_missed: usize,
    /// (view, voxel column) pairs skipped because their projection is undefined
    pub columns_degenerate: usize,
    /// (view, voxel) pairs which contributed
    pub voxels_projected: usize,
    /// Columns whose u-footprint exceeded `MAX_FOOTPRINT_PIXELS`
    pub truncated_u: usize,
    /// Voxels whose v-footprint exceeded `MAX_FOOTPRINT_PIXELS`
    pub truncated_v: usize,
}

impl ProjectionStats {
    pub fn any_truncated(&self) -> bool { self.truncated_u > 0 || self.truncated_v > 0 }
}

impl std::ops::Add for ProjectionStats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            columns_projected : self.columns_projected  + rhs.columns_projected,
            columns_missed    : self.columns_missed     + rhs.columns_missed,
            columns_degenerate: self.columns_degenerate + rhs.columns_degenerate,
            voxels_projected  : self.voxels_projected   + rhs.voxels_projected,
            truncated_u       : self.truncated_u        + rhs.truncated_u,
            truncated_v       : self.truncated_v        + rhs.truncated_v,
        }
    }
}

impl std::iter::Sum for ProjectionStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self { iter.fold(Self::default(), |a, b| a + b) }
}

impl std::fmt::Display for ProjectionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "columns: {} projected, {} missed, {} degenerate; voxels: {}; truncated footprints: {} u, {} v",
               group_digits(self.columns_projected),
               group_digits(self.columns_missed),
               group_digits(self.columns_degenerate),
               group_digits(self.voxels_projected),
               group_digits(self.truncated_u),
               group_digits(self.truncated_v),
        )
    }
}

fn elementwise_add(mut a: Volume, b: Volume) -> Volume {
    for (l, r) in a.data.iter_mut().zip(b.data) { *l += r }
    a
}

// ----- Imports ------------------------------------------------------------------------------------------
use crate::{
    Result,
    detector::{DetectorStack, DetectorStore},
    utils::group_digits,
    volume::{Volume, VolumeStore},
};
