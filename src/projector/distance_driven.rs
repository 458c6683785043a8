//! Distance-driven projection: the overlap of each voxel's footprint on the
//! detector with the detector pixels, scaled by an approximation of the length
//! of the ray through the voxel.
//!
//! The algorithm is centred around three simplifications:
//!
//! 1. Voxels are processed in columns along z. Each column `(i, j)` is
//!    projected only once per view: the footprints of successive slices are
//!    found by stepping the projected slice boundary by a fixed increment (see
//!    `SliceWalk`).
//!
//! 2. The width of a footprint along u is taken from the voxel's half-widths
//!    along whichever transaxial axis is *less* aligned with the ray from the
//!    source: x if the column is displaced from the source mostly along y, and
//!    vice versa. It is computed at the base of the column and reused for all
//!    its slices.
//!
//! 3. The ray-length correction (`amplitude`) is the ratio of the 3-d
//!    source-to-voxel distance to the in-plane distance along the dominant axis.
//!
//! Forward and back projection share all of the above; they differ only in
//! the direction in which values flow through the weights, which makes the
//! back projector the exact adjoint of the forward projector.

/// Distance-driven projector for a fixed volume geometry and acquisition
/// trajectory.
#[derive(Clone, Debug)]
pub struct DistanceDriven<G> {
    geometry: G,
    fov: FOV,
}

impl<G: GeometryProvider> DistanceDriven<G> {

    pub fn new(geometry: G, fov: FOV) -> Self { Self { geometry, fov } }

    pub fn geometry(&self) -> &G { &self.geometry }

    pub fn fov(&self) -> FOV { self.fov }

    fn check_volume(&self, found: BoxDim_u) -> Result<()> {
        let expected = self.fov.n;
        if found != expected { return Err(Error::VolumeDimensions { expected, found }) }
        Ok(())
    }

    fn check_views(&self, detector: usize) -> Result<()> {
        let geometry = self.geometry.n_views();
        if geometry != detector { return Err(Error::ViewCount { geometry, detector }) }
        Ok(())
    }

    /// Query the geometry for every view, before any projection work starts.
    fn view_setups(&self, pixels: [usize; 2]) -> Result<Vec<ViewSetup>> {
        (0..self.geometry.n_views())
            .map(|view| {
                let source = self.geometry.camera_center(view).ok_or(Error::CameraAtInfinity { view })?;
                let matrix = self.geometry.projection_matrix(view);
                Ok(ViewSetup::new(matrix, source, &self.fov, pixels))
            })
            .collect()
    }
}

impl<G: GeometryProvider> Projector for DistanceDriven<G> {

    fn forward_project<V>(&self, detector: &mut DetectorStack, volume: &V) -> Result<ProjectionStats>
    where
        V: VolumeStore + Sync + ?Sized,
    {
        let [n_views, n_u, n_v] = detector.dims();
        self.check_volume(volume.dims())?;
        self.check_views(n_views)?;
        let setups = self.view_setups([n_u, n_v])?;
        let fov = self.fov;

        // Each view writes to its own detector plane: no synchronization needed
        let stats = detector.data
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(setups.par_iter())
            .map(|(mut plane, setup)| {
                plane.fill(0.0);
                forward_project_view(setup, &fov, volume, plane)
            })
            .sum::<ProjectionStats>();

        report("Forward projection", &stats);
        Ok(stats)
    }

    fn back_project<D, V>(&self, detector: &D, volume: &mut V) -> Result<ProjectionStats>
    where
        D: DetectorStore + Sync + ?Sized,
        V: VolumeStore + ?Sized,
    {
        let [n_views, n_u, n_v] = detector.dims();
        self.check_volume(volume.dims())?;
        self.check_views(n_views)?;
        let setups = self.view_setups([n_u, n_v])?;
        let fov = self.fov;

        // Closure preparing the state needed by `fold`: will be called by
        // `fold` at the start of every job that is launched.
        let initial_thread_state = || (Volume::zeros(fov), ProjectionStats::default());

        // All views write into the same volume, so each job accumulates into
        // its own partial volume; these are summed once all views are done.
        // Rayon is too eager in spawning small jobs, each of which requires the
        // construction and subsequent combination of expensive accumulators
        // (whole volumes). So here we try to limit it to one job per thread.
        let job_size = n_views.div_ceil(rayon::current_num_threads()).max(1);
        let (backprojection, stats) = setups
            .par_iter()
            .enumerate()
            .with_min_len(job_size)
            .fold(initial_thread_state, |(mut partial, stats), (view, setup)| {
                let view_stats = back_project_view(setup, &fov, view, detector, &mut partial);
                (partial, stats + view_stats)
            })
            .reduce(initial_thread_state, |(a, sa), (b, sb)| (elementwise_add(a, b), sa + sb));

        // Overwrite every voxel: nothing survives from before this call
        for (i, &value) in backprojection.data.iter().enumerate() {
            volume.set(index1_to_3(i, fov.n), value);
        }

        report("Back projection", &stats);
        Ok(stats)
    }
}

fn report(what: &str, stats: &ProjectionStats) {
    log::debug!("{what}: {stats}");
    if stats.columns_degenerate > 0 {
        log::warn!("{what}: skipped {} voxel columns with undefined projections", stats.columns_degenerate);
    }
    if stats.any_truncated() {
        log::warn!("{what}: {} u and {} v footprints wider than {MAX_FOOTPRINT_PIXELS} pixels were truncated",
                   stats.truncated_u, stats.truncated_v);
    }
}

// ----- Per-view geometry --------------------------------------------------------------------------------

/// Quantities shared by all voxel columns in one view.
#[derive(Clone, Debug)]
pub struct ViewSetup {
    matrix: ProjectionMatrix,
    source: Point,
    /// Projected (homogeneous) displacements across half a voxel in x and in
    /// y, and across a whole voxel in z
    half_voxel_x: Vector3<f64>,
    half_voxel_y: Vector3<f64>,
    full_voxel_z: Vector3<f64>,
    n_u: usize,
    n_v: usize,
}

impl ViewSetup {

    pub fn new(matrix: ProjectionMatrix, source: Point, fov: &FOV, [n_u, n_v]: [usize; 2]) -> Self {
        let [dx, dy, dz] = fov.voxel_size;
        Self {
            matrix,
            source,
            half_voxel_x: matrix.column(0) * (dx / 2.0),
            half_voxel_y: matrix.column(1) * (dy / 2.0),
            full_voxel_z: matrix.column(2) * dz,
            n_u,
            n_v,
        }
    }

    /// Project the base of voxel column `(i, j)` and find its footprint.
    pub fn column(&self, [i, j]: [usize; 2], fov: &FOV) -> ColumnHit {
        let [dx, dy, dz] = fov.voxel_size;
        let [ox, oy, oz] = fov.offset;
        let x = i as Lengthf64 * dx - ox;
        let y = j as Lengthf64 * dy - oy;
        let z = -dz / 2.0 - oz;
        let base = self.matrix * Vector4::new(x, y, z, 1.0);

        // In-plane distances from the source
        let dsx = (x - self.source.x).abs();
        let dsy = (y - self.source.y).abs();

        // Measure the footprint across the axis more perpendicular to the ray
        let (ds0, half_voxel) = if dsy > dsx { (dsy, self.half_voxel_x) }
                                else         { (dsx, self.half_voxel_y) };
        if !(ds0 > 0.0 && ds0.is_finite()) { return ColumnHit::Degenerate }

        let edges = (
            detector_coordinate(base - half_voxel, U),
            detector_coordinate(base + half_voxel, U),
            detector_coordinate(base, V),
            detector_coordinate(base + self.full_voxel_z, V),
        );
        let (Some(left), Some(right), Some(bottom), Some(top)) = edges else {
            return ColumnHit::Degenerate
        };

        match Footprint::new(left, right, self.n_u) {
            None    => ColumnHit::Missed,
            Some(u) => ColumnHit::Visible(Column {
                u,
                v_bottom: bottom,
                v_step: top - bottom,
                dsxy_sqr: dsx * dsx + dsy * dsy,
                ds0,
                dz,
                z_from_source: -oz - self.source.z,
            }),
        }
    }
}

const U: usize = 0;
const V: usize = 1;

/// Pixel-edge based detector coordinate (pixel `i` covers `[i, i+1)`) along
/// `axis` of a projected homogeneous point; `None` if undefined.
#[inline]
fn detector_coordinate(h: Vector3<f64>, axis: usize) -> Option<f64> {
    if h.z.abs() <= DEGENERATE_EPS * h.norm() { return None }
    let c = h[axis] / h.z + 0.5;
    c.is_finite().then_some(c)
}

/// Where the projection of voxel column `(i, j)` lands, in one view.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnHit {
    Visible(Column),
    /// Footprint lies entirely outside the detector
    Missed,
    /// Projection undefined: column in the source's focal plane, or directly
    /// in line with the source
    Degenerate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub u: Footprint,
    /// Projected v-coordinate of the bottom of the column's first slice
    pub v_bottom: f64,
    /// Change in projected v-coordinate per slice
    pub v_step: f64,
    dsxy_sqr: f64,
    ds0: f64,
    dz: Lengthf64,
    z_from_source: Lengthf64,
}

impl Column {

    pub fn slices(&self, n_slices: usize, n_rows: usize) -> SliceWalk {
        SliceWalk::new(self.v_bottom, self.v_step, n_slices, n_rows)
    }

    /// Ray-length correction for slice `k`
    #[inline]
    pub fn amplitude(&self, k: usize) -> Weightf32 {
        let dsz = (k as Lengthf64 * self.dz + self.z_from_source).abs();
        ((dsz * dsz + self.dsxy_sqr).sqrt() / self.ds0) as Weightf32
    }
}

// ----- Per-view projection kernels ----------------------------------------------------------------------

/// Accumulate the projection of `volume` in one view into that view's `plane`
fn forward_project_view<V>(setup: &ViewSetup, fov: &FOV, volume: &V, mut plane: ArrayViewMut2<Intensityf32>) -> ProjectionStats
where
    V: VolumeStore + ?Sized,
{
    let mut stats = ProjectionStats::default();
    let [ni, nj, nk] = fov.n;
    for i in 0..ni {
        for j in 0..nj {
            let column = match setup.column([i, j], fov) {
                ColumnHit::Visible(column) => column,
                ColumnHit::Missed          => { stats.columns_missed     += 1; continue }
                ColumnHit::Degenerate      => { stats.columns_degenerate += 1; continue }
            };
            stats.columns_projected += 1;
            stats.truncated_u += column.u.is_truncated() as usize;

            for (k, v_footprint) in column.slices(nk, setup.n_v) {
                stats.voxels_projected += 1;
                stats.truncated_v += v_footprint.is_truncated() as usize;
                let contribution = volume.get([i, j, k]) * column.amplitude(k);
                if contribution == 0.0 { continue }
                for (iu, wu) in column.u.iter() {
                    let weighted = contribution * wu;
                    for (iv, wv) in v_footprint.iter() {
                        plane[[iu, iv]] += weighted * wv;
                    }
                }
            }
        }
    }
    stats
}

/// Accumulate the back projection of one `view` of `detector` into `volume`
fn back_project_view<D>(setup: &ViewSetup, fov: &FOV, view: usize, detector: &D, volume: &mut Volume) -> ProjectionStats
where
    D: DetectorStore + ?Sized,
{
    let mut stats = ProjectionStats::default();
    let [ni, nj, nk] = fov.n;
    for i in 0..ni {
        for j in 0..nj {
            let column = match setup.column([i, j], fov) {
                ColumnHit::Visible(column) => column,
                ColumnHit::Missed          => { stats.columns_missed     += 1; continue }
                ColumnHit::Degenerate      => { stats.columns_degenerate += 1; continue }
            };
            stats.columns_projected += 1;
            stats.truncated_u += column.u.is_truncated() as usize;

            for (k, v_footprint) in column.slices(nk, setup.n_v) {
                stats.voxels_projected += 1;
                stats.truncated_v += v_footprint.is_truncated() as usize;
                let mut total = 0.0;
                for (iu, wu) in column.u.iter() {
                    let mut sum = 0.0;
                    for (iv, wv) in v_footprint.iter() {
                        sum += wv * detector.get(view, iu, iv);
                    }
                    total += sum * wu;
                }
                volume.add([i, j, k], total * column.amplitude(k));
            }
        }
    }
    stats
}


// ----- Imports ------------------------------------------------------------------------------------------
use nalgebra::{Vector3, Vector4};
use ndarray::{ArrayViewMut2, Axis};
use rayon::prelude::*;

use geometry::{GeometryProvider, Point, ProjectionMatrix, DEGENERATE_EPS};
use units::todo::{Intensityf32, Lengthf64, Weightf32};

use crate::{
    Error, Result,
    detector::{DetectorStack, DetectorStore},
    fov::FOV,
    index::{BoxDim_u, index1_to_3},
    volume::{Volume, VolumeStore},
};

use super::{
    elementwise_add, Projector, ProjectionStats,
    footprint::{Footprint, SliceWalk, MAX_FOOTPRINT_PIXELS},
};
