//! Overlap of a voxel's projected extent with the detector pixel grid, along
//! one detector axis.
//!
//! Detector coordinates are pixel-edge based: pixel `i` covers `[i, i+1)`.

use units::todo::Weightf32;

/// Capacity of a footprint: the widest overlap, in pixels, that is accounted
/// for. Wider footprints are truncated, and flagged as such.
pub const MAX_FOOTPRINT_PIXELS: usize = 8;

/// Fractional overlap of an interval with consecutive detector pixels,
/// starting at pixel `first`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    first: usize,
    len: usize,
    weights: [Weightf32; MAX_FOOTPRINT_PIXELS],
    truncated: bool,
}

#[allow(clippy::len_without_is_empty)] // Never empty: `new` returns `None` instead
impl Footprint {

    /// Overlap of the interval between coordinates `a` and `b` (in either
    /// order) with a row of `n_pixels` pixels. `None` if there is no overlap.
    pub fn new(a: f64, b: f64, n_pixels: usize) -> Option<Self> {
        if !(a.is_finite() && b.is_finite()) { return None }
        let (lo, hi) = if a > b { (b, a) } else { (a, b) };

        // Clip to the detector
        let lo = lo.max(0.0);
        let hi = hi.min(n_pixels as f64);
        if lo >= hi { return None }

        let first = lo.floor() as usize;
        let reach = (hi.floor() as usize).min(n_pixels - 1);
        let last  = reach.min(first + MAX_FOOTPRINT_PIXELS - 1);
        let truncated = last < reach && hi > (last + 1) as f64;

        // Interior pixels are covered completely
        let mut weights = [1.0; MAX_FOOTPRINT_PIXELS];
        let len = last - first + 1;
        if len == 1 {
            weights[0] = (hi - lo) as Weightf32;
        } else {
            weights[0]       = (first as f64 + 1.0 - lo) as Weightf32;
            weights[len - 1] = (hi - last as f64).min(1.0) as Weightf32;
        }
        Some(Self { first, len, weights, truncated })
    }

    pub fn first(&self) -> usize { self.first }

    /// Number of pixels touched
    pub fn len(&self) -> usize { self.len }

    /// The interval reached further than `MAX_FOOTPRINT_PIXELS` pixels: the
    /// excess is ignored.
    pub fn is_truncated(&self) -> bool { self.truncated }

    pub fn weights(&self) -> &[Weightf32] { &self.weights[..self.len] }

    /// `(pixel index, weight)` pairs
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (usize, Weightf32)> + '_ {
        (self.first..).zip(self.weights().iter().copied())
    }

    pub fn total(&self) -> f64 { self.weights().iter().map(|&w| w as f64).sum() }
}

/// Footprints, in the axial detector direction, of the successive slices of a
/// voxel column.
///
/// The boundary between slices `k` and `k+1` projects to `bottom + (k+1) step`:
/// the projected trajectory of the column is assumed to be linear, so a single
/// projection per column suffices.
///
/// Only slices lying strictly inside the detector are yielded. Slices which
/// have not yet reached it are skipped; the walk ends at the first slice which
/// leaves it, as all later slices lie further out.
#[derive(Clone, Debug)]
pub struct SliceWalk {
    next: usize,
    n_slices: usize,
    bottom: f64,
    step: f64,
    n_rows: usize,
}

impl SliceWalk {
    pub fn new(bottom: f64, step: f64, n_slices: usize, n_rows: usize) -> Self {
        Self { next: 0, n_slices, bottom, step, n_rows }
    }
}

impl Iterator for SliceWalk {
    type Item = (usize, Footprint);

    fn next(&mut self) -> Option<Self::Item> {
        let rows = self.n_rows as f64;
        let ascending = self.step >= 0.0;
        while self.next < self.n_slices {
            let k = self.next;
            let bottom = self.bottom;
            let top = bottom + self.step;
            self.next += 1;
            self.bottom = top;

            let (lo, hi) = if ascending { (bottom, top) } else { (top, bottom) };
            let (not_yet_in, gone) = if ascending { (lo <= 0.0, hi >= rows) }
                                     else         { (hi >= rows, lo <= 0.0) };
            if not_yet_in { continue }
            if gone {
                self.next = self.n_slices;
                return None
            }
            if let Some(footprint) = Footprint::new(lo, hi, self.n_rows) {
                return Some((k, footprint))
            }
        }
        None
    }
}


#[cfg(test)]
mod test_slice_walk {
    use super::*;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};
    use rstest::rstest;

    fn slices(walk: SliceWalk) -> Vec<usize> { walk.map(|(k, _)| k).collect() }

    #[rstest(/**/ bottom, step, n_slices, n_rows, expected,
             // Enters the detector at slice 2, leaves it at slice 6
             case(  -1.5,  1.0,    10   ,   5   , vec![2, 3, 4, 5]),
             // Mirror image: v decreases with slice index
             case(   6.5, -1.0,    10   ,   5   , vec![2, 3, 4, 5]),
             // Column runs out of slices before leaving the detector
             case(   0.5,  0.5,     4   ,   5   , vec![0, 1, 2, 3]),
             // Starts beyond the detector, moving away from it
             case(   7.0,  1.0,    10   ,   5   , vec![]),
             case(  -2.0, -1.0,    10   ,   5   , vec![]),
             // Never reaches the detector
             case( -20.0,  1.0,    10   ,   5   , vec![]),
             // Slice taller than the detector
             case(  -1.0,  7.0,    10   ,   5   , vec![]),
             // No extent along v
             case(   2.5,  0.0,    10   ,   5   , vec![]),
             case(f64::NAN, 1.0,   10   ,   5   , vec![]),
    )]
    fn visited_slices(bottom: f64, step: f64, n_slices: usize, n_rows: usize, expected: Vec<usize>) {
        assert_eq!(slices(SliceWalk::new(bottom, step, n_slices, n_rows)), expected);
    }

    #[test]
    fn stops_immediately_beyond_detector() {
        let mut walk = SliceWalk::new(12.0, 0.75, 1_000_000, 10);
        assert_eq!(walk.next(), None);
        // ... and stays finished
        assert_eq!(walk.next(), None);
    }

    #[test]
    fn slice_footprints_follow_projected_boundaries() {
        let walk: Vec<_> = SliceWalk::new(0.25, 1.5, 3, 10).collect();
        let expected = [
            (0, Footprint::new(0.25, 1.75, 10).unwrap()),
            (1, Footprint::new(1.75, 3.25, 10).unwrap()),
            (2, Footprint::new(3.25, 4.75, 10).unwrap()),
        ];
        assert_eq!(walk, expected);
        assert_eq!(walk[1].1.weights(), &[0.25, 1.0, 0.25]);
    }
}
