/// Units which are simply type aliases for plain floats rather than having an
/// implementation as a `uom` `Quantity`.
///
/// These live in the inner loops of the projector, where `uom` wrappers get in
/// the way of `nalgebra` matrix arithmetic. The aliases still give some clues
/// in the source as to what the numbers represent.
///
/// Geometry is carried in `f64` (lengths in mm, angles in radians); voxel and
/// pixel values, and the weights that couple them, in `f32`.

pub type Lengthf64    = f64;
pub type Anglef64     = f64;
pub type Weightf32    = f32;
pub type Intensityf32 = f32;
