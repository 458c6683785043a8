//! `uom` quantities for cone-beam geometry, stored as `f64` in a system whose
//! base length unit is the millimetre.

pub mod todo;

pub use uom;
pub use float_eq;

pub mod mmps {

  pub mod f64 {
    use uom::{ISQ, system};
    ISQ!(uom::si, f64, (millimeter, kilogram, picosecond, ampere, kelvin, mole, candela));

    /// The full circle constant (τ) Equal to 2π.
    pub const TWOPI: Angle = Angle {
        dimension: std::marker::PhantomData,
        units: std::marker::PhantomData,
        value: std::f64::consts::TAU,
    };
  }

}

pub use mmps::f64::{Angle, TWOPI, Length};

mod units {
  pub use uom::si::{length  ::{micrometer, millimeter, centimeter, meter},
                    angle   ::{degree, radian, revolution},
  };
}
// Making values from float literals seems to be very long-winded, so provide
// some pithily-named convenience constructors.

/// Generate a function called NAME which returns QUANTITY by interpreting its
/// argument as UNIT
///
/// wrap!(NAME QUANTITY UNIT);
macro_rules! wrap {
  ($name:ident $quantity:ident $unit:ident ) => {
    pub fn $name(x: f64) -> $quantity { $quantity::new::<units::$unit>(x) }
  };
}

wrap!(um     Length  micrometer);
wrap!(mm     Length  millimeter);
wrap!(cm     Length  centimeter);
wrap!(m      Length       meter);
wrap!(radian Angle       radian);
wrap!(degree Angle       degree);
wrap!(turn   Angle   revolution);

// Reverse direction of the above.
pub fn mm_(x: Length) -> f64 { x.get::<units::millimeter>() }
pub fn cm_(x: Length) -> f64 { x.get::<units::centimeter>() }

pub fn radian_(x: Angle) -> f64 { x.get::<units::radian>() }
pub fn degree_(x: Angle) -> f64 { x.get::<units::degree>() }
pub fn turn_  (x: Angle) -> f64 { x.get::<units::revolution>() }

#[macro_export]
macro_rules! assert_uom_eq {
  ($unit:ident, $lhs:expr, $rhs:expr, $algo:ident <= $tol:expr) => {
    $crate::float_eq::assert_float_eq!($lhs.get::<$unit>(), $rhs.get::<$unit>(), $algo <= $tol)
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use rstest::rstest;

  #[test]
  fn lengths_sum_across_units() {
    let v = vec![mm(1.0), cm(1.0), um(500.0)];
    let total: Length = v.into_iter().sum();
    use units::micrometer;
    assert_uom_eq!(micrometer, total, mm(11.5), ulps <= 1);
  }

  #[test]
  fn base_unit_is_millimetre() {
    assert_eq!(m(1.25).value, 1250.0);
    assert_eq!(mm_(cm(3.0)), 30.0);
  }

  #[rstest(/**/ degrees,  turns,
           case(    0.0,   0.0 ),
           case(   90.0,   0.25),
           case(  180.0,   0.5 ),
           case(  360.0,   1.0 ),
  )]
  fn degrees_and_turns(degrees: f64, turns: f64) {
    float_eq::assert_float_eq!(turn_(degree(degrees)), turns, abs <= 1e-12);
    float_eq::assert_float_eq!(radian_(turn(turns)), turns * radian_(TWOPI), abs <= 1e-12);
  }

  #[rstest(/**/ text         , expected_mm,
           case("1 mm"       ,     1.0  ),
           case("2.5 cm"     ,    25.0  ),
           case("0.6 m"      ,   600.0  ),
  )]
  fn parse_length_from_str(text: &str, expected_mm: f64) {
    let l: Length = text.parse().unwrap();
    float_eq::assert_float_eq!(mm_(l), expected_mm, rel <= 1e-12);
  }
}
