
//! Sample units shared by the unit tests. Exponent vectors follow
//! the SI registry order (length, time, mass, ...), truncated where
//! the remaining entries are zero.

use super::unit::Unit;

pub fn meters() -> Unit {
  Unit::from_integers(1.0, &[1, 0, 0]).with_label("m")
}

pub fn seconds() -> Unit {
  Unit::from_integers(1.0, &[0, 1, 0]).with_label("s")
}

pub fn kilograms() -> Unit {
  Unit::from_integers(1000.0, &[0, 0, 1]).with_label("kg")
}

pub fn kilometers() -> Unit {
  Unit::from_integers(1000.0, &[1]).with_label("km")
}

pub fn minutes() -> Unit {
  Unit::from_integers(60.0, &[0, 1]).with_label("min")
}
