
//! Various utility functions.

pub mod matrix;

use either::Either;
use itertools::{EitherOrBoth, Itertools};

use std::iter::Extend;

/// Multiplicative inverse of a value.
pub trait Recip {
  type Output;

  fn recip(self) -> Self::Output;
}

impl Recip for f64 {
  type Output = f64;

  fn recip(self) -> Self::Output {
    f64::recip(self)
  }
}

/// If the iterator consists of exactly one value, returns that value.
/// Otherwise, returns `None`.
pub fn into_singleton<I: IntoIterator>(iter: I) -> Option<I::Item> {
  let mut iter = iter.into_iter();
  let first_elem = iter.next()?;
  if iter.next().is_none() {
    Some(first_elem)
  } else {
    None
  }
}

/// Zips two slices of possibly different lengths, treating the
/// missing tail of the shorter one as `pad`.
pub fn zip_padded<T, U, F>(left: &[T], right: &[T], pad: T, mut f: F) -> Vec<U>
where T: Clone,
      F: FnMut(T, T) -> U {
  left.iter().zip_longest(right.iter())
    .map(|pair| match pair {
      EitherOrBoth::Both(a, b) => f(a.clone(), b.clone()),
      EitherOrBoth::Left(a) => f(a.clone(), pad.clone()),
      EitherOrBoth::Right(b) => f(pad.clone(), b.clone()),
    })
    .collect()
}

/// Splits an iterable of `Either` into a collection of `Left` and a
/// collection of `Right`.
pub fn partition_either<I, A, B, C1, C2>(iter: I) -> (C1, C2)
where I: IntoIterator<Item = Either<A, B>>,
      C1: Default + Extend<A>,
      C2: Default + Extend<B> {
  let mut c1 = C1::default();
  let mut c2 = C2::default();
  for elem in iter {
    match elem {
      Either::Left(a) => c1.extend([a]),
      Either::Right(b) => c2.extend([b]),
    }
  }
  (c1, c2)
}

pub fn partition_mapped<I, T, A, B, F, C1, C2>(iter: I, f: F) -> (C1, C2)
where I: IntoIterator<Item = T>,
      F: FnMut(T) -> Either<A, B>,
      C1: Default + Extend<A>,
      C2: Default + Extend<B> {
  partition_either(iter.into_iter().map(f))
}
