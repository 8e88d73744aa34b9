
//! Very rudimentary matrix type which enforces consistency in the
//! dimensions of its data.

use num::Zero;

use std::fmt::{self, Formatter, Display};
use std::ops::{Index, IndexMut};

/// A `Matrix<T>` is a vector of vectors of `T` in which each
/// constituent vector has the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
  body: Vec<Vec<T>>,
  width: usize,
}

/// A (row, column) position within a [`Matrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatrixIndex {
  pub row: usize,
  pub column: usize,
}

impl MatrixIndex {
  pub fn new(row: usize, column: usize) -> Self {
    Self { row, column }
  }
}

impl<T> Matrix<T> {
  /// A matrix of the given shape. The width is kept even when there
  /// are no rows.
  pub fn from_generator<F>(height: usize, width: usize, mut generator: F) -> Self
  where F: FnMut(MatrixIndex) -> T {
    let body = (0..height)
      .map(|row| (0..width).map(|column| generator(MatrixIndex { row, column })).collect())
      .collect();
    Matrix { body, width }
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.body.len()
  }

  pub fn row(&self, index: usize) -> Option<&[T]> {
    self.body.get(index).map(|row| row.as_slice())
  }

  pub fn get(&self, index: MatrixIndex) -> Option<&T> {
    self.body
      .get(index.row)
      .and_then(|row| row.get(index.column))
  }

  pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
    self.body.iter().map(|row| row.as_slice())
  }

  /// The entries of a single column, top to bottom. Empty if the
  /// column is out of bounds.
  pub fn column(&self, column: usize) -> impl Iterator<Item = &T> + '_ {
    self.body.iter().filter_map(move |row| row.get(column))
  }
}

impl<T: Zero> Matrix<T> {
  /// Indices of the columns of `row` holding a nonzero entry. Empty if
  /// the row is out of bounds.
  pub fn nonzero_columns(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
    self.row(row).unwrap_or_default().iter()
      .enumerate()
      .filter(|(_, x)| !x.is_zero())
      .map(|(column, _)| column)
  }

  pub fn count_nonzero_in_row(&self, row: usize) -> usize {
    self.nonzero_columns(row).count()
  }

  /// Indices of the rows holding a nonzero entry in `column`.
  pub fn nonzero_rows(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
    self.body.iter()
      .enumerate()
      .filter(move |(_, row)| row.get(column).is_some_and(|x| !x.is_zero()))
      .map(|(row, _)| row)
  }
}

impl<T> Index<MatrixIndex> for Matrix<T> {
  type Output = T;

  fn index(&self, index: MatrixIndex) -> &Self::Output {
    &self.body[index.row][index.column]
  }
}

impl<T> IndexMut<MatrixIndex> for Matrix<T> {
  fn index_mut(&mut self, index: MatrixIndex) -> &mut Self::Output {
    &mut self.body[index.row][index.column]
  }
}

impl Display for MatrixIndex {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "({},{})", self.row, self.column)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_matrix() -> Matrix<i64> {
    let body = [
      [1, 0, 3],
      [0, 0, 6],
      [0, 0, 0],
    ];
    Matrix::from_generator(3, 3, |idx| body[idx.row][idx.column])
  }

  #[test]
  fn test_from_generator_keeps_width_without_rows() {
    let matrix = Matrix::<i64>::from_generator(0, 4, |_| 0);
    assert_eq!(matrix.height(), 0);
    assert_eq!(matrix.width(), 4);
  }

  #[test]
  fn test_index_and_index_mut() {
    let mut matrix = Matrix::from_generator(2, 3, |idx| idx.row * 10 + idx.column);
    assert_eq!(matrix[MatrixIndex::new(1, 2)], 12);
    matrix[MatrixIndex::new(1, 2)] = 99;
    assert_eq!(matrix.row(1), Some(&[10, 11, 99][..]));
    assert_eq!(matrix.get(MatrixIndex::new(5, 0)), None);
  }

  #[test]
  fn test_nonzero_columns() {
    let matrix = sample_matrix();
    assert_eq!(matrix.nonzero_columns(0).collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(matrix.count_nonzero_in_row(1), 1);
    assert_eq!(matrix.count_nonzero_in_row(2), 0);
    assert_eq!(matrix.count_nonzero_in_row(7), 0);
  }

  #[test]
  fn test_nonzero_rows() {
    let matrix = sample_matrix();
    assert_eq!(matrix.nonzero_rows(2).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(matrix.nonzero_rows(1).count(), 0);
    assert_eq!(matrix.nonzero_rows(3).count(), 0);
  }

  #[test]
  fn test_column_out_of_bounds_is_empty() {
    let matrix = sample_matrix();
    assert_eq!(matrix.column(2).copied().collect::<Vec<_>>(), vec![3, 6, 0]);
    assert_eq!(matrix.column(3).count(), 0);
  }

  #[test]
  fn test_display_index() {
    assert_eq!(MatrixIndex::new(3, 1).to_string(), "(3,1)");
  }
}
