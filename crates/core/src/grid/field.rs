//! Row-major 2D field container
//!
//! Every per-cell quantity in the simulator (cell state, vegetation label,
//! cooldown, humidity, temperature, burn counts) is stored in a [`Field`].
//! Cells are addressed as `(row, col)` with row 0 at the top of the grid.

use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Offsets of the four cardinal neighbors, in the fixed order N, S, W, E
///
/// Wind factor vectors are indexed by position in this array.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Field data container
///
/// Stores 2D data as a flat `Vec<T>` in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field<T> {
    /// Values in row-major order (row * cols + col)
    data: Vec<T>,
    /// Number of rows
    rows: usize,
    /// Number of columns
    cols: usize,
}

impl<T: Clone> Field<T> {
    /// Create a new field with given dimensions, initialized to a value
    pub fn with_value(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Build a field from nested rows
    ///
    /// An empty outer vector gives a 0x0 field. Rows of unequal length are
    /// rejected.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(FireSimError::RaggedRows {
                row,
                expected: cols,
                found,
            });
        }

        let row_count = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            rows: row_count,
            cols,
        })
    }

    /// Values as nested rows
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[T]>::to_vec).collect()
    }
}

impl<T: Clone + Default> Field<T> {
    /// Create a new field with given dimensions, initialized to `T::default()`
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_value(rows, cols, T::default())
    }
}

impl<T> Field<T> {
    /// Wrap an existing row-major buffer
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), rows * cols, "Field buffer size mismatch");
        Self { data, rows, cols }
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get reference to field data
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get mutable reference to field data
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the field, returning the row-major buffer
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Flat index of `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "Coordinates out of bounds"
        );
        row * self.cols + col
    }

    /// `(row, col)` of a flat index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Whether `(row, col)` lies inside the field
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell reached from `(row, col)` by `offset`, if it is in bounds
    #[inline]
    pub fn offset(&self, row: usize, col: usize, offset: (isize, isize)) -> Option<(usize, usize)> {
        let r = row.checked_add_signed(offset.0)?;
        let c = col.checked_add_signed(offset.1)?;
        self.contains(r, c).then_some((r, c))
    }

    /// Get value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.index_of(row, col)]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let index = self.index_of(row, col);
        self.data[index] = value;
    }

    /// Iterate over values in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate over `((row, col), value)` in row-major order
    pub fn indexed_iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, value)| ((i / cols, i % cols), value))
    }

    /// New field of the same shape with `f` applied to every value
    pub fn map<U, F>(&self, f: F) -> Field<U>
    where
        F: FnMut(&T) -> U,
    {
        Field {
            data: self.data.iter().map(f).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Whether two fields have the same shape
    #[inline]
    pub fn same_shape<U>(&self, other: &Field<U>) -> bool {
        self.shape() == other.shape()
    }
}

impl<'a, T> IntoIterator for &'a Field<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<(usize, usize)> for Field<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.get(row, col)
    }
}

impl<T> IndexMut<(usize, usize)> for Field<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let index = self.index_of(row, col);
        &mut self.data[index]
    }
}
