//! The character grid handed to the renderers.

use crate::ramp::Ramp;
use ndarray::Array2;

/// Dense `rows x cols` grid of characters, one per sampled cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    cells: Array2<char>,
}

impl CharGrid {
    /// Quantize every value of `values` through `ramp`.
    pub fn quantize(values: &Array2<f32>, ramp: &Ramp) -> Self {
        Self { cells: values.mapv(|v| ramp.quantize(v)) }
    }

    /// `rows x cols` grid filled with `ch`.
    pub fn filled(cols: usize, rows: usize, ch: char) -> Self {
        Self { cells: Array2::from_elem((rows, cols), ch) }
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Option<Self> {
        let cols = rows.first()?.as_ref().chars().count();
        let cells: Vec<char> = rows.iter().flat_map(|r| r.as_ref().chars()).collect();
        Array2::from_shape_vec((rows.len(), cols), cells).ok().map(|cells| Self { cells })
    }

    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<char> {
        self.cells.get((row, col)).copied()
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = impl Iterator<Item = char> + '_> + '_ {
        self.cells.rows().into_iter().map(|row| row.into_iter().copied())
    }

    /// `(col, row, ch)` for every cell in reading order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.cells.indexed_iter().map(|((row, col), &ch)| (col, row, ch))
    }
}
