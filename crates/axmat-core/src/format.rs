//! Text rendering of matrices.

use std::fmt;

use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::view::MatrixView;

const COLUMN_GAP: &str = "  ";

fn render(value: Scalar, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{value:.p$}"),
        None => format!("{value}"),
    }
}

/// One row per line, each column right-aligned to its widest cell.
///
/// The formatter's precision applies to every cell, so `{:.1}` prints one
/// decimal place.
impl fmt::Display for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision();
        let cells: Vec<Vec<String>> = (0..self.rows())
            .map(|i| {
                self.row_slice(i)
                    .iter()
                    .map(|&x| render(x, precision))
                    .collect()
            })
            .collect();

        let mut widths = vec![0; self.cols()];
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        for row in &cells {
            for (j, (cell, &width)) in row.iter().zip(&widths).enumerate() {
                if j > 0 {
                    f.write_str(COLUMN_GAP)?;
                }
                write!(f, "{cell:>width$}")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

impl fmt::Display for Matrix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}
