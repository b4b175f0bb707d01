//! Application entry point and the slice/copy demo.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use axmat_core::{add, multiply, Matrix, MatrixError, MatrixView, Scalar};
use axmat_memory::Arena;

use crate::config::AppConfig;
use crate::version::full_version;

/// Origin of the demo slice in the arena matrix, before clamping.
const SLICE_ROWS: Range<usize> = 1..4;
const SLICE_COLS: Range<usize> = 2..5;

const SLICE_FIRST: Scalar = 99.0;
const SLICE_LAST: Scalar = 55.0;

/// Copy of a matrix's contents at one step of the demo.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// What the matrix is.
    pub label: String,
    /// Contents, one `Vec` per row.
    pub rows: Vec<Vec<Scalar>>,
}

impl Snapshot {
    fn of<'v>(label: &str, matrix: impl Into<MatrixView<'v>>) -> Self {
        Self {
            label: label.to_owned(),
            rows: matrix.into().to_rows(),
        }
    }

    /// Write the label and the contents, formatted like the matrix itself.
    fn write_text<W: Write>(&self, out: &mut W, precision: usize) -> Result<()> {
        let flat = self.rows.concat();
        let cols = self.rows.first().map_or(0, Vec::len);
        let view = MatrixView::from_slice(&flat, self.rows.len(), cols)?;
        writeln!(out, "\n{}:", self.label)?;
        write!(out, "{view:.precision$}")?;
        Ok(())
    }
}

/// A cell read back after writing through the slice.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    /// Matrix and cell, e.g. `mat1[1,2]`.
    pub cell: String,
    /// Value found.
    pub value: Scalar,
    /// Value the aliasing rules require.
    pub expected: Scalar,
}

impl Check {
    fn new(name: &str, matrix: &Matrix<'_>, row: usize, col: usize, expected: Scalar) -> Self {
        Self {
            cell: format!("{name}[{row},{col}]"),
            value: matrix[(row, col)],
            expected,
        }
    }

    /// Whether the cell holds the expected value.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn passed(&self) -> bool {
        self.value == self.expected
    }
}

/// Arena usage at the end of the demo.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArenaSummary {
    /// Regular block size in bytes.
    pub block_size: usize,
    /// Blocks in the chain.
    pub blocks: usize,
    /// Blocks allocated for oversized requests.
    pub dedicated_blocks: u64,
    /// Total capacity in bytes.
    pub capacity: usize,
    /// Bytes consumed, padding included.
    pub used: usize,
    /// Successful allocations.
    pub allocations: u64,
}

impl ArenaSummary {
    fn of(arena: &Arena) -> Self {
        let stats = arena.stats();
        Self {
            block_size: arena.default_block_size(),
            blocks: arena.block_count(),
            dedicated_blocks: stats.dedicated_blocks,
            capacity: arena.capacity(),
            used: arena.used(),
            allocations: stats.allocations,
        }
    }
}

/// Everything the demo observed.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    /// Program version.
    pub version: String,
    /// Side length of the square matrices.
    pub size: usize,
    /// Row range of the slice, `[start, end)`.
    pub slice_rows: [usize; 2],
    /// Column range of the slice, `[start, end)`.
    pub slice_cols: [usize; 2],
    /// Matrices in the order they were captured.
    pub snapshots: Vec<Snapshot>,
    /// Cells read back after writing through the slice.
    pub checks: Vec<Check>,
    /// Arena usage.
    pub arena: ArenaSummary,
}

impl DemoReport {
    /// Whether every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.checks.iter().all(Check::passed)
    }

    /// Write the report as text. Quiet mode prints only the checks.
    pub fn write_text<W: Write>(&self, out: &mut W, precision: usize, quiet: bool) -> Result<()> {
        if !quiet {
            for snapshot in &self.snapshots {
                snapshot.write_text(out, precision)?;
            }
            writeln!(out, "\nAfter modification:")?;
        }
        for check in &self.checks {
            writeln!(
                out,
                "{}: {:.p$} (should be {:.p$})",
                check.cell,
                check.value,
                check.expected,
                p = precision
            )?;
        }
        if !quiet {
            let arena = &self.arena;
            writeln!(
                out,
                "\narena: {} blocks ({} dedicated), {} of {} bytes used, {} allocations",
                arena.blocks, arena.dedicated_blocks, arena.used, arena.capacity, arena.allocations
            )?;
        }
        Ok(())
    }
}

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    config.validate()?;
    debug!(version = %full_version(), size = config.size, "starting demo");

    let report = build_report(config.size, config.block_size)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if config.json {
        serde_json::to_writer_pretty(&mut out, &report).context("writing JSON report")?;
        writeln!(out)?;
    } else {
        report.write_text(&mut out, config.precision, config.quiet)?;
    }

    if !report.passed() {
        anyhow::bail!("slice writes were not visible in the parent matrix");
    }
    Ok(())
}

/// Run the demo on `size x size` matrices with a fresh arena.
pub fn build_report(size: usize, block_size: usize) -> Result<DemoReport, MatrixError> {
    let arena = Arena::new(block_size)?;
    let report = run_demo(size, &arena)?;
    arena.destroy();
    Ok(report)
}

fn clamp(range: &Range<usize>, extent: usize) -> Range<usize> {
    range.start.min(extent)..range.end.min(extent)
}

#[allow(clippy::cast_precision_loss)]
fn run_demo(n: usize, arena: &Arena) -> Result<DemoReport, MatrixError> {
    let mut snapshots = Vec::new();

    let mut mat1 = Matrix::from_fn(n, n, Some(arena), |i, j| (i * 10 + j) as Scalar)?;
    let mut mat2 = Matrix::new_in(n, n, None)?;
    snapshots.push(Snapshot::of("mat1", &mat1));
    snapshots.push(Snapshot::of("mat2", &mat2));

    let rows = clamp(&SLICE_ROWS, n);
    let cols = clamp(&SLICE_COLS, n);
    let (h, w) = (rows.len(), cols.len());
    {
        let mut slice = mat1.slice(rows.clone(), cols.clone())?;
        snapshots.push(Snapshot::of("slice", &slice));
        if h > 0 && w > 0 {
            slice[(0, 0)] = SLICE_FIRST;
            slice[(h - 1, w - 1)] = SLICE_LAST;
        }

        let mut target = mat2.slice(n - h..n, n - w..n)?;
        target.copy_from(&slice)?;
        snapshots.push(Snapshot::of("target", &target));
    }
    info!(rows = ?rows, cols = ?cols, "wrote through slice");

    snapshots.push(Snapshot::of("mat1 (after)", &mat1));
    snapshots.push(Snapshot::of("mat2 (after)", &mat2));

    let sum = add(&mat1, &mat1, Some(arena))?;
    snapshots.push(Snapshot::of("mat1 + mat1", &sum));
    let product = multiply(&mat1, &mat1, Some(arena))?;
    snapshots.push(Snapshot::of("mat1 * mat1", &product));

    let mut checks = Vec::new();
    if h > 0 && w > 0 {
        checks.push(Check::new("mat1", &mat1, rows.start, cols.start, SLICE_FIRST));
        checks.push(Check::new("mat1", &mat1, rows.end - 1, cols.end - 1, SLICE_LAST));
        checks.push(Check::new("mat2", &mat2, n - 1, n - 1, SLICE_LAST));
        checks.push(Check::new("mat2", &mat2, n - h, n - w, SLICE_FIRST));
    }

    let summary = ArenaSummary::of(arena);
    mat2.destroy();

    Ok(DemoReport {
        version: full_version(),
        size: n,
        slice_rows: [rows.start, rows.end],
        slice_cols: [cols.start, cols.end],
        snapshots,
        checks,
        arena: summary,
    })
}
