//! Error-diffusion kernels and the sliding row buffer that carries their
//! state across scan lines.

use crate::vec4::Vec4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffusionKernel {
    FloydSteinberg,
    Atkinson,
}

impl DiffusionKernel {
    /// Pixels of slack needed on each side of a row to absorb every forward
    /// write without a bounds check. Floyd-Steinberg reaches one pixel past
    /// the right edge; Atkinson reaches two.
    fn slack(self) -> usize {
        match self {
            DiffusionKernel::FloydSteinberg => 1,
            DiffusionKernel::Atkinson => 2,
        }
    }

    /// Number of rows (including the current one) the kernel writes into.
    fn row_span(self) -> usize {
        match self {
            DiffusionKernel::FloydSteinberg => 2,
            DiffusionKernel::Atkinson => 3,
        }
    }

    /// `(dx, dy, weight)` taps, weight already normalised (sums to 1 for
    /// Floyd-Steinberg, 0.75 for Atkinson — Atkinson only diffuses 3/4 of the
    /// residual by design).
    fn taps(self) -> &'static [(i32, i32, f32)] {
        match self {
            DiffusionKernel::FloydSteinberg => &[
                (1, 0, 7.0 / 16.0),
                (-1, 1, 3.0 / 16.0),
                (0, 1, 5.0 / 16.0),
                (1, 1, 1.0 / 16.0),
            ],
            DiffusionKernel::Atkinson => &[
                (1, 0, 1.0 / 8.0),
                (2, 0, 1.0 / 8.0),
                (-1, 1, 1.0 / 8.0),
                (0, 1, 1.0 / 8.0),
                (1, 1, 1.0 / 8.0),
                (0, 2, 1.0 / 8.0),
            ],
        }
    }
}

/// A ring of `row_span()` rows, each `width + 2*slack` wide, storing
/// accumulated error contributions from already-processed pixels. Logical
/// column `x` lives at array index `x + slack` so that forward/backward
/// taps never need a bounds check.
pub struct DiffusionBuffer {
    kernel: DiffusionKernel,
    width: usize,
    slack: usize,
    rows: Vec<Vec<Vec4>>,
    /// Index into `rows` of the row currently being read/written as "row 0"
    /// (the row the driver is on).
    head: usize,
}

impl DiffusionBuffer {
    /// Attempts to allocate a buffer for `width` columns. Uses
    /// `try_reserve_exact` so OOM is observable rather than aborting the
    /// process, matching the engine's non-fatal degrade policy for this
    /// allocation.
    pub fn try_new(kernel: DiffusionKernel, width: usize) -> Result<Self, std::collections::TryReserveError> {
        let slack = kernel.slack();
        let span = kernel.row_span();
        let row_len = width + 2 * slack;

        let mut rows: Vec<Vec<Vec4>> = Vec::new();
        rows.try_reserve_exact(span)?;
        for _ in 0..span {
            let mut row = Vec::new();
            row.try_reserve_exact(row_len)?;
            row.resize(row_len, Vec4::ZERO);
            rows.push(row);
        }

        Ok(DiffusionBuffer { kernel, width, slack, rows, head: 0 })
    }

    fn row_mut(&mut self, dy: usize) -> &mut Vec<Vec4> {
        let span = self.rows.len();
        &mut self.rows[(self.head + dy) % span]
    }

    /// Reads the accumulated error at the current row for column `x`.
    pub fn read(&self, x: usize) -> Vec4 {
        self.rows[self.head][x + self.slack]
    }

    /// Adds `err` scaled by this kernel's taps into the neighbours of
    /// `(x, current row)`. Writes that fall past the image's left/right
    /// edges land in the slack cells and are simply never read back.
    pub fn propagate(&mut self, x: usize, err: Vec4) {
        for &(dx, dy, weight) in self.kernel.taps() {
            let target_x = (x as i32 + dx + self.slack as i32) as usize;
            let row = self.row_mut(dy as usize);
            row[target_x] = row[target_x] + err * weight;
        }
    }

    /// Advances to the next scan line: rotates the ring and zeroes the row
    /// newly exposed at the far end (the one about to receive fresh writes
    /// from two/three rows ahead).
    pub fn advance_row(&mut self) {
        let span = self.rows.len();
        let row_len = self.width + 2 * self.slack;
        // The row we're leaving has been fully consumed; zero it before it
        // rotates back around to become the farthest future row.
        self.rows[self.head].iter_mut().for_each(|v| *v = Vec4::ZERO);
        self.head = (self.head + 1) % span;
        debug_assert_eq!(self.rows[self.head].len(), row_len);
    }
}
