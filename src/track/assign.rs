//! Identity-to-detection assignment strategies.
//!
//! The default strategy matches every identity to its nearest detection
//! independently, so two identities may lock onto the same detection when a
//! robot is briefly occluded. [`ExclusiveNearest`] is the one-to-one variant
//! kept behind the same interface for side-by-side comparison.

/// Dense identity-by-detection distance matrix.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![f64::INFINITY; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }
}

/// How identities claim detections each reconcile pass.
pub trait MatchStrategy: Send {
    /// For each row (identity), the claimed column (detection), if any.
    /// Only pairs strictly below `threshold` may match.
    fn assign(&self, distances: &DistanceMatrix, threshold: f64) -> Vec<Option<usize>>;
}

/// Every identity independently claims its nearest detection. Detections may
/// be claimed more than once; identities with no detection below the
/// threshold stay unmatched.
pub struct GreedyIndependent;

impl MatchStrategy for GreedyIndependent {
    fn assign(&self, distances: &DistanceMatrix, threshold: f64) -> Vec<Option<usize>> {
        (0..distances.rows())
            .map(|row| {
                let mut best: Option<(usize, f64)> = None;
                for col in 0..distances.cols() {
                    let d = distances.get(row, col);
                    if d < threshold && best.map_or(true, |(_, bd)| d < bd) {
                        best = Some((col, d));
                    }
                }
                best.map(|(col, _)| col)
            })
            .collect()
    }
}

/// Globally greedy one-to-one matching: repeatedly commit the smallest
/// remaining pair below the threshold, then retire its row and column.
pub struct ExclusiveNearest;

impl MatchStrategy for ExclusiveNearest {
    fn assign(&self, distances: &DistanceMatrix, threshold: f64) -> Vec<Option<usize>> {
        let mut out = vec![None; distances.rows()];
        let mut row_used = vec![false; distances.rows()];
        let mut col_used = vec![false; distances.cols()];
        loop {
            let mut best: Option<(usize, usize, f64)> = None;
            for row in 0..distances.rows() {
                if row_used[row] {
                    continue;
                }
                for col in 0..distances.cols() {
                    if col_used[col] {
                        continue;
                    }
                    let d = distances.get(row, col);
                    if d < threshold && best.map_or(true, |(_, _, bd)| d < bd) {
                        best = Some((row, col, d));
                    }
                }
            }
            let Some((row, col, _)) = best else {
                break;
            };
            out[row] = Some(col);
            row_used[row] = true;
            col_used[col] = true;
        }
        out
    }
}
