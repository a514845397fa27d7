use crate::data::map::{self, ColumnMap};
use crate::data::matrix::Matrix;
use crate::data::scale::{Denormalizer, Normalizer};
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Partition: which of the two matrices an accessor addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Training,
    Testing,
}

impl Partition {
    pub fn name(self) -> &'static str {
        match self {
            Partition::Training => "training",
            Partition::Testing => "testing",
        }
    }
}

// ---------------------------------------------------------------------------
// RowSource: the outward row-accessor contract
// ---------------------------------------------------------------------------

/// Ordered, finite, repeatable access to one partition's rows.
///
/// This is the only surface a downstream learning-library adaptor consumes:
/// a row count plus O(1) slice reads of the input and output portions of
/// each stored vector.
pub trait RowSource {
    fn row_count(&self) -> usize;
    fn input_row(&self, i: usize) -> DataResult<&[f64]>;
    fn output_row(&self, i: usize) -> DataResult<&[f64]>;
}

/// Borrowed view over one partition's matrix.
///
/// Each stored vector is output slots followed by input slots; the view
/// carries the split point so both reads are plain subslices.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    matrix: &'a Matrix,
    output_width: usize,
    input_width: usize,
}

impl<'a> RowView<'a> {
    fn vector(&self, i: usize) -> DataResult<&'a [f64]> {
        if i >= self.matrix.rows() {
            return Err(DataError::RowOutOfRange {
                index: i,
                rows: self.matrix.rows(),
            });
        }
        Ok(self.matrix.row(i))
    }

    pub fn row_count(&self) -> usize {
        self.matrix.rows()
    }

    /// Input portion of the stored vector, borrowed for the matrix
    /// lifetime rather than the view's.
    pub fn input_row(&self, i: usize) -> DataResult<&'a [f64]> {
        if self.input_width == 0 {
            return Err(DataError::NotLoaded("input map not set"));
        }
        Ok(&self.vector(i)?[self.output_width..])
    }

    /// Output portion of the stored vector.
    pub fn output_row(&self, i: usize) -> DataResult<&'a [f64]> {
        if self.output_width == 0 {
            return Err(DataError::NotLoaded("output map not set"));
        }
        Ok(&self.vector(i)?[..self.output_width])
    }
}

impl RowSource for RowView<'_> {
    fn row_count(&self) -> usize {
        RowView::row_count(self)
    }

    fn input_row(&self, i: usize) -> DataResult<&[f64]> {
        RowView::input_row(self, i)
    }

    fn output_row(&self, i: usize) -> DataResult<&[f64]> {
        RowView::output_row(self, i)
    }
}

// ---------------------------------------------------------------------------
// Dataset: matrices, maps, and reversible normalization
// ---------------------------------------------------------------------------

/// Vectors and bookkeeping for one loaded sample file.
///
/// Constructed empty; a loader populates the matrices, with every map
/// transform already baked into the stored cells. `normalize()` and
/// `denormalize()` rescale all cells in place and are mutual inverses
/// within floating-point tolerance.
#[derive(Debug, Default)]
pub struct Dataset {
    training: Option<Matrix>,
    testing: Option<Matrix>,
    input_map: Vec<ColumnMap>,
    output_map: Vec<ColumnMap>,
    min_values: Option<Vec<f64>>,
    max_values: Option<Vec<f64>>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    // -- map configuration --

    /// Replace the input map wholesale, preserving order.
    pub fn set_input_columns(&mut self, maps: Vec<ColumnMap>) -> DataResult<()> {
        map::validate_maps(&maps)?;
        self.input_map = maps;
        Ok(())
    }

    /// Replace the output map wholesale, preserving order.
    pub fn set_output_columns(&mut self, maps: Vec<ColumnMap>) -> DataResult<()> {
        map::validate_maps(&maps)?;
        self.output_map = maps;
        Ok(())
    }

    pub fn input_map(&self) -> &[ColumnMap] {
        &self.input_map
    }

    pub fn output_map(&self) -> &[ColumnMap] {
        &self.output_map
    }

    /// Width of every stored vector: output slots followed by input slots.
    pub fn vector_width(&self) -> usize {
        self.output_map.len() + self.input_map.len()
    }

    /// Number of input slots per vector. Fails until a load has populated
    /// a matrix; a count read before then is a sequencing bug in the
    /// caller, not a zero.
    pub fn input_column_count(&self) -> DataResult<usize> {
        self.require_loaded()?;
        Ok(self.input_map.len())
    }

    /// Number of output slots per vector. Same sequencing rule as
    /// [`Dataset::input_column_count`].
    pub fn output_column_count(&self) -> DataResult<usize> {
        self.require_loaded()?;
        Ok(self.output_map.len())
    }

    fn require_loaded(&self) -> DataResult<()> {
        if self.training.is_none() && self.testing.is_none() {
            return Err(DataError::NotLoaded("no matrix has been loaded"));
        }
        Ok(())
    }

    // -- matrix installation (loader-side) --

    /// Drop all loaded state so a loader can rebuild from scratch. Maps
    /// are configuration and survive.
    pub(crate) fn reset(&mut self) {
        self.training = None;
        self.testing = None;
        self.min_values = None;
        self.max_values = None;
    }

    pub(crate) fn install(&mut self, partition: Partition, matrix: Matrix) {
        match partition {
            Partition::Training => self.training = Some(matrix),
            Partition::Testing => self.testing = Some(matrix),
        }
    }

    // -- row access --

    fn partition_matrix(&self, partition: Partition) -> DataResult<&Matrix> {
        let matrix = match partition {
            Partition::Training => self.training.as_ref(),
            Partition::Testing => self.testing.as_ref(),
        };
        matrix.ok_or(match partition {
            Partition::Training => DataError::NotLoaded("training matrix not loaded"),
            Partition::Testing => DataError::NotLoaded("testing matrix not loaded"),
        })
    }

    /// Row accessor view for one partition.
    pub fn rows(&self, partition: Partition) -> DataResult<RowView<'_>> {
        Ok(RowView {
            matrix: self.partition_matrix(partition)?,
            output_width: self.output_map.len(),
            input_width: self.input_map.len(),
        })
    }

    pub fn training_rows(&self) -> DataResult<RowView<'_>> {
        self.rows(Partition::Training)
    }

    pub fn testing_rows(&self) -> DataResult<RowView<'_>> {
        self.rows(Partition::Testing)
    }

    pub fn training_input_row(&self, i: usize) -> DataResult<&[f64]> {
        self.training_rows()?.input_row(i)
    }

    pub fn training_output_row(&self, i: usize) -> DataResult<&[f64]> {
        self.training_rows()?.output_row(i)
    }

    pub fn testing_input_row(&self, i: usize) -> DataResult<&[f64]> {
        self.testing_rows()?.input_row(i)
    }

    pub fn testing_output_row(&self, i: usize) -> DataResult<&[f64]> {
        self.testing_rows()?.output_row(i)
    }

    // -- normalization --

    /// Rescale every cell into [0, 1] using per-column min/max pooled over
    /// both matrices, and remember the pool for later inversion.
    ///
    /// A column whose pooled min equals its max carries no signal and is a
    /// configuration error, not a division by zero.
    pub fn normalize(&mut self) -> DataResult<()> {
        let width = self.pooled_width()?;

        let mut min_values = vec![f64::INFINITY; width];
        let mut max_values = vec![f64::NEG_INFINITY; width];
        for matrix in [self.training.as_ref(), self.testing.as_ref()]
            .into_iter()
            .flatten()
        {
            for r in 0..matrix.rows() {
                for (c, &cell) in matrix.row(r).iter().enumerate() {
                    min_values[c] = min_values[c].min(cell);
                    max_values[c] = max_values[c].max(cell);
                }
            }
        }

        let mut scalers = Vec::with_capacity(width);
        for (c, (&min, &max)) in min_values.iter().zip(&max_values).enumerate() {
            if min == max {
                return Err(DataError::Configuration(format!(
                    "column {c} has the constant value {min}; min-max rescaling is undefined"
                )));
            }
            scalers.push(Normalizer::new(min, max)?);
        }

        Self::rescale(&mut self.training, &mut self.testing, |c, cell| {
            scalers[c].apply(cell)
        })?;

        self.min_values = Some(min_values);
        self.max_values = Some(max_values);
        log::debug!("normalized {width} columns across both partitions");
        Ok(())
    }

    /// Invert a previous `normalize()`. A no-op when none has run.
    ///
    /// The remembered pool is consumed, returning the dataset to its
    /// loaded-equivalent state.
    pub fn denormalize(&mut self) -> DataResult<()> {
        let (min_values, max_values) = match (self.min_values.take(), self.max_values.take()) {
            (Some(min), Some(max)) => (min, max),
            _ => return Ok(()),
        };

        let mut scalers = Vec::with_capacity(min_values.len());
        for (&min, &max) in min_values.iter().zip(&max_values) {
            scalers.push(Denormalizer::new(min, max)?);
        }

        Self::rescale(&mut self.training, &mut self.testing, |c, cell| {
            scalers[c].apply(cell)
        })
    }

    fn pooled_width(&self) -> DataResult<usize> {
        match (&self.training, &self.testing) {
            (None, None) => Err(DataError::NotLoaded("no matrix has been loaded")),
            (Some(training), Some(testing)) => {
                if training.cols() != testing.cols() {
                    return Err(DataError::Configuration(format!(
                        "training width {} differs from testing width {}",
                        training.cols(),
                        testing.cols()
                    )));
                }
                Ok(training.cols())
            }
            (Some(training), None) => Ok(training.cols()),
            (None, Some(testing)) => Ok(testing.cols()),
        }
    }

    fn rescale(
        training: &mut Option<Matrix>,
        testing: &mut Option<Matrix>,
        op: impl Fn(usize, f64) -> DataResult<f64>,
    ) -> DataResult<()> {
        for matrix in [training.as_mut(), testing.as_mut()].into_iter().flatten() {
            for r in 0..matrix.rows() {
                for (c, cell) in matrix.row_mut(r).iter_mut().enumerate() {
                    *cell = op(c, *cell)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn matrix_from_rows(rows: &[&[f64]]) -> Matrix {
        let mut m = Matrix::zeros(rows.len(), rows[0].len());
        for (i, row) in rows.iter().enumerate() {
            m.row_mut(i).copy_from_slice(row);
        }
        m
    }

    fn loaded_dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset
            .set_output_columns(vec![ColumnMap::raw(0)])
            .unwrap();
        dataset
            .set_input_columns(vec![ColumnMap::raw(1), ColumnMap::raw(2)])
            .unwrap();
        dataset.install(
            Partition::Training,
            matrix_from_rows(&[&[1.0, 10.0, 0.5], &[0.0, 20.0, 0.7]]),
        );
        dataset.install(
            Partition::Testing,
            matrix_from_rows(&[&[1.0, 30.0, 0.9]]),
        );
        dataset
    }

    #[test]
    fn accessors_fail_before_load() {
        let dataset = Dataset::new();
        assert!(matches!(
            dataset.training_input_row(0),
            Err(DataError::NotLoaded(_))
        ));
        assert!(matches!(
            dataset.input_column_count(),
            Err(DataError::NotLoaded(_))
        ));
        assert!(matches!(
            dataset.testing_rows(),
            Err(DataError::NotLoaded(_))
        ));
    }

    #[test]
    fn vectors_split_into_output_then_input() {
        let dataset = loaded_dataset();
        assert_eq!(dataset.training_output_row(0).unwrap(), [1.0]);
        assert_eq!(dataset.training_input_row(0).unwrap(), [10.0, 0.5]);
        assert_eq!(dataset.testing_input_row(0).unwrap(), [30.0, 0.9]);
        assert_eq!(dataset.input_column_count().unwrap(), 2);
        assert_eq!(dataset.output_column_count().unwrap(), 1);
    }

    #[test]
    fn output_accessor_fails_when_map_never_set() {
        let mut dataset = Dataset::new();
        dataset
            .set_input_columns(vec![ColumnMap::raw(0), ColumnMap::raw(1)])
            .unwrap();
        dataset.install(
            Partition::Training,
            matrix_from_rows(&[&[1.0, 2.0]]),
        );
        assert!(dataset.training_input_row(0).is_ok());
        assert!(matches!(
            dataset.training_output_row(0),
            Err(DataError::NotLoaded(_))
        ));
    }

    #[test]
    fn row_index_past_partition_end_fails() {
        let dataset = loaded_dataset();
        assert!(matches!(
            dataset.training_input_row(2),
            Err(DataError::RowOutOfRange { index: 2, rows: 2 })
        ));
    }

    #[test]
    fn normalize_pools_min_max_over_both_partitions() {
        let mut dataset = loaded_dataset();
        dataset.normalize().unwrap();

        // Column 1 pools to [10, 30] across training and testing.
        assert_abs_diff_eq!(dataset.training_input_row(0).unwrap()[0], 0.0);
        assert_abs_diff_eq!(dataset.training_input_row(1).unwrap()[0], 0.5);
        assert_abs_diff_eq!(dataset.testing_input_row(0).unwrap()[0], 1.0);
    }

    #[test]
    fn normalize_then_denormalize_round_trips() {
        let mut dataset = loaded_dataset();
        let before: Vec<Vec<f64>> = (0..2)
            .map(|i| {
                let mut v = dataset.training_output_row(i).unwrap().to_vec();
                v.extend_from_slice(dataset.training_input_row(i).unwrap());
                v
            })
            .collect();

        dataset.normalize().unwrap();
        dataset.denormalize().unwrap();

        for (i, expected) in before.iter().enumerate() {
            let mut got = dataset.training_output_row(i).unwrap().to_vec();
            got.extend_from_slice(dataset.training_input_row(i).unwrap());
            for (g, e) in got.iter().zip(expected) {
                assert_abs_diff_eq!(*g, *e, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn denormalize_without_normalize_is_a_no_op() {
        let mut dataset = loaded_dataset();
        let before = dataset.training_input_row(0).unwrap().to_vec();
        dataset.denormalize().unwrap();
        assert_eq!(dataset.training_input_row(0).unwrap(), &before[..]);
    }

    #[test]
    fn constant_column_fails_normalization() {
        let mut dataset = Dataset::new();
        dataset
            .set_input_columns(vec![ColumnMap::raw(0), ColumnMap::raw(1)])
            .unwrap();
        dataset.install(
            Partition::Training,
            matrix_from_rows(&[&[5.0, 1.0], &[5.0, 2.0]]),
        );
        assert!(matches!(
            dataset.normalize(),
            Err(DataError::Configuration(_))
        ));
    }

    #[test]
    fn mismatched_partition_widths_fail_normalization() {
        let mut dataset = Dataset::new();
        dataset
            .set_input_columns(vec![ColumnMap::raw(0)])
            .unwrap();
        dataset.install(Partition::Training, matrix_from_rows(&[&[1.0, 2.0]]));
        dataset.install(Partition::Testing, matrix_from_rows(&[&[1.0]]));
        assert!(matches!(
            dataset.normalize(),
            Err(DataError::Configuration(_))
        ));
    }
}
