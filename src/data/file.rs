use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::dataset::{Dataset, Partition};
use crate::data::map::ColumnMap;
use crate::data::matrix::Matrix;
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// RowRange: an inclusive 1-based line interval in the source file
// ---------------------------------------------------------------------------

/// Inclusive line interval designating one partition's rows.
///
/// Bounds are 1-based line numbers into the full source file, counting the
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of rows the range designates. Meaningful once validated.
    pub fn row_count(self) -> usize {
        self.end - self.start + 1
    }

    pub fn overlaps(self, other: RowRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    fn validate(self, name: &'static str, header_lines: usize) -> DataResult<()> {
        if self.start == 0 || self.end == 0 {
            return Err(DataError::Configuration(format!(
                "{name} range bounds are 1-based and must be positive (got [{}, {}])",
                self.start, self.end
            )));
        }
        if self.start > self.end {
            return Err(DataError::Configuration(format!(
                "{name} range is inverted: start {} is past end {}",
                self.start, self.end
            )));
        }
        if self.start <= header_lines {
            return Err(DataError::Configuration(format!(
                "{name} range starts at line {} inside the {header_lines}-line header",
                self.start
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileConfig: everything needed to load one delimited sample file
// ---------------------------------------------------------------------------

fn default_separator() -> char {
    ','
}

/// Load description for one delimited sample file. Maps 1:1 onto a JSON
/// recipe.
///
/// Ranges and maps are validated by [`FileDataset::load`], not here, so a
/// config can be built up incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Path to the delimited text file.
    pub path: PathBuf,
    /// Field separator, a single ASCII character.
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Leading lines skipped verbatim before any data.
    #[serde(default)]
    pub header_lines: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<RowRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testing: Option<RowRange>,
    /// Input map; when empty the loader resolves a default over the source
    /// columns the output map leaves unclaimed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_map: Vec<ColumnMap>,
    /// Output map; when empty the vectors carry input slots only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_map: Vec<ColumnMap>,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separator: default_separator(),
            header_lines: 0,
            training: None,
            testing: None,
            input_map: Vec::new(),
            output_map: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// FileDataset: a dataset populated from one delimited text file
// ---------------------------------------------------------------------------

/// File-backed loader and the dataset it populates.
///
/// `load()` streams the file exactly once: it validates the configured
/// ranges, probes the first data line for the source column count, resolves
/// the default input map when none is configured, then fills each
/// partition's matrix in file order. Every map transform is applied here
/// and baked into the stored cells; reads afterwards are plain slices.
#[derive(Debug)]
pub struct FileDataset {
    config: FileConfig,
    dataset: Dataset,
}

impl FileDataset {
    pub fn new(config: FileConfig) -> Self {
        Self {
            config,
            dataset: Dataset::new(),
        }
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut FileConfig {
        &mut self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    /// Populate the matrices from the configured file.
    ///
    /// Re-invocation rebuilds from scratch. On any failure the dataset is
    /// left empty rather than partially filled, and the file handle is
    /// released on every exit path by scope.
    pub fn load(&mut self) -> DataResult<()> {
        // Rebuild from scratch on every call; a failed load leaves the
        // dataset empty rather than stale or partially filled.
        self.dataset.reset();

        let parts = self.validated_partitions()?;

        if !self.config.separator.is_ascii() {
            return Err(DataError::Configuration(format!(
                "separator '{}' is not a single-byte character",
                self.config.separator
            )));
        }

        self.dataset
            .set_output_columns(self.config.output_map.clone())?;
        self.dataset
            .set_input_columns(self.config.input_map.clone())?;

        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.config.separator as u8)
            .from_path(&self.config.path)?;
        let mut records = reader.into_records();
        let mut line = 0usize;

        // Skip the header verbatim; its content is never parsed.
        for _ in 0..self.config.header_lines {
            if next_record(&mut records, &mut line)?.is_none() {
                return Err(shortfall(parts[0], 0));
            }
        }

        // Probe the first data line for the source column count.
        let first = match next_record(&mut records, &mut line)? {
            Some(record) => record,
            None => return Err(shortfall(parts[0], 0)),
        };
        let column_count = first.len();

        if self.dataset.input_map().is_empty() {
            let defaults = default_input_map(column_count, self.dataset.output_map())?;
            log::debug!(
                "resolved default input map over {} of {column_count} source columns",
                defaults.len()
            );
            self.dataset.set_input_columns(defaults)?;
        }

        let width = self.dataset.vector_width();
        let mut fields: Vec<f64> = Vec::with_capacity(column_count);
        let mut pending = Some(first);
        let mut filled: Vec<(Partition, Matrix)> = Vec::with_capacity(parts.len());

        for &(partition, range) in &parts {
            // Advance to the range start; skipped lines are never parsed.
            while line < range.start {
                pending = match next_record(&mut records, &mut line)? {
                    Some(record) => Some(record),
                    None => return Err(shortfall((partition, range), 0)),
                };
            }

            let mut matrix = Matrix::zeros(range.row_count(), width);
            for row_index in 0..range.row_count() {
                let record = match pending.take() {
                    Some(record) => record,
                    None => match next_record(&mut records, &mut line)? {
                        Some(record) => record,
                        None => return Err(shortfall((partition, range), row_index)),
                    },
                };
                parse_fields(&record, line, &mut fields)?;
                fill_vector(
                    self.dataset.output_map(),
                    self.dataset.input_map(),
                    &fields,
                    matrix.row_mut(row_index),
                )?;
            }
            filled.push((partition, matrix));
        }

        for (partition, matrix) in filled {
            log::info!(
                "loaded {} {} rows of width {} from {}",
                matrix.rows(),
                partition.name(),
                width,
                self.config.path.display()
            );
            self.dataset.install(partition, matrix);
        }
        Ok(())
    }

    fn validated_partitions(&self) -> DataResult<Vec<(Partition, RowRange)>> {
        let mut parts = Vec::with_capacity(2);
        if let Some(range) = self.config.training {
            range.validate("training", self.config.header_lines)?;
            parts.push((Partition::Training, range));
        }
        if let Some(range) = self.config.testing {
            range.validate("testing", self.config.header_lines)?;
            parts.push((Partition::Testing, range));
        }
        if parts.is_empty() {
            return Err(DataError::Configuration(
                "neither a training nor a testing range is configured".to_string(),
            ));
        }
        if let (Some(training), Some(testing)) = (self.config.training, self.config.testing) {
            if training.overlaps(testing) {
                return Err(DataError::Configuration(format!(
                    "training range [{}, {}] overlaps testing range [{}, {}]",
                    training.start, training.end, testing.start, testing.end
                )));
            }
        }
        parts.sort_by_key(|(_, range)| range.start);
        Ok(parts)
    }
}

fn shortfall((partition, range): (Partition, RowRange), rows_read: usize) -> DataError {
    DataError::DataShortfall {
        partition: partition.name(),
        rows_read,
        rows_expected: range.row_count(),
    }
}

/// Pull the next record, keeping the 1-based line count in step.
fn next_record<R: Read>(
    records: &mut csv::StringRecordsIntoIter<R>,
    line: &mut usize,
) -> DataResult<Option<csv::StringRecord>> {
    match records.next() {
        Some(record) => {
            *line += 1;
            Ok(Some(record?))
        }
        None => Ok(None),
    }
}

/// Parse every field of a record as `f64`, reusing the field buffer.
fn parse_fields(
    record: &csv::StringRecord,
    line: usize,
    fields: &mut Vec<f64>,
) -> DataResult<()> {
    fields.clear();
    for (index, raw) in record.iter().enumerate() {
        let value = raw.trim().parse::<f64>().map_err(|_| DataError::Parse {
            line,
            field: index,
            text: raw.to_string(),
        })?;
        fields.push(value);
    }
    Ok(())
}

/// Resolve one stored vector: output slots first, then input slots, in map
/// order.
fn fill_vector(
    output_map: &[ColumnMap],
    input_map: &[ColumnMap],
    fields: &[f64],
    target: &mut [f64],
) -> DataResult<()> {
    for (slot, map) in output_map.iter().chain(input_map).enumerate() {
        target[slot] = map.target_value(fields)?;
    }
    Ok(())
}

/// Default input map when none is configured: identity over every source
/// column the output map does not reference, in source order.
fn default_input_map(column_count: usize, output_map: &[ColumnMap]) -> DataResult<Vec<ColumnMap>> {
    let maps: Vec<ColumnMap> = (0..column_count)
        .filter(|index| !output_map.iter().any(|map| map.source_index == *index))
        .map(ColumnMap::raw)
        .collect();
    if maps.is_empty() {
        return Err(DataError::Configuration(
            "every source column is referenced by the output map; no input columns remain"
                .to_string(),
        ));
    }
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::transform::Transform;

    #[test]
    fn range_validation() {
        assert!(RowRange::new(1, 5).validate("training", 0).is_ok());
        assert!(RowRange::new(0, 5).validate("training", 0).is_err());
        assert!(RowRange::new(5, 1).validate("training", 0).is_err());
        assert!(RowRange::new(1, 5).validate("training", 1).is_err());
        assert!(RowRange::new(2, 5).validate("training", 1).is_ok());
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = RowRange::new(1, 5);
        let b = RowRange::new(3, 6);
        let c = RowRange::new(6, 9);
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));
        assert!(!a.overlaps(c));
        assert!(!c.overlaps(a));
    }

    #[test]
    fn default_map_covers_all_columns_when_no_output_map() {
        let maps = default_input_map(4, &[]).unwrap();
        let indices: Vec<usize> = maps.iter().map(|m| m.source_index).collect();
        assert_eq!(indices, [0, 1, 2, 3]);
        assert!(maps.iter().all(|m| m.transform.is_none()));
    }

    #[test]
    fn default_map_skips_output_columns() {
        let output = [
            ColumnMap::new(0, Some(Transform::Bin)),
            ColumnMap::raw(2),
        ];
        let maps = default_input_map(4, &output).unwrap();
        let indices: Vec<usize> = maps.iter().map(|m| m.source_index).collect();
        assert_eq!(indices, [1, 3]);
    }

    #[test]
    fn default_map_with_no_remaining_columns_fails() {
        let output = [ColumnMap::raw(0), ColumnMap::raw(1)];
        assert!(default_input_map(2, &output).is_err());
    }

    #[test]
    fn recipe_json_round_trip() {
        let mut config = FileConfig::new("samples.csv");
        config.separator = ';';
        config.header_lines = 1;
        config.training = Some(RowRange::new(2, 11));
        config.output_map = vec![ColumnMap::new(0, Some(Transform::Bin))];

        let json = serde_json::to_string(&config).unwrap();
        let back: FileConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.separator, ';');
        assert_eq!(back.header_lines, 1);
        assert_eq!(back.training, Some(RowRange::new(2, 11)));
        assert_eq!(back.output_map, config.output_map);
        assert!(back.input_map.is_empty());
    }
}
