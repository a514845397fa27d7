use serde::{Deserialize, Serialize};

use crate::data::transform::Transform;
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// ColumnMap: how one source column becomes one vector slot
// ---------------------------------------------------------------------------

/// One slot of the target vector: a source column index plus an optional
/// transform.
///
/// A list of these defines a whole map; list order is slot order. Resolving
/// a slot is a pure function of the map and the row it is given, so a map
/// can be shared freely across rows and threads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnMap {
    /// Zero-based index into the parsed source row.
    pub source_index: usize,
    /// Operator applied to the raw field; `None` passes it through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

impl ColumnMap {
    pub fn new(source_index: usize, transform: Option<Transform>) -> Self {
        Self {
            source_index,
            transform,
        }
    }

    /// Identity map over one column.
    pub fn raw(source_index: usize) -> Self {
        Self::new(source_index, None)
    }

    /// Resolve this slot's value from a parsed source row.
    pub fn target_value(&self, row: &[f64]) -> DataResult<f64> {
        let raw = *row
            .get(self.source_index)
            .ok_or(DataError::ColumnOutOfRange {
                index: self.source_index,
                width: row.len(),
            })?;
        Ok(match self.transform {
            Some(transform) => transform.apply(raw),
            None => raw,
        })
    }
}

/// Validate every transform carried by a map list.
pub fn validate_maps(maps: &[ColumnMap]) -> DataResult<()> {
    for map in maps {
        if let Some(transform) = map.transform {
            transform.validate()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_slot_passes_field_through() {
        let row = [0.0, 0.1, 0.2, 0.3];
        assert_eq!(ColumnMap::raw(1).target_value(&row).unwrap(), 0.1);
    }

    #[test]
    fn transform_applies_to_the_mapped_field() {
        let row = [0.0, 0.1, 0.2, 0.3];
        let map = ColumnMap::new(2, Some(Transform::Add(2.1)));
        assert_eq!(map.target_value(&row).unwrap(), 2.3);
    }

    #[test]
    fn index_past_row_end_fails() {
        let row = [0.0, 0.1];
        let err = ColumnMap::raw(2).target_value(&row).unwrap_err();
        assert!(matches!(
            err,
            DataError::ColumnOutOfRange { index: 2, width: 2 }
        ));
    }

    #[test]
    fn map_list_validation_catches_zero_divisor() {
        let maps = vec![
            ColumnMap::raw(0),
            ColumnMap::new(1, Some(Transform::Div(0.0))),
        ];
        assert!(validate_maps(&maps).is_err());
    }
}
