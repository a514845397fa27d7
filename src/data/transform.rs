use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Transform: per-cell operators applied while a map resolves a slot
// ---------------------------------------------------------------------------

/// A pure scalar operator attached to a column map slot.
///
/// The arithmetic variants carry a constant bias; `Inv` and `Bin` collapse
/// a value to a 0/1 indicator. Operators hold no state beyond the bias and
/// are applied exactly once per cell, while the file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "bias", rename_all = "snake_case")]
pub enum Transform {
    /// `x + bias`
    Add(f64),
    /// `x - bias`
    Sub(f64),
    /// `x * bias`
    Mul(f64),
    /// `x / bias`; a zero bias is rejected by [`Transform::validate`].
    Div(f64),
    /// `1` when `x == 0`, else `0`.
    Inv,
    /// `0` when `x == 0`, else `1`.
    Bin,
}

impl Transform {
    /// Apply the operator to one cell.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Transform::Add(bias) => x + bias,
            Transform::Sub(bias) => x - bias,
            Transform::Mul(bias) => x * bias,
            Transform::Div(bias) => x / bias,
            Transform::Inv => {
                if x == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Transform::Bin => {
                if x == 0.0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    /// Reject operators that could never produce a finite value.
    ///
    /// Runs wherever a map is installed, so a zero divisor fails before a
    /// single cell is computed.
    pub fn validate(self) -> DataResult<()> {
        match self {
            Transform::Div(bias) if bias == 0.0 => Err(DataError::Configuration(
                "Div transform constructed with a zero bias".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_variants() {
        assert_eq!(Transform::Add(2.1).apply(0.2), 2.3);
        assert_eq!(Transform::Sub(0.5).apply(2.0), 1.5);
        assert_eq!(Transform::Mul(4.0).apply(0.25), 1.0);
        assert_eq!(Transform::Div(4.0).apply(1.0), 0.25);
    }

    #[test]
    fn indicator_variants() {
        assert_eq!(Transform::Inv.apply(0.0), 1.0);
        assert_eq!(Transform::Inv.apply(1.25), 0.0);
        assert_eq!(Transform::Bin.apply(0.0), 0.0);
        assert_eq!(Transform::Bin.apply(1.25), 1.0);
    }

    #[test]
    fn zero_divisor_rejected() {
        assert!(Transform::Div(0.0).validate().is_err());
        assert!(Transform::Div(0.1).validate().is_ok());
        assert!(Transform::Add(0.0).validate().is_ok());
    }

    #[test]
    fn recipe_round_trip() {
        let json = serde_json::to_string(&Transform::Div(2.0)).unwrap();
        let back: Transform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Transform::Div(2.0));

        let bin: Transform = serde_json::from_str(r#"{"op":"bin"}"#).unwrap();
        assert_eq!(bin, Transform::Bin);
    }
}
