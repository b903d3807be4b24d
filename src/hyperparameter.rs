//! Single tunable dimensions and their normalized encoding.
//!
//! Every [`Hyperparameter`] maps values from its native domain onto the
//! unit hypercube and back:
//!
//! | Variant | Dimensions | Encoding |
//! |---------|------------|----------|
//! | [`Float`](Hyperparameter::Float) | 1 | min-max scaling |
//! | [`Int`](Hyperparameter::Int) | 1 | min-max scaling, decoded to the nearest step |
//! | [`Bool`](Hyperparameter::Bool) | 1 | `false` → 0, `true` → 1, decoded at 0.5 |
//! | [`Categorical`](Hyperparameter::Categorical) | one per choice | one-hot, decoded by argmax |
//!
//! The JSON form is tagged by `type`:
//!
//! ```
//! use tunebandit::hyperparameter::Hyperparameter;
//!
//! let hp: Hyperparameter = serde_json::from_str(r#"{"type": "int", "range": [1, 9], "step": 2}"#).unwrap();
//! assert_eq!(hp, Hyperparameter::int(1, 9).step(2));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::rng_util;

fn default_step() -> i64 {
    1
}

/// A single hyperparameter definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Hyperparameter {
    /// A real value in `[range[0], range[1]]`.
    Float {
        /// Inclusive lower and upper bounds.
        range: [f64; 2],
    },
    /// An integer in `[range[0], range[1]]` on a grid of `step`.
    Int {
        /// Inclusive lower and upper bounds.
        range: [i64; 2],
        /// Grid spacing, starting at the lower bound.
        #[serde(default = "default_step")]
        step: i64,
    },
    /// A boolean flag.
    Bool,
    /// One value out of a fixed list of choices.
    #[serde(rename = "str", alias = "categorical")]
    Categorical {
        /// The available choices.
        values: Vec<ParamValue>,
    },
}

impl Hyperparameter {
    /// Creates a float hyperparameter.
    #[must_use]
    pub fn float(low: f64, high: f64) -> Self {
        Self::Float { range: [low, high] }
    }

    /// Creates an integer hyperparameter with a step of 1.
    #[must_use]
    pub fn int(low: i64, high: i64) -> Self {
        Self::Int {
            range: [low, high],
            step: 1,
        }
    }

    /// Creates a boolean hyperparameter.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Bool
    }

    /// Creates a categorical hyperparameter.
    #[must_use]
    pub fn categorical<T: Into<ParamValue>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::Categorical {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Sets the grid step of an integer hyperparameter. No-op for other variants.
    #[must_use]
    pub fn step(mut self, new_step: i64) -> Self {
        if let Self::Int { step, .. } = &mut self {
            *step = new_step;
        }
        self
    }

    /// Number of normalized dimensions this hyperparameter occupies.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Float { .. } | Self::Int { .. } | Self::Bool => 1,
            Self::Categorical { values } => values.len(),
        }
    }

    /// Checks that the definition is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] for reversed or non-finite
    /// bounds, a non-positive step, an empty choice list, or a choice
    /// holding a non-finite number.
    pub fn validate(&self, name: &str) -> Result<()> {
        let reason = match self {
            Self::Float { range: [low, high] } if !low.is_finite() || !high.is_finite() => {
                Some("bounds must be finite".to_owned())
            }
            Self::Float { range: [low, high] } if low > high => {
                Some(format!("low ({low}) must not exceed high ({high})"))
            }
            Self::Int {
                range: [low, high], ..
            } if low > high => Some(format!("low ({low}) must not exceed high ({high})")),
            Self::Int { step, .. } if *step <= 0 => Some("step must be positive".to_owned()),
            Self::Categorical { values } if values.is_empty() => {
                Some("choices cannot be empty".to_owned())
            }
            Self::Categorical { values } if !values.iter().all(is_finite_value) => {
                Some("choices must not contain NaN or infinite numbers".to_owned())
            }
            _ => None,
        };

        match reason {
            Some(reason) => Err(invalid(name, reason)),
            None => Ok(()),
        }
    }

    /// Encodes a native value into its normalized vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] if the value has the wrong
    /// kind or lies outside the domain.
    #[allow(clippy::cast_precision_loss)]
    pub fn transform(&self, name: &str, value: &ParamValue) -> Result<Vec<f64>> {
        match self {
            Self::Float { range: [low, high] } => {
                let v = value
                    .as_f64()
                    .ok_or_else(|| invalid(name, format!("expected a number, got {value:?}")))?;
                if v < *low || v > *high {
                    return Err(invalid(name, format!("{v} outside [{low}, {high}]")));
                }
                Ok(vec![to_unit(v, *low, *high)])
            }
            Self::Int {
                range: [low, high], ..
            } => {
                let v = value
                    .as_i64()
                    .ok_or_else(|| invalid(name, format!("expected an integer, got {value:?}")))?;
                if v < *low || v > *high {
                    return Err(invalid(name, format!("{v} outside [{low}, {high}]")));
                }
                Ok(vec![to_unit(v as f64, *low as f64, *high as f64)])
            }
            Self::Bool => {
                let v = value
                    .as_bool()
                    .ok_or_else(|| invalid(name, format!("expected a boolean, got {value:?}")))?;
                Ok(vec![if v { 1.0 } else { 0.0 }])
            }
            Self::Categorical { values } => {
                let index = values
                    .iter()
                    .position(|choice| choice == value)
                    .ok_or_else(|| invalid(name, format!("{value:?} is not a valid choice")))?;
                let mut encoded = vec![0.0; values.len()];
                encoded[index] = 1.0;
                Ok(encoded)
            }
        }
    }

    /// Decodes a normalized vector back into a native value.
    ///
    /// Values outside `[0, 1]` are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `encoded` does not have
    /// [`dimensions`](Self::dimensions) entries.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn reverse_transform(&self, encoded: &[f64]) -> Result<ParamValue> {
        if encoded.len() != self.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                got: encoded.len(),
            });
        }

        Ok(match self {
            Self::Float { range: [low, high] } => {
                ParamValue::Float(from_unit(encoded[0], *low, *high).clamp(*low, *high))
            }
            Self::Int {
                range: [low, high],
                step,
            } => {
                let max_k = grid_steps(*low, *high, *step);
                let span = (i128::from(*high) - i128::from(*low)) as f64;
                let k = (unit(encoded[0]) * span / *step as f64).round() as i128;
                ParamValue::Int(grid_value(*low, k.clamp(0, max_k), *step))
            }
            Self::Bool => ParamValue::Bool(unit(encoded[0]) >= 0.5),
            Self::Categorical { values } => {
                let mut best = 0;
                for (i, &x) in encoded.iter().enumerate().skip(1) {
                    if x > encoded[best] {
                        best = i;
                    }
                }
                values[best].clone()
            }
        })
    }

    /// Samples a native value uniformly at random.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> ParamValue {
        match self {
            Self::Float { range: [low, high] } => {
                ParamValue::Float(rng_util::f64_range(rng, *low, *high))
            }
            Self::Int {
                range: [low, high],
                step,
            } => {
                let max_k = grid_steps(*low, *high, *step);
                ParamValue::Int(grid_value(*low, rng.i128(0..=max_k), *step))
            }
            Self::Bool => ParamValue::Bool(rng.bool()),
            Self::Categorical { values } => values[rng.usize(..values.len())].clone(),
        }
    }
}

fn invalid(name: &str, reason: String) -> Error {
    Error::InvalidHyperparameter {
        name: name.to_owned(),
        reason,
    }
}

fn is_finite_value(value: &ParamValue) -> bool {
    match value {
        ParamValue::Float(f) => f.is_finite(),
        ParamValue::List(items) => items.iter().all(is_finite_value),
        _ => true,
    }
}

/// Number of whole steps between `low` and `high`, computed without overflow.
fn grid_steps(low: i64, high: i64, step: i64) -> i128 {
    (i128::from(high) - i128::from(low)) / i128::from(step)
}

/// `low + k * step`; fits in `i64` whenever `0 <= k <= grid_steps(..)`.
#[allow(clippy::cast_possible_truncation)]
fn grid_value(low: i64, k: i128, step: i64) -> i64 {
    (i128::from(low) + k * i128::from(step)) as i64
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
fn unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

fn to_unit(value: f64, low: f64, high: f64) -> f64 {
    if (high - low).abs() < 1e-15 {
        0.5
    } else {
        (value - low) / (high - low)
    }
}

fn from_unit(value: f64, low: f64, high: f64) -> f64 {
    low + unit(value) * (high - low)
}
