//! Ordered composites of hyperparameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hyperparameter::Hyperparameter;
use crate::param::Config;

/// A named collection of hyperparameters searched as a whole.
///
/// A tunable converts complete configurations to and from a single
/// normalized vector: the concatenation of each hyperparameter's encoding
/// in declaration order.
///
/// # Examples
///
/// ```
/// use tunebandit::hyperparameter::Hyperparameter;
/// use tunebandit::tunable::Tunable;
///
/// let tunable = Tunable::new([
///     ("c", Hyperparameter::float(0.01, 10.0)),
///     ("kernel", Hyperparameter::categorical(["rbf", "linear"])),
/// ])
/// .unwrap();
///
/// assert_eq!(tunable.dimensions(), 3);
///
/// let config = tunable.reverse_transform(&[0.0, 0.1, 0.9]).unwrap();
/// assert_eq!(config["kernel"].as_str(), Some("linear"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Hyperparameter>",
    into = "BTreeMap<String, Hyperparameter>"
)]
pub struct Tunable {
    hyperparameters: Vec<(String, Hyperparameter)>,
}

impl Tunable {
    /// Creates a tunable from `(name, hyperparameter)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] if a name repeats or a
    /// definition fails [`Hyperparameter::validate`].
    pub fn new<N, I>(hyperparameters: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Hyperparameter)>,
    {
        let mut seen = Vec::new();
        for (name, hp) in hyperparameters {
            let name = name.into();
            hp.validate(&name)?;
            if seen.iter().any(|(existing, _)| *existing == name) {
                return Err(Error::InvalidHyperparameter {
                    name,
                    reason: "duplicate name".to_owned(),
                });
            }
            seen.push((name, hp));
        }
        Ok(Self {
            hyperparameters: seen,
        })
    }

    /// Parses a tunable from its JSON definition.
    ///
    /// Keys are hyperparameter names. Hyperparameters are ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and
    /// [`Error::InvalidHyperparameter`] for invalid definitions.
    pub fn from_json(spec: &str) -> Result<Self> {
        let map: BTreeMap<String, Hyperparameter> = serde_json::from_str(spec)?;
        Self::try_from(map)
    }

    /// Serializes this tunable to its JSON definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The hyperparameters in declaration order.
    #[must_use]
    pub fn hyperparameters(&self) -> &[(String, Hyperparameter)] {
        &self.hyperparameters
    }

    /// Number of hyperparameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hyperparameters.len()
    }

    /// Whether there are no hyperparameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hyperparameters.is_empty()
    }

    /// Width of the normalized vector.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.hyperparameters
            .iter()
            .map(|(_, hp)| hp.dimensions())
            .sum()
    }

    /// Encodes a configuration into a normalized vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] if a hyperparameter is
    /// missing, unknown or holds an invalid value.
    pub fn transform(&self, config: &Config) -> Result<Vec<f64>> {
        if let Some(unknown) = config
            .keys()
            .find(|key| !self.hyperparameters.iter().any(|(name, _)| name == *key))
        {
            return Err(Error::InvalidHyperparameter {
                name: unknown.clone(),
                reason: "not part of this tunable".to_owned(),
            });
        }

        let mut encoded = Vec::with_capacity(self.dimensions());
        for (name, hp) in &self.hyperparameters {
            let value = config
                .get(name)
                .ok_or_else(|| Error::InvalidHyperparameter {
                    name: name.clone(),
                    reason: "missing from configuration".to_owned(),
                })?;
            encoded.extend(hp.transform(name, value)?);
        }
        Ok(encoded)
    }

    /// Decodes a normalized vector into a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `encoded` does not have
    /// [`dimensions`](Self::dimensions) entries.
    pub fn reverse_transform(&self, encoded: &[f64]) -> Result<Config> {
        let expected = self.dimensions();
        if encoded.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                got: encoded.len(),
            });
        }

        let mut config = Config::new();
        let mut offset = 0;
        for (name, hp) in &self.hyperparameters {
            let width = hp.dimensions();
            let value = hp.reverse_transform(&encoded[offset..offset + width])?;
            config.insert(name.clone(), value);
            offset += width;
        }
        Ok(config)
    }

    /// Samples a configuration uniformly at random.
    pub fn sample_config(&self, rng: &mut fastrand::Rng) -> Config {
        self.hyperparameters
            .iter()
            .map(|(name, hp)| (name.clone(), hp.sample(rng)))
            .collect()
    }

    /// Samples `n` normalized vectors, each a valid encoding.
    ///
    /// # Errors
    ///
    /// Propagates encoding errors, which only occur for invalid definitions.
    pub fn sample(&self, rng: &mut fastrand::Rng, n: usize) -> Result<Vec<Vec<f64>>> {
        (0..n)
            .map(|_| self.transform(&self.sample_config(rng)))
            .collect()
    }
}

impl TryFrom<BTreeMap<String, Hyperparameter>> for Tunable {
    type Error = Error;

    fn try_from(map: BTreeMap<String, Hyperparameter>) -> Result<Self> {
        Self::new(map)
    }
}

impl From<Tunable> for BTreeMap<String, Hyperparameter> {
    fn from(tunable: Tunable) -> Self {
        tunable.hyperparameters.into_iter().collect()
    }
}
