//! Case table and checker settings.
//!
//! A config is usually written as JSON:
//!
//! ```
//! use flipcheck::CheckConfig;
//!
//! let config = CheckConfig::from_json(r#"{
//!     "seed": 7,
//!     "dims": [[1, 5, 19], [3, 19]],
//!     "axes": [0, [1], [0, 1], null],
//!     "engines": ["default", "parallel", "cudnn"],
//!     "strategy": { "sampled": { "max_examples": 20 } },
//!     "tolerance": { "atol": 1e-4, "rtol": 1e-4 }
//! }"#).unwrap();
//! assert_eq!(config.rank(), 2);
//! ```
use crate::axes::AxisArg;
use crate::cases::Strategy;
use crate::compare::Tolerance;
use crate::errors::CheckError;
use crate::ops::Engine;
use std::fs;
use std::path::Path;

/// Everything needed to generate and check a run of cases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Seed of the case generator's random number generator.
    pub seed: u64,
    /// Candidate sizes for each dimension; the outer length is the rank.
    pub dims: Vec<Vec<usize>>,
    /// Candidate `axes` arguments. `null` leaves the argument unset.
    pub axes: Vec<Option<AxisArg>>,
    /// Candidate engines.
    pub engines: Vec<Engine>,
    pub strategy: Strategy,
    pub tolerance: Tolerance,
    /// Also require that flipping the output again restores the input exactly.
    pub check_involution: bool,
}

impl Default for CheckConfig {
    /// A 19x19 input flipped along axis 1 by the default and the cudnn engines.
    fn default() -> Self {
        CheckConfig {
            seed: 0,
            dims: vec![vec![19], vec![19]],
            axes: vec![Some(AxisArg::Scalar(1))],
            engines: vec![Engine::Default, Engine::Cudnn],
            strategy: Strategy::default(),
            tolerance: Tolerance::default(),
            check_involution: true,
        }
    }
}

impl CheckConfig {
    pub fn from_json(s: &str) -> Result<Self, CheckError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckError> {
        let s = fs::read_to_string(path)?;
        CheckConfig::from_json(&s)
    }

    pub fn to_json(&self) -> Result<String, CheckError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rank of every generated input.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = CheckConfig::from_json(r#"{ "seed": 3 }"#).unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.dims, vec![vec![19], vec![19]]);
        assert!(config.check_involution);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            CheckConfig::from_json(r#"{ "sead": 3 }"#),
            Err(CheckError::Config(_))
        ));
    }

    #[test]
    fn json_round_trip() {
        let config = CheckConfig {
            axes: vec![None, Some(AxisArg::Seq(vec![0, 1]))],
            strategy: Strategy::Exhaustive,
            ..CheckConfig::default()
        };
        let back = CheckConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, back);
    }
}
