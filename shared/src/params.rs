use serde::{Deserialize, Serialize};

/// Rejected simulation parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("neighborhood radius must be positive")]
    ZeroRadius,
}

/// Rule parameters shared by every agent in a run.
///
/// Passed explicitly into each tick; nothing reads these from global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Chance a prey reproduces on each activation
    pub prey_reproduction_chance: f64,

    /// Chance a predator dies at the end of each activation
    pub predator_death_chance: f64,

    /// Chebyshev radius used for movement and offspring placement
    pub neighborhood_radius: usize,
}

impl Parameters {
    pub fn new(
        prey_reproduction_chance: f64,
        predator_death_chance: f64,
        neighborhood_radius: usize,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            prey_reproduction_chance,
            predator_death_chance,
            neighborhood_radius,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field is within its legal range
    pub fn validate(&self) -> Result<(), ParameterError> {
        check_probability("prey_reproduction_chance", self.prey_reproduction_chance)?;
        check_probability("predator_death_chance", self.predator_death_chance)?;
        if self.neighborhood_radius == 0 {
            return Err(ParameterError::ZeroRadius);
        }
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            prey_reproduction_chance: 0.04,
            predator_death_chance: 0.05,
            neighborhood_radius: 1,
        }
    }
}

/// NaN fails the range check as well
pub fn check_probability(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::ProbabilityOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_parameters_are_valid() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let err = Parameters::new(1.5, 0.1, 1).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::ProbabilityOutOfRange {
                name: "prey_reproduction_chance",
                ..
            }
        ));

        let err = Parameters::new(0.1, -0.01, 1).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::ProbabilityOutOfRange {
                name: "predator_death_chance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_nan() {
        assert!(Parameters::new(f64::NAN, 0.1, 1).is_err());
    }

    #[test]
    fn test_rejects_zero_radius() {
        assert_eq!(Parameters::new(0.1, 0.1, 0), Err(ParameterError::ZeroRadius));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: Parameters =
            serde_json::from_str(r#"{"predator_death_chance": 1.0}"#).unwrap();
        assert_eq!(params.predator_death_chance, 1.0);
        assert_eq!(params.neighborhood_radius, 1);
        assert_eq!(params.prey_reproduction_chance, 0.04);
    }

    proptest! {
        #[test]
        fn test_probabilities_in_unit_interval_accepted(p in 0.0f64..=1.0, q in 0.0f64..=1.0, r in 1usize..5) {
            prop_assert!(Parameters::new(p, q, r).is_ok());
        }

        #[test]
        fn test_probabilities_above_one_rejected(p in 1.0001f64..100.0) {
            prop_assert!(Parameters::new(p, 0.5, 1).is_err());
            prop_assert!(Parameters::new(0.5, p, 1).is_err());
        }
    }
}
