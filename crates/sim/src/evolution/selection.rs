//! Selection regimes favouring type A.
//!
//! Selection acts in exactly one place of a Cannings generation:
//!
//! - **Fecundity**: type-A individuals draw their offspring counts from a
//!   distribution weighted by the selection strength (more offspring).
//! - **Viability**: offspring counts are neutral, but during survivor sampling each
//!   type-A offspring is `strength` times as likely to be picked as a type-B one.
//!
//! The two regimes are mutually exclusive. A strength of 1.0 is neutral in both.

use crate::errors::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where selection acts during a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Neutral reproduction.
    #[default]
    None,
    /// Selection on offspring numbers.
    Fecundity,
    /// Selection on offspring survival.
    Viability,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fecundity => write!(f, "fecundity"),
            Self::Viability => write!(f, "viability"),
        }
    }
}

impl FromStr for SelectionMode {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "neutral" => Ok(Self::None),
            "fecundity" => Ok(Self::Fecundity),
            "viability" => Ok(Self::Viability),
            other => Err(SimulationError::invalid(format!(
                "selection mode '{other}' must be one of 'none', 'fecundity' or 'viability'"
            ))),
        }
    }
}

/// A selection mode together with its strength.
///
/// The strength is the relative weight of type A (`>= 1.0`); the classical
/// selection coefficient is `strength - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    mode: SelectionMode,
    strength: f64,
}

impl Default for Selection {
    fn default() -> Self {
        Self::neutral()
    }
}

impl Selection {
    /// Create a selection regime.
    ///
    /// Without selection the strength has no effect and is stored as 1.0.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] if `strength` is not a finite
    /// value `>= 1.0`.
    pub fn new(mode: SelectionMode, strength: f64) -> Result<Self, SimulationError> {
        if !(strength.is_finite() && strength >= 1.0) {
            return Err(SimulationError::invalid(format!(
                "selection strength={strength} but it must satisfy 1 <= strength"
            )));
        }
        if mode == SelectionMode::None {
            return Ok(Self::neutral());
        }
        Ok(Self { mode, strength })
    }

    /// No selection.
    pub fn neutral() -> Self {
        Self {
            mode: SelectionMode::None,
            strength: 1.0,
        }
    }

    /// Fecundity selection with the given strength.
    pub fn fecundity(strength: f64) -> Result<Self, SimulationError> {
        Self::new(SelectionMode::Fecundity, strength)
    }

    /// Viability selection with the given strength.
    pub fn viability(strength: f64) -> Result<Self, SimulationError> {
        Self::new(SelectionMode::Viability, strength)
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Selection coefficient `s = strength - 1`, zero without selection.
    pub fn coefficient(&self) -> f64 {
        match self.mode {
            SelectionMode::None => 0.0,
            _ => self.strength - 1.0,
        }
    }

    /// Weight passed to the offspring distribution of type-A parents.
    pub fn fecundity_weight(&self) -> f64 {
        match self.mode {
            SelectionMode::Fecundity => self.strength,
            _ => 1.0,
        }
    }

    /// Relative survival weight of type-A offspring.
    pub fn viability_weight(&self) -> f64 {
        match self.mode {
            SelectionMode::Viability => self.strength,
            _ => 1.0,
        }
    }

    /// True when neither regime changes the neutral dynamics.
    pub fn is_neutral(&self) -> bool {
        self.mode == SelectionMode::None || self.strength == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_strength_validation() {
        assert!(Selection::fecundity(0.99).is_err());
        assert!(Selection::viability(f64::NAN).is_err());
        assert!(Selection::viability(f64::INFINITY).is_err());
        assert!(Selection::new(SelectionMode::None, 1.0).is_ok());
        assert!(Selection::fecundity(1.0).is_ok());
    }

    #[test]
    fn test_weights_apply_to_one_regime_only() {
        let fec = Selection::fecundity(2.0).unwrap();
        assert_eq!(fec.fecundity_weight(), 2.0);
        assert_eq!(fec.viability_weight(), 1.0);

        let via = Selection::viability(1.5).unwrap();
        assert_eq!(via.fecundity_weight(), 1.0);
        assert_eq!(via.viability_weight(), 1.5);

        let none = Selection::new(SelectionMode::None, 3.0).unwrap();
        assert_eq!(none.fecundity_weight(), 1.0);
        assert_eq!(none.viability_weight(), 1.0);
        assert!(none.is_neutral());
    }

    #[test]
    fn test_coefficient() {
        let sel = Selection::viability(1.1).unwrap();
        assert!((sel.coefficient() - 0.1).abs() < 1e-12);
        assert_eq!(Selection::neutral().coefficient(), 0.0);
    }

    #[test]
    fn test_strength_ignored_without_selection() {
        let none = Selection::new(SelectionMode::None, 3.0).unwrap();
        assert_eq!(none, Selection::neutral());
        assert_eq!(none.coefficient(), 0.0);

        // Deserialized values bypass `new`.
        let parsed: Selection =
            serde_json::from_str(r#"{"mode": "none", "strength": 3.0}"#).unwrap();
        assert_eq!(parsed.coefficient(), 0.0);
        assert!(parsed.is_neutral());
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("fecundity".parse::<SelectionMode>().unwrap(), SelectionMode::Fecundity);
        assert_eq!("Viability".parse::<SelectionMode>().unwrap(), SelectionMode::Viability);
        assert_eq!("neutral".parse::<SelectionMode>().unwrap(), SelectionMode::None);
        assert!("both".parse::<SelectionMode>().is_err());

        for mode in [SelectionMode::None, SelectionMode::Fecundity, SelectionMode::Viability] {
            assert_eq!(mode.to_string().parse::<SelectionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_mode_serde_lowercase() {
        let json = serde_json::to_string(&SelectionMode::Viability).unwrap();
        assert_eq!(json, "\"viability\"");
        let mode: SelectionMode = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(mode, SelectionMode::None);
    }
}
