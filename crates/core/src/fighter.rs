//! Fighter attribute snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Combat attributes for one combatant, as served by the fighter directory.
///
/// A `Fighter` is a snapshot: it is fetched fresh for every duel and the
/// simulator never mutates it. Running health lives inside the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub id: String,
    pub name: String,
    pub health: i64,
    /// Base attack power before the per-hit spread is applied.
    pub damage: i64,
    /// Turn-order key. Higher acts first; ties go to the first-listed fighter.
    pub speed: i64,
    /// Hit probability in `[0, 1]`.
    pub accuracy: f64,
}

/// Reasons a fighter cannot be registered with a directory.
#[derive(Debug, Clone, PartialEq)]
pub enum FighterError {
    MissingId,
    NonPositiveHealth { id: String, health: i64 },
    NegativeDamage { id: String, damage: i64 },
    AccuracyOutOfRange { id: String, accuracy: f64 },
}

impl fmt::Display for FighterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FighterError::MissingId => write!(f, "fighter id is required"),
            FighterError::NonPositiveHealth { id, health } => {
                write!(f, "fighter '{}' has non-positive health {}", id, health)
            }
            FighterError::NegativeDamage { id, damage } => {
                write!(f, "fighter '{}' has negative damage {}", id, damage)
            }
            FighterError::AccuracyOutOfRange { id, accuracy } => {
                write!(
                    f,
                    "fighter '{}' has accuracy {} outside [0, 1]",
                    id, accuracy
                )
            }
        }
    }
}

impl std::error::Error for FighterError {}

impl Fighter {
    /// Check the constraints a directory enforces when a fighter is created.
    ///
    /// The simulator does not call this; it accepts any snapshot and
    /// degrades gracefully on odd values.
    pub fn validate(&self) -> Result<(), FighterError> {
        if self.id.trim().is_empty() {
            return Err(FighterError::MissingId);
        }
        if self.health <= 0 {
            return Err(FighterError::NonPositiveHealth {
                id: self.id.clone(),
                health: self.health,
            });
        }
        if self.damage < 0 {
            return Err(FighterError::NegativeDamage {
                id: self.id.clone(),
                damage: self.damage,
            });
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(FighterError::AccuracyOutOfRange {
                id: self.id.clone(),
                accuracy: self.accuracy,
            });
        }
        Ok(())
    }
}
