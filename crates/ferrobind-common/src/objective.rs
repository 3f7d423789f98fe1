//! Objective directions and the per-sweep sign policy.
//!
//! A consensus Pareto run performs one sweep per objective column. Each sweep
//! assigns every objective a [`Direction`]; the [`SweepPolicy`] decides which.
//! The research scripts this tool grew out of disagreed on the exact rule, so
//! the rule is configuration rather than a constant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Optimisation direction of one objective within one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Multiplier that turns a raw value into maximize form.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Minimize => -1.0,
            Direction::Maximize => 1.0,
        }
    }

    /// True if `candidate` is strictly better than `other` in this direction.
    pub fn better(self, candidate: f64, other: f64) -> bool {
        match self {
            Direction::Minimize => candidate < other,
            Direction::Maximize => candidate > other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Minimize => "minimize",
            Direction::Maximize => "maximize",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimize" | "minimise" => Ok(Direction::Minimize),
            "max" | "maximize" | "maximise" => Ok(Direction::Maximize),
            other => Err(PolicyError::UnknownDirection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("at least one objective is required")]
    NoObjectives,

    #[error("explicit policy lists no sweeps")]
    NoSweeps,

    #[error("sweep {sweep} has {actual} directions, expected {expected}")]
    ShapeMismatch { sweep: usize, expected: usize, actual: usize },

    #[error("unknown direction '{0}' (expected minimize or maximize)")]
    UnknownDirection(String),

    #[error("unknown policy mode '{0}'")]
    UnknownMode(String),
}

/// Rule that assigns directions to objectives for every sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SweepPolicy {
    /// Sweep `i` minimizes objective 0 and objective `i`, maximizes the rest.
    PinnedMinimize,
    /// Every sweep minimizes objective 0 and maximizes the rest.
    LeadMinimizeOnly,
    /// Caller-supplied directions, one vector per sweep.
    Explicit { sweeps: Vec<Vec<Direction>> },
}

impl Default for SweepPolicy {
    fn default() -> Self {
        SweepPolicy::PinnedMinimize
    }
}

impl SweepPolicy {
    /// Parse the mode names used on the command line.
    /// `explicit` cannot be expressed this way and is rejected.
    pub fn from_mode(mode: &str) -> Result<Self, PolicyError> {
        match mode.trim() {
            "pinned_minimize" | "pinned-minimize" => Ok(SweepPolicy::PinnedMinimize),
            "lead_minimize_only" | "lead-minimize-only" => Ok(SweepPolicy::LeadMinimizeOnly),
            other => Err(PolicyError::UnknownMode(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SweepPolicy::PinnedMinimize => "pinned_minimize",
            SweepPolicy::LeadMinimizeOnly => "lead_minimize_only",
            SweepPolicy::Explicit { .. } => "explicit",
        }
    }

    /// Expand the policy into one direction vector per sweep for `k` objectives.
    pub fn sweeps(&self, k: usize) -> Result<Vec<Vec<Direction>>, PolicyError> {
        if k == 0 {
            return Err(PolicyError::NoObjectives);
        }

        match self {
            SweepPolicy::PinnedMinimize => Ok((0..k)
                .map(|pinned| {
                    (0..k)
                        .map(|col| {
                            if col == 0 || col == pinned {
                                Direction::Minimize
                            } else {
                                Direction::Maximize
                            }
                        })
                        .collect()
                })
                .collect()),
            SweepPolicy::LeadMinimizeOnly => {
                let lead: Vec<Direction> = (0..k)
                    .map(|col| if col == 0 { Direction::Minimize } else { Direction::Maximize })
                    .collect();
                Ok(vec![lead; k])
            }
            SweepPolicy::Explicit { sweeps } => {
                if sweeps.is_empty() {
                    return Err(PolicyError::NoSweeps);
                }
                for (sweep, dirs) in sweeps.iter().enumerate() {
                    if dirs.len() != k {
                        return Err(PolicyError::ShapeMismatch {
                            sweep,
                            expected: k,
                            actual: dirs.len(),
                        });
                    }
                }
                Ok(sweeps.clone())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
