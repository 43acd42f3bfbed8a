use std::collections::BTreeSet;
use std::fmt;

use crate::feature::{Feature, FeatureExpr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootState {
    /// The init system reports the machine as up (`running` or `degraded`).
    Booted,
    /// Still starting, in a chroot/container build, or unknown.
    #[default]
    NotBooted,
}

/// Description of the host the suite runs on.
///
/// Every gate is evaluated against this value before a case is started, so a
/// case never has to inspect the machine itself to decide whether it applies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    pub features: BTreeSet<Feature>,
    pub boot: BootState,
}

impl Environment {
    pub fn new<I>(features: I, boot: BootState) -> Self
    where
        I: IntoIterator<Item = Feature>,
    {
        Self {
            features: features.into_iter().collect(),
            boot,
        }
    }

    pub fn is_booted(&self) -> bool {
        self.boot == BootState::Booted
    }
}

/// A marker attached to a case that must hold for the case to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// The environment's features must satisfy the expression.
    Feature(FeatureExpr),
    /// The system must be fully booted.
    Booted { reason: &'static str },
}

impl Gate {
    /// Returns `None` if the gate is open, otherwise why the case is skipped.
    pub fn evaluate(&self, env: &Environment) -> Option<String> {
        match self {
            Gate::Feature(expr) if expr.matches(&env.features) => None,
            Gate::Feature(expr) => Some(format!("requires feature '{expr}'")),
            Gate::Booted { .. } if env.is_booted() => None,
            Gate::Booted { reason } => Some(format!("system not booted: {reason}")),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Feature(expr) => write!(f, "feature({expr})"),
            Gate::Booted { .. } => f.write_str("booted"),
        }
    }
}
