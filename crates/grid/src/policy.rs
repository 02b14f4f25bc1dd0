// external crates
use serde::{Deserialize, Serialize};

/// Forward/inverse transform for a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scaling {
    /// Identity transform
    Linear,
    /// Natural logarithm transform, positive values only
    Log,
}

impl Scaling {
    /// Apply the forward transform to a raw axis value
    ///
    /// For [Scaling::Log] the value must be strictly positive.
    #[inline]
    pub fn process(&self, value: f64) -> f64 {
        match self {
            Scaling::Linear => value,
            Scaling::Log => value.ln(),
        }
    }

    /// Apply the inverse transform to a processed axis value
    #[inline]
    pub fn recover(&self, value: f64) -> f64 {
        match self {
            Scaling::Linear => value,
            Scaling::Log => value.exp(),
        }
    }
}

/// Runtime-selectable interpolation policy for the two table axes
///
/// The first tag is the primary (energy) axis, the second the secondary
/// axis. Response values always interpolate linearly against the processed
/// secondary coordinate, so the forced-zero origin of every row stays out of
/// any logarithm.
///
/// ```rust
/// # use ptools_grid::{InterpPolicy, Scaling};
/// assert_eq!(InterpPolicy::LinLog.primary(), Scaling::Linear);
/// assert_eq!(InterpPolicy::LinLog.secondary(), Scaling::Log);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpPolicy {
    /// Linear energy axis, linear secondary axis
    #[default]
    LinLin,
    /// Linear energy axis, logarithmic secondary axis
    LinLog,
    /// Logarithmic energy axis, linear secondary axis
    LogLin,
    /// Logarithmic energy axis, logarithmic secondary axis
    LogLog,
}

impl InterpPolicy {
    /// Scaling of the primary (energy) axis
    pub fn primary(&self) -> Scaling {
        match self {
            InterpPolicy::LinLin | InterpPolicy::LinLog => Scaling::Linear,
            InterpPolicy::LogLin | InterpPolicy::LogLog => Scaling::Log,
        }
    }

    /// Scaling of the secondary axis
    pub fn secondary(&self) -> Scaling {
        match self {
            InterpPolicy::LinLin | InterpPolicy::LogLin => Scaling::Linear,
            InterpPolicy::LinLog | InterpPolicy::LogLog => Scaling::Log,
        }
    }

    /// Midpoint of two primary axis values in processed space
    pub fn primary_midpoint(&self, a: f64, b: f64) -> f64 {
        let scale = self.primary();
        scale.recover(0.5 * (scale.process(a) + scale.process(b)))
    }

    /// Midpoint of two secondary axis values in processed space
    pub fn secondary_midpoint(&self, a: f64, b: f64) -> f64 {
        let scale = self.secondary();
        scale.recover(0.5 * (scale.process(a) + scale.process(b)))
    }

    /// Interpolate a response value at `x` between two secondary grid points
    ///
    /// Linear against the processed secondary coordinate, so a logarithmic
    /// secondary axis gives the usual lin-log form.
    pub fn interpolate(&self, x0: f64, x1: f64, x: f64, y0: f64, y1: f64) -> f64 {
        let scale = self.secondary();
        let p0 = scale.process(x0);
        let p1 = scale.process(x1);
        let frac = (scale.process(x) - p0) / (p1 - p0);
        y0 + frac * (y1 - y0)
    }
}
