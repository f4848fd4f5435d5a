//! Run-scoped configuration for a clustering run.

use serde::{Deserialize, Serialize};

/// How a source's extent takes part in containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtentPolicy {
    /// Sources are bare points; only their position must lie in the core bounds.
    #[default]
    Ignore,
    /// The square of half-size `extent` around the source must lie in the core bounds.
    /// Freshly spawned rectangles are widened by the extent on every side.
    Contain,
}

/// Configuration for one clustering run.
///
/// Nothing here outlives the run: every call to
/// [`find_efficient_coverage`](crate::find_efficient_coverage) or
/// [`Clustering::new`](crate::Clustering::new) takes its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Margin kept between every owned source and the rectangle edge,
    /// in the same units as the source coordinates.
    pub border: f64,
    pub extent_policy: ExtentPolicy,
    /// Evaluate per-rectangle costs and central-point sums on the rayon pool.
    /// The result is identical to the sequential run.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border: 0.0,
            extent_policy: ExtentPolicy::Ignore,
            parallel: false,
        }
    }
}

impl Config {
    pub fn with_border(mut self, border: f64) -> Self {
        self.border = border;
        self
    }

    pub fn with_extent_policy(mut self, extent_policy: ExtentPolicy) -> Self {
        self.extent_policy = extent_policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Growth cost above which a new rectangle is spawned instead.
    ///
    /// This is the area of a freshly spawned rectangle, `(2 * border)^2`.
    #[inline]
    pub fn promotion_threshold(&self) -> f64 {
        let side = 2.0 * self.border;
        side * side
    }

    /// Validate configuration parameters.
    pub fn validate(&self) {
        assert!(
            self.border.is_finite(),
            "border must be finite, got {}",
            self.border
        );
        assert!(
            self.border >= 0.0,
            "border must be non-negative, got {}",
            self.border
        );
    }
}
