//! Patchwork - grouping of catalog sources into rectangular sky regions.
//!
//! Given source positions (optionally with an angular extent), patchwork
//! greedily partitions them into axis-aligned rectangles so that each
//! rectangle, shrunk by a fixed border margin, still contains every source
//! assigned to it. Each rectangle then becomes a single image request to an
//! external survey service, so keeping the total area small keeps downloads
//! small.
//!
//! # Quick Start
//!
//! ```rust
//! use patchwork::{find_efficient_coverage, Config, Source};
//!
//! let sources = [Source::new(0.0, 0.0), Source::new(0.5, 0.0), Source::new(100.0, 100.0)];
//! let coverage = find_efficient_coverage(sources, Config::default().with_border(1.0))?;
//!
//! assert_eq!(coverage.len(), 2);
//! assert_eq!(coverage.region_of(0), coverage.region_of(1));
//! assert_ne!(coverage.region_of(0), coverage.region_of(2));
//! # Ok::<(), patchwork::Error>(())
//! ```

mod config;
mod coverage;
mod error;
pub mod geometry;
pub(crate) mod math;
mod point;
mod rectangle;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Configuration and errors
// ============================================================================

pub use config::{Config, ExtentPolicy};
pub use error::{Defect, Error, InvalidInput};

// ============================================================================
// Clustering building blocks
// ============================================================================

pub use geometry::{Bounds, CoreBounds, Deltas, Footprint};
pub use point::{Point, PointId, PointRegistry};
pub use rectangle::Rectangle;

// ============================================================================
// Driver and results
// ============================================================================

pub use coverage::{find_efficient_coverage, Candidate, Clustering, Coverage, Region, Source, Step};
