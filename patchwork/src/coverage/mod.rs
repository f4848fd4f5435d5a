//! The clustering driver and the coverage it produces.
//!
//! A run starts by placing one rectangle on the most central source. After
//! that every step looks at each rectangle's cheapest remaining source and
//! takes the globally cheapest one. If even that costs more than a fresh
//! rectangle would (`(2 * border)^2`), a new rectangle is spawned on the most
//! central remaining source instead. The run ends when no source remains.
//!
//! Each step is O(rectangles x remaining); spawning adds an O(remaining^2)
//! central-point search. There is no spatial index.

use glam::DVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Defect, Error};
use crate::geometry::Bounds;
use crate::math::argmin;
use crate::point::{PointId, PointRegistry};
use crate::rectangle::Rectangle;

#[cfg(test)]
mod tests;

// ============================================================================
// Input
// ============================================================================

/// One catalog source as handed in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub x: f64,
    pub y: f64,
    /// Half-size of the source. Negative values are taken as their absolute value.
    #[serde(default)]
    pub extent: f64,
}

impl Source {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, extent: 0.0 }
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }
}

impl From<(f64, f64)> for Source {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Source {
    fn from((x, y, extent): (f64, f64, f64)) -> Self {
        Self { x, y, extent }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// A rectangle's cheapest remaining point and what absorbing it would cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index into [`Clustering::rectangles`].
    pub rectangle: usize,
    pub point: PointId,
    pub cost: f64,
}

/// What a single [`Clustering::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// A new rectangle was created around the most central remaining point.
    Spawned { rectangle: usize, point: PointId },
    /// An existing rectangle absorbed a point at the given area cost.
    Grew {
        rectangle: usize,
        point: PointId,
        cost: f64,
    },
}

/// State of one clustering run: its points, its rectangles and its config.
///
/// Runs share nothing; cluster independent catalogs with independent values.
#[derive(Debug, Clone)]
pub struct Clustering {
    config: Config,
    registry: PointRegistry,
    rectangles: Vec<Rectangle>,
}

impl Clustering {
    /// Empty run. Panics if `config` is invalid, see [`Config::validate`].
    pub fn new(config: Config) -> Self {
        config.validate();
        Self {
            config,
            registry: PointRegistry::new(),
            rectangles: Vec::new(),
        }
    }

    /// Run with every source registered in iteration order.
    pub fn with_sources<I>(config: Config, sources: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<Source>,
    {
        let mut clustering = Self::new(config);
        for source in sources {
            let source = source.into();
            clustering.add_point(source.x, source.y, source.extent)?;
        }
        Ok(clustering)
    }

    pub fn add_point(&mut self, x: f64, y: f64, extent: f64) -> Result<PointId, Error> {
        Ok(self.registry.register(x, y, extent)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &PointRegistry {
        &self.registry
    }

    /// Rectangles in creation order.
    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    pub fn is_finished(&self) -> bool {
        !self.registry.has_remaining()
    }

    /// Every rectangle's cheapest remaining point, in rectangle order.
    ///
    /// Read-only. With [`Config::parallel`] the rectangles are evaluated on
    /// the rayon pool and collected back in order.
    pub fn candidates(&self) -> Result<Vec<Candidate>, Defect> {
        let policy = self.config.extent_policy;
        let registry = &self.registry;
        let evaluate = |(rectangle, rect): (usize, &Rectangle)| -> Result<Candidate, Defect> {
            let (point, cost) = rect.find_closest_remaining_point(registry, policy)?;
            tracing::trace!(rectangle, point = %point, cost, "Cheapest growth");
            Ok(Candidate {
                rectangle,
                point,
                cost,
            })
        };

        if self.config.parallel {
            self.rectangles.par_iter().enumerate().map(evaluate).collect()
        } else {
            self.rectangles.iter().enumerate().map(evaluate).collect()
        }
    }

    /// Globally cheapest candidate; ties go to the earliest rectangle.
    /// `None` while no rectangle exists.
    pub fn cheapest_candidate(&self) -> Result<Option<Candidate>, Defect> {
        let candidates = self.candidates()?;
        Ok(argmin(candidates.iter().map(|candidate| candidate.cost))
            .map(|(index, _)| candidates[index]))
    }

    /// Advance the run by one spawn or one growth. `None` once finished.
    pub fn step(&mut self) -> Result<Option<Step>, Error> {
        if self.is_finished() {
            return Ok(None);
        }

        let Some(best) = self.cheapest_candidate()? else {
            return Ok(Some(self.spawn()?));
        };

        // Anything not provably within the threshold promotes, NaN and infinity included.
        let threshold = self.config.promotion_threshold();
        if !(best.cost.is_finite() && best.cost <= threshold) {
            tracing::debug!(
                cost = best.cost,
                threshold,
                "Growth costs more than a new rectangle"
            );
            return Ok(Some(self.spawn()?));
        }

        let policy = self.config.extent_policy;
        let rectangle = &mut self.rectangles[best.rectangle];
        rectangle.grow_to_include(best.point, &mut self.registry, policy)?;
        tracing::debug!(
            rectangle = best.rectangle,
            point = %best.point,
            cost = best.cost,
            dx = rectangle.dx(),
            dy = rectangle.dy(),
            "Grew rectangle"
        );

        Ok(Some(Step::Grew {
            rectangle: best.rectangle,
            point: best.point,
            cost: best.cost,
        }))
    }

    /// Step until every point is assigned.
    pub fn run(&mut self) -> Result<(), Error> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Result of the run so far. Points still remaining appear in no region.
    pub fn into_coverage(self) -> Coverage {
        Coverage {
            border: self.config.border,
            regions: self.rectangles.iter().map(Region::from).collect(),
        }
    }

    fn spawn(&mut self) -> Result<Step, Defect> {
        let point = self
            .registry
            .find_central_remaining_point(self.config.parallel)?;
        let rect = Rectangle::centered_on(
            point,
            &mut self.registry,
            self.config.border,
            self.config.extent_policy,
        )?;

        let rectangle = self.rectangles.len();
        tracing::debug!(
            rectangle,
            point = %point,
            x0 = rect.x0(),
            y0 = rect.y0(),
            side = rect.dx(),
            "Spawned rectangle"
        );
        self.rectangles.push(rect);

        Ok(Step::Spawned { rectangle, point })
    }
}

/// Group `sources` into rectangles. The main entry point.
///
/// Sources are identified by their position in the input. Empty input gives
/// an empty coverage. Panics if `config` is invalid, see [`Config::validate`].
pub fn find_efficient_coverage<I>(sources: I, config: Config) -> Result<Coverage, Error>
where
    I: IntoIterator,
    I::Item: Into<Source>,
{
    let mut clustering = Clustering::with_sources(config, sources)?;
    let source_count = clustering.registry().len();
    if source_count == 0 {
        tracing::debug!("No sources to cover");
        return Ok(clustering.into_coverage());
    }

    tracing::info!(
        source_count,
        border = config.border,
        extent_policy = ?config.extent_policy,
        parallel = config.parallel,
        "Starting source grouping"
    );

    clustering.run()?;
    let coverage = clustering.into_coverage();

    tracing::info!(
        region_count = coverage.len(),
        total_area = coverage.total_area(),
        "Source grouping finished"
    );
    Ok(coverage)
}

// ============================================================================
// Output
// ============================================================================

/// One rectangle of the result: the sky region to request and who shares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub bounds: Bounds,
    /// Input indices of the owned sources, in assignment order.
    pub members: Vec<usize>,
}

impl Region {
    pub fn center(&self) -> DVec2 {
        self.bounds.center()
    }

    pub fn area(&self) -> f64 {
        self.bounds.area()
    }
}

impl From<&Rectangle> for Region {
    fn from(rectangle: &Rectangle) -> Self {
        Self {
            bounds: rectangle.bounds(),
            members: rectangle.points().iter().map(|id| id.index()).collect(),
        }
    }
}

/// The regions covering a catalog, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub border: f64,
    pub regions: Vec<Region>,
}

impl Coverage {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn total_area(&self) -> f64 {
        self.regions.iter().map(Region::area).sum()
    }

    /// Number of sources assigned to some region.
    pub fn member_count(&self) -> usize {
        self.regions.iter().map(|region| region.members.len()).sum()
    }

    /// Index of the region owning source `index`.
    pub fn region_of(&self, index: usize) -> Option<usize> {
        self.regions
            .iter()
            .position(|region| region.members.contains(&index))
    }

    /// Pretty JSON, as persisted next to the download plan.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
