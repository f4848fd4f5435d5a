//! Source points and the per-run registry of unassigned points.
//!
//! The registry owns every point of one clustering run and the ordered subset
//! still waiting for a rectangle. Remaining order is registration order, and
//! every search over it breaks ties toward the earlier point.

use std::fmt;

use glam::DVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ExtentPolicy;
use crate::error::{Defect, InvalidInput};
use crate::geometry::Footprint;
use crate::math::argmin;


/// Handle of a point inside one [`PointRegistry`]: its registration index.
#[derive(Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PointId(usize);

impl PointId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A catalog source: fixed position plus a non-negative extent (half-size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    position: DVec2,
    extent: f64,
}

impl Point {
    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.position
    }

    #[inline]
    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.position.distance(other.position)
    }

    /// What has to fit inside a rectangle's core for this point.
    pub fn footprint(&self, policy: ExtentPolicy) -> Footprint {
        match policy {
            ExtentPolicy::Ignore => Footprint::point(self.position),
            ExtentPolicy::Contain => Footprint::new(self.position, self.extent),
        }
    }
}

/// Every point of one clustering run plus the ordered set of unassigned ones.
#[derive(Debug, Clone, Default)]
pub struct PointRegistry {
    points: Vec<Point>,
    remaining: Vec<PointId>,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point to the full set and to the end of the remaining set.
    ///
    /// A negative `extent` is replaced by its absolute value (logged at warn level);
    /// non-finite coordinates or extent are rejected.
    pub fn register(&mut self, x: f64, y: f64, extent: f64) -> Result<PointId, InvalidInput> {
        let index = self.points.len();
        if !x.is_finite() || !y.is_finite() {
            return Err(InvalidInput::NonFinitePosition { index, x, y });
        }
        let extent = sanitize_extent(index, extent)?;

        let id = PointId(index);
        self.points.push(Point {
            position: DVec2::new(x, y),
            extent,
        });
        self.remaining.push(id);
        Ok(id)
    }

    pub fn get(&self, id: PointId) -> Result<&Point, Defect> {
        self.points.get(id.0).ok_or(Defect::UnknownPoint(id))
    }

    pub fn footprint(&self, id: PointId, policy: ExtentPolicy) -> Result<Footprint, Defect> {
        Ok(self.get(id)?.footprint(policy))
    }

    /// Change the extent of a point that has not been assigned yet.
    ///
    /// Same sanitization as [`register`](Self::register). Assigned points are
    /// frozen because their rectangle was sized for the old extent.
    pub fn set_extent(&mut self, id: PointId, extent: f64) -> Result<(), crate::Error> {
        if !self.is_remaining(id) {
            self.get(id)?;
            return Err(Defect::NotRemaining(id).into());
        }
        let extent = sanitize_extent(id.0, extent)?;
        self.points[id.0].extent = extent;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PointId, &Point)> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, point)| (PointId(index), point))
    }

    /// Unassigned points, in registration order.
    pub fn remaining(&self) -> &[PointId] {
        &self.remaining
    }

    pub fn remaining_len(&self) -> usize {
        self.remaining.len()
    }

    pub fn has_remaining(&self) -> bool {
        !self.remaining.is_empty()
    }

    pub fn is_remaining(&self, id: PointId) -> bool {
        self.remaining.contains(&id)
    }

    /// Mark `id` as assigned. Removing a point twice is a defect.
    pub fn remove_from_remaining(&mut self, id: PointId) -> Result<(), Defect> {
        let position = self
            .remaining
            .iter()
            .position(|&remaining| remaining == id)
            .ok_or(Defect::NotRemaining(id))?;
        self.remaining.remove(position);
        Ok(())
    }

    /// Sum of Euclidean distances from `id` to every remaining point.
    pub fn total_distance_to_remaining(&self, id: PointId) -> Result<f64, Defect> {
        let point = self.get(id)?;
        Ok(self
            .remaining
            .iter()
            .map(|other| point.distance(&self.points[other.0]))
            .sum())
    }

    /// Remaining point with the least total distance to all remaining points.
    ///
    /// O(remaining^2). With `parallel` the per-candidate sums run on the rayon
    /// pool; each sum is still accumulated in remaining order, so the choice is
    /// identical to the sequential one.
    pub fn find_central_remaining_point(&self, parallel: bool) -> Result<PointId, Defect> {
        let totals: Vec<f64> = if parallel {
            self.remaining
                .par_iter()
                .map(|&id| self.total_distance_to_remaining(id))
                .collect::<Result<_, _>>()?
        } else {
            self.remaining
                .iter()
                .map(|&id| self.total_distance_to_remaining(id))
                .collect::<Result<_, _>>()?
        };

        let (index, _) = argmin(totals).ok_or(Defect::NoRemainingPoints)?;
        Ok(self.remaining[index])
    }
}

fn sanitize_extent(index: usize, extent: f64) -> Result<f64, InvalidInput> {
    if !extent.is_finite() {
        return Err(InvalidInput::NonFiniteExtent { index, extent });
    }
    if extent < 0.0 {
        tracing::warn!(
            index,
            extent,
            "Source cannot have negative extent, using its absolute value"
        );
    }
    Ok(extent.abs())
}
