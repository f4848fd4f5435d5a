//! Axis-aligned rectangles that own a growing set of points.

use glam::DVec2;

use crate::config::ExtentPolicy;
use crate::error::Defect;
use crate::geometry::{
    area_increase, directional_deltas, Bounds, CoreBounds, Deltas, Footprint,
    CONTAINMENT_EPSILON,
};
use crate::point::{PointId, PointRegistry};


/// A region of the sky plus the points assigned to it.
///
/// Every owned point lies inside the core bounds, the span shrunk by `border`
/// on each side. Growth only moves edges outward, so once a point is inside
/// it stays inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    bounds: Bounds,
    border: f64,
    points: Vec<PointId>,
}

impl Rectangle {
    /// Empty rectangle. Negative `dx` / `dy` are replaced by their absolute value.
    pub fn new(x0: f64, y0: f64, dx: f64, dy: f64, border: f64) -> Self {
        Self {
            bounds: Bounds::new(x0, y0, dx, dy),
            border,
            points: Vec::new(),
        }
    }

    /// Smallest rectangle around `id`, which it takes from the remaining set.
    ///
    /// The side is `2 * border`, widened by `2 * extent` under
    /// [`ExtentPolicy::Contain`], and the point sits at the exact center.
    pub fn centered_on(
        id: PointId,
        registry: &mut PointRegistry,
        border: f64,
        policy: ExtentPolicy,
    ) -> Result<Self, Defect> {
        let footprint = registry.footprint(id, policy)?;
        registry.remove_from_remaining(id)?;

        Ok(Self {
            bounds: Bounds::centered(footprint.center, border + footprint.half_size),
            border,
            points: vec![id],
        })
    }

    #[inline]
    pub fn x0(&self) -> f64 {
        self.bounds.x0
    }

    #[inline]
    pub fn y0(&self) -> f64 {
        self.bounds.y0
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.bounds.dx
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.bounds.dy
    }

    #[inline]
    pub fn border(&self) -> f64 {
        self.border
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn core_bounds(&self) -> CoreBounds {
        self.bounds.core(self.border)
    }

    pub fn area(&self) -> f64 {
        self.bounds.area()
    }

    pub fn center(&self) -> DVec2 {
        self.bounds.center()
    }

    /// Owned points in assignment order.
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// Whether `footprint` is inside the core bounds, up to rounding of earlier growth.
    pub fn encloses(&self, footprint: Footprint) -> bool {
        self.core_bounds()
            .contains_within(footprint, containment_tolerance(&self.bounds))
    }

    /// Remaining point that is cheapest to absorb, with its [`area_increase`].
    ///
    /// Ties go to the earliest remaining point.
    pub fn find_closest_remaining_point(
        &self,
        registry: &PointRegistry,
        policy: ExtentPolicy,
    ) -> Result<(PointId, f64), Defect> {
        let mut closest: Option<(PointId, f64)> = None;
        for &id in registry.remaining() {
            let cost = area_increase(self, registry.footprint(id, policy)?);
            if closest.is_none_or(|(_, best)| cost < best) {
                closest = Some((id, cost));
            }
        }
        closest.ok_or(Defect::NoRemainingPoints)
    }

    /// Grow just enough to enclose `id`, then take ownership of it.
    ///
    /// Applies exactly the [`directional_deltas`] that [`area_increase`] quotes.
    /// Before committing, every owned point and the new one are checked against
    /// the grown core bounds; a miss is a [`Defect::ContainmentViolated`] and
    /// leaves the rectangle and the registry untouched.
    pub fn grow_to_include(
        &mut self,
        id: PointId,
        registry: &mut PointRegistry,
        policy: ExtentPolicy,
    ) -> Result<Deltas, Defect> {
        if !registry.is_remaining(id) {
            registry.get(id)?;
            return Err(Defect::NotRemaining(id));
        }

        let footprint = registry.footprint(id, policy)?;
        let deltas = directional_deltas(self, footprint);
        let grown = self.bounds.grown(deltas);

        let core = grown.core(self.border);
        let tolerance = containment_tolerance(&grown);
        for &owned in self.points.iter().chain(std::iter::once(&id)) {
            if !core.contains_within(registry.footprint(owned, policy)?, tolerance) {
                return Err(Defect::ContainmentViolated { point: owned });
            }
        }

        registry.remove_from_remaining(id)?;
        self.bounds = grown;
        self.points.push(id);
        Ok(deltas)
    }
}

fn containment_tolerance(bounds: &Bounds) -> f64 {
    CONTAINMENT_EPSILON * (1.0 + bounds.magnitude())
}
