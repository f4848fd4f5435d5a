//! Pure geometry behind the clustering cost model.
//!
//! A rectangle's *core bounds* are its span shrunk by the border margin on
//! every side; every source a rectangle owns must stay inside them. The
//! functions here quote how far a rectangle has to grow to take in one more
//! source ([`directional_deltas`]) and what that growth costs in area
//! ([`area_increase`]). Growth in [`Rectangle::grow_to_include`] applies the
//! very same [`Deltas`], so the quoted cost always matches the applied growth.
//!
//! None of these functions mutate anything.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::rectangle::Rectangle;


/// Relative slack allowed when re-checking containment after growth.
///
/// Growth is computed as `x0 - (x0 + border - x)`, which can land an ulp or
/// two past `x` in floating point.
pub const CONTAINMENT_EPSILON: f64 = 1e-9;

/// Lower-left corner plus width and height of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x0: f64,
    pub y0: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Bounds {
    /// Create bounds, replacing negative sizes by their absolute value.
    pub fn new(x0: f64, y0: f64, dx: f64, dy: f64) -> Self {
        Self {
            x0,
            y0,
            dx: dx.abs(),
            dy: dy.abs(),
        }
    }

    /// Square of side `2 * half_size` centered on `center`.
    pub fn centered(center: DVec2, half_size: f64) -> Self {
        let half_size = half_size.abs();
        Self::new(
            center.x - half_size,
            center.y - half_size,
            2.0 * half_size,
            2.0 * half_size,
        )
    }

    #[inline]
    pub fn x1(&self) -> f64 {
        self.x0 + self.dx
    }

    #[inline]
    pub fn y1(&self) -> f64 {
        self.y0 + self.dy
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.dx * self.dy
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x0 + 0.5 * self.dx, self.y0 + 0.5 * self.dy)
    }

    /// Span shrunk by `border` on every side.
    pub fn core(&self, border: f64) -> CoreBounds {
        CoreBounds {
            xmin: self.x0 + border,
            xmax: self.x0 + self.dx - border,
            ymin: self.y0 + border,
            ymax: self.y0 + self.dy - border,
        }
    }

    /// Bounds after applying `deltas`. Only ever moves edges outward.
    pub fn grown(&self, deltas: Deltas) -> Self {
        Self {
            x0: self.x0 - deltas.left,
            y0: self.y0 - deltas.down,
            dx: self.dx + deltas.span_x(),
            dy: self.dy + deltas.span_y(),
        }
    }

    /// Whether every corner is representable. Growth across most of the `f64`
    /// range can overflow a span to infinity.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite()
            && self.y0.is_finite()
            && self.x1().is_finite()
            && self.y1().is_finite()
    }

    /// Largest coordinate magnitude, used to scale containment tolerances.
    pub(crate) fn magnitude(&self) -> f64 {
        self.x0
            .abs()
            .max(self.y0.abs())
            .max(self.x1().abs())
            .max(self.y1().abs())
    }
}

/// The usable interior of a rectangle: `[xmin, xmax] x [ymin, ymax]`.
///
/// Degenerate (`xmin > xmax` or `ymin > ymax`) when the rectangle is narrower
/// than twice its border; nothing is inside degenerate bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoreBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl CoreBounds {
    pub fn is_degenerate(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    pub fn contains(&self, footprint: Footprint) -> bool {
        self.contains_within(footprint, 0.0)
    }

    /// Like [`contains`](Self::contains) but lets the footprint stick out by `tolerance`.
    pub fn contains_within(&self, footprint: Footprint, tolerance: f64) -> bool {
        let lo = footprint.min();
        let hi = footprint.max();
        self.xmin - tolerance <= lo.x
            && hi.x <= self.xmax + tolerance
            && self.ymin - tolerance <= lo.y
            && hi.y <= self.ymax + tolerance
    }
}

/// The part of a source that has to fit inside a core: a square of
/// half-size `half_size` around `center`. A bare point has `half_size == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center: DVec2,
    pub half_size: f64,
}

impl Footprint {
    pub fn point(center: DVec2) -> Self {
        Self {
            center,
            half_size: 0.0,
        }
    }

    pub fn new(center: DVec2, half_size: f64) -> Self {
        Self {
            center,
            half_size: half_size.abs(),
        }
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        self.center - DVec2::splat(self.half_size)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.center + DVec2::splat(self.half_size)
    }
}

/// How far each edge of a rectangle must move outward to take in a footprint.
///
/// All four amounts are non-negative. For a non-degenerate core and a bare
/// point at most one side per axis is non-zero, and [`x`](Self::x) /
/// [`y`](Self::y) are the signed moves toward the nearer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Deltas {
    pub left: f64,
    pub right: f64,
    pub down: f64,
    pub up: f64,
}

impl Deltas {
    /// Signed x move: negative when the left edge moves out.
    #[inline]
    pub fn x(&self) -> f64 {
        self.right - self.left
    }

    /// Signed y move: negative when the bottom edge moves out.
    #[inline]
    pub fn y(&self) -> f64 {
        self.up - self.down
    }

    /// Total width gained.
    #[inline]
    pub fn span_x(&self) -> f64 {
        self.left + self.right
    }

    /// Total height gained.
    #[inline]
    pub fn span_y(&self) -> f64 {
        self.down + self.up
    }

    pub fn is_zero(&self) -> bool {
        self.span_x() == 0.0 && self.span_y() == 0.0
    }
}

/// Core bounds of `rectangle`.
pub fn core_bounds(rectangle: &Rectangle) -> CoreBounds {
    rectangle.bounds().core(rectangle.border())
}

/// Edge moves required to bring `footprint` inside the core bounds of `rectangle`.
///
/// Zero in every axis where the footprint already fits.
pub fn directional_deltas(rectangle: &Rectangle, footprint: Footprint) -> Deltas {
    let core = core_bounds(rectangle);
    let lo = footprint.min();
    let hi = footprint.max();

    let (left, right) = axis_growth(core.xmin, core.xmax, lo.x, hi.x);
    let (down, up) = axis_growth(core.ymin, core.ymax, lo.y, hi.y);

    Deltas {
        left,
        right,
        down,
        up,
    }
}

/// Area `rectangle` would gain by absorbing `footprint`.
///
/// `|dX| * dy + |dY| * dx + |dX| * |dY|`, i.e. `(dx + |dX|)(dy + |dY|) - dx * dy`.
/// An axis that does not grow contributes nothing. Growth that would overflow
/// the bounds costs `f64::INFINITY`, so the cost is never NaN.
pub fn area_increase(rectangle: &Rectangle, footprint: Footprint) -> f64 {
    let deltas = directional_deltas(rectangle, footprint);
    let bounds = rectangle.bounds();
    if !bounds.grown(deltas).is_finite() {
        return f64::INFINITY;
    }

    let gx = deltas.span_x();
    let gy = deltas.span_y();
    let mut cost = 0.0;
    if gx > 0.0 {
        cost += gx * bounds.dy;
    }
    if gy > 0.0 {
        cost += gy * bounds.dx;
    }
    if gx > 0.0 && gy > 0.0 {
        cost += gx * gy;
    }
    cost
}

/// Outward moves of the `[min, max]` interval needed to cover `[lo, hi]`.
#[inline]
fn axis_growth(min: f64, max: f64, lo: f64, hi: f64) -> (f64, f64) {
    ((min - lo).max(0.0), (hi - max).max(0.0))
}
