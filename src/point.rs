//! Three-dimensional points and the octant classification used to route them.

use core::fmt;

/// A point in three-dimensional space.
///
/// Points order lexicographically by `(x, y, z)`, which only matters for
/// collections keyed by point (such as a pending-insert map); the spatial tree
/// itself routes points with [`Octant::locate`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Point<C> {
    pub x: C,
    pub y: C,
    pub z: C,
}

/// One of the three coordinate axes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes, in the order the balancing passes visit them.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl<C> Point<C> {
    /// Creates a point from its three coordinates.
    #[must_use]
    pub const fn new(x: C, y: C, z: C) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate on `axis`.
    #[inline]
    #[must_use]
    pub const fn coord(&self, axis: Axis) -> &C {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

impl<C> From<(C, C, C)> for Point<C> {
    fn from((x, y, z): (C, C, C)) -> Self {
        Self { x, y, z }
    }
}

impl<C> From<Point<C>> for (C, C, C) {
    fn from(point: Point<C>) -> Self {
        (point.x, point.y, point.z)
    }
}

impl<C: fmt::Display> fmt::Display for Point<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the eight regions of space around a reference point.
///
/// Each axis contributes one bit: `0` when the candidate coordinate is
/// strictly less than the reference coordinate, `1` when it is greater or
/// equal. X is the most significant bit, so octant `0` is "below on every
/// axis" and octant `7` is "at or above on every axis".
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Octant(u8);

impl Octant {
    /// The number of octants around a point.
    pub const COUNT: usize = 8;

    /// Classifies `point` relative to `origin`.
    ///
    /// Ties on an axis go to the "greater or equal" side, so a point equal to
    /// `origin` lands in octant `7`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_tree::{Octant, Point};
    ///
    /// let origin = Point::new(3, 3, 3);
    /// assert_eq!(Octant::locate(&Point::new(1, 5, 2), &origin).index(), 0b010);
    /// assert_eq!(Octant::locate(&Point::new(4, 3, 1), &origin).index(), 0b110);
    /// assert_eq!(Octant::locate(&origin, &origin).index(), 0b111);
    /// ```
    #[inline]
    #[must_use]
    pub fn locate<C: Ord>(point: &Point<C>, origin: &Point<C>) -> Self {
        let bit = |axis: Axis| u8::from(point.coord(axis) >= origin.coord(axis));
        Self((bit(Axis::X) << 2) | (bit(Axis::Y) << 1) | bit(Axis::Z))
    }

    /// Returns the child slot index of this octant, in `0..8`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this octant lies on the "greater or equal" side of `axis`.
    #[must_use]
    pub const fn is_upper(self, axis: Axis) -> bool {
        let shift = match axis {
            Axis::X => 2,
            Axis::Y => 1,
            Axis::Z => 0,
        };
        (self.0 >> shift) & 1 == 1
    }
}
