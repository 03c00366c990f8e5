//! # Placement Engine
//!
//! Greedy, order-dependent scatter. Objects are proposed one at a time;
//! each gets a fixed attempt budget of fresh random positions and is
//! dropped when none of them is free. Nothing placed is ever moved, so
//! earlier passes have priority over later ones.
//!
//! A position is free when the candidate circle:
//! - lies entirely inside the cell,
//! - touches no forbidden band (path corridors),
//! - overlaps no circle already claimed in the cell.

use crate::path::ForbiddenBand;

/// A circle in cell-local space: object center plus placement radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Center X.
    pub x: f64,
    /// Center Z.
    pub z: f64,
    /// Radius.
    pub radius: f64,
}

impl Circle {
    /// Creates a new circle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, z: f64, radius: f64) -> Self {
        Self { x, z, radius }
    }

    /// True when the two circles overlap. Touching is not overlapping.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        let reach = self.radius + other.radius;
        dx * dx + dz * dz < reach * reach
    }

    /// True when the circle lies entirely inside `[-half, half]` on both axes.
    #[inline]
    #[must_use]
    pub fn inside_square(&self, half: f64) -> bool {
        self.x - self.radius >= -half
            && self.x + self.radius <= half
            && self.z - self.radius >= -half
            && self.z + self.radius <= half
    }
}

/// Accept iff `candidate` overlaps none of `existing`.
#[must_use]
pub fn try_place<'a, I>(candidate: &Circle, existing: I) -> bool
where
    I: IntoIterator<Item = &'a Circle>,
{
    existing.into_iter().all(|placed| !candidate.overlaps(placed))
}

/// What a claimed circle stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    /// A drawn object.
    Object,
    /// Bookkeeping marker reserving a flower cluster's center.
    ClusterMarker(u8),
}

/// Claimed space of one cell under construction, shared by every pass.
#[derive(Clone, Debug)]
pub struct Occupancy {
    half_extent: f64,
    bands: Vec<ForbiddenBand>,
    claimed: Vec<(Circle, Occupant)>,
}

impl Occupancy {
    /// Empty occupancy for a cell of `cell_size` with the given path bands.
    #[must_use]
    pub fn new(cell_size: f64, bands: Vec<ForbiddenBand>) -> Self {
        Self {
            half_extent: cell_size * 0.5,
            bands,
            claimed: Vec::with_capacity(64),
        }
    }

    /// Number of claimed circles (objects and markers).
    #[must_use]
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// True when `candidate` may be placed.
    ///
    /// `own_cluster` lets a cluster's members overlap their own marker.
    #[must_use]
    pub fn admits(&self, candidate: &Circle, own_cluster: Option<u8>) -> bool {
        if !candidate.inside_square(self.half_extent) {
            return false;
        }
        if self.bands.iter().any(|band| band.intersects(candidate)) {
            return false;
        }
        let blocking = self
            .claimed
            .iter()
            .filter(|(_, occupant)| {
                !matches!(
                    (occupant, own_cluster),
                    (Occupant::ClusterMarker(id), Some(own)) if *id == own
                )
            })
            .map(|(placed, _)| placed);
        try_place(candidate, blocking)
    }

    /// Records a circle as taken.
    pub fn claim(&mut self, circle: Circle, occupant: Occupant) {
        self.claimed.push((circle, occupant));
    }

    /// Tries up to `budget` proposals and returns the first admitted one,
    /// without claiming it.
    pub fn find<F>(&self, budget: u32, own_cluster: Option<u8>, mut propose: F) -> Option<Circle>
    where
        F: FnMut(u32) -> Circle,
    {
        (0..budget)
            .map(&mut propose)
            .find(|candidate| self.admits(candidate, own_cluster))
    }

    /// Like [`find`](Self::find), but claims the result as an object.
    pub fn place<F>(&mut self, budget: u32, own_cluster: Option<u8>, propose: F) -> Option<Circle>
    where
        F: FnMut(u32) -> Circle,
    {
        let found = self.find(budget, own_cluster, propose)?;
        self.claim(found, Occupant::Object);
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Circle::new(0.0, 0.0, 5.0);
        let touching = Circle::new(10.0, 0.0, 5.0);
        let overlapping = Circle::new(9.9, 0.0, 5.0);
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(try_place(&touching, &[a]));
        assert!(!try_place(&overlapping, &[a]));
    }

    #[test]
    fn test_admits_matches_try_place_on_claimed_circles() {
        let claimed = [Circle::new(-50.0, 0.0, 20.0), Circle::new(60.0, 30.0, 10.0)];
        let mut occupancy = Occupancy::new(400.0, Vec::new());
        for circle in claimed {
            occupancy.claim(circle, Occupant::Object);
        }
        for x in (-150..=150).step_by(15) {
            let candidate = Circle::new(f64::from(x), 20.0, 12.0);
            assert_eq!(occupancy.admits(&candidate, None), try_place(&candidate, &claimed));
        }
    }

    #[test]
    fn test_try_place_empty() {
        assert!(try_place(&Circle::new(1.0, 2.0, 100.0), &[] as &[Circle]));
    }

    #[test]
    fn test_inside_square() {
        assert!(Circle::new(80.0, -80.0, 120.0).inside_square(200.0));
        assert!(!Circle::new(81.0, 0.0, 120.0).inside_square(200.0));
        assert!(!Circle::new(0.0, 0.0, 201.0).inside_square(200.0));
    }

    #[test]
    fn test_occupancy_rejects_bands() {
        let band = ForbiddenBand::new(-10.0, 10.0, -200.0, 10.0);
        let occupancy = Occupancy::new(400.0, vec![band]);
        assert!(!occupancy.admits(&Circle::new(0.0, -100.0, 1.0), None));
        assert!(!occupancy.admits(&Circle::new(14.0, -100.0, 5.0), None));
        assert!(occupancy.admits(&Circle::new(16.0, -100.0, 5.0), None));
    }

    #[test]
    fn test_marker_exempts_own_cluster_only() {
        let mut occupancy = Occupancy::new(400.0, Vec::new());
        occupancy.claim(Circle::new(0.0, 0.0, 30.0), Occupant::ClusterMarker(1));
        let inside = Circle::new(5.0, 5.0, 2.0);
        assert!(occupancy.admits(&inside, Some(1)));
        assert!(!occupancy.admits(&inside, Some(2)));
        assert!(!occupancy.admits(&inside, None));
    }

    #[test]
    fn test_place_uses_first_free_attempt() {
        let mut occupancy = Occupancy::new(400.0, Vec::new());
        occupancy.claim(Circle::new(0.0, 0.0, 50.0), Occupant::Object);

        let mut proposed = Vec::new();
        let placed = occupancy.place(10, None, |attempt| {
            proposed.push(attempt);
            Circle::new(f64::from(attempt) * 20.0, 0.0, 5.0)
        });

        // 0, 20, 40 overlap; 60 is the first clear slot.
        assert_eq!(placed, Some(Circle::new(60.0, 0.0, 5.0)));
        assert_eq!(proposed, vec![0, 1, 2, 3]);
        assert_eq!(occupancy.claimed_count(), 2);
    }

    #[test]
    fn test_place_gives_up_after_budget() {
        let mut occupancy = Occupancy::new(400.0, Vec::new());
        occupancy.claim(Circle::new(0.0, 0.0, 50.0), Occupant::Object);

        let mut calls = 0;
        let placed = occupancy.place(7, None, |_| {
            calls += 1;
            Circle::new(0.0, 0.0, 5.0)
        });

        assert_eq!(placed, None);
        assert_eq!(calls, 7);
        assert_eq!(occupancy.claimed_count(), 1);
    }
}
