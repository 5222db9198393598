//! Circle-circle proximity tests
//!
//! Every body in the scene is a circle. Tests compare the squared distance
//! between centres against the squared radius sum, so no square root is
//! taken. Overlap is strict: circles that exactly touch do not collide.
//!
//! There is no spatial partitioning. Queries against the population are
//! pairwise, O(N²) per frame, which is fine for tens to low hundreds of NPCs.

use glam::Vec2;

use crate::distance_squared;

/// A collision body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        overlaps(self, other)
    }
}

/// `(ra + rb)² > dx² + dy²`
#[inline]
pub fn overlaps(a: &Circle, b: &Circle) -> bool {
    let sum = a.radius + b.radius;
    sum * sum > distance_squared(a.center, b.center)
}

/// True if `body` overlaps any of `others`
pub fn any_overlapping<I>(body: &Circle, others: I) -> bool
where
    I: IntoIterator<Item = Circle>,
{
    others.into_iter().any(|other| overlaps(body, &other))
}
