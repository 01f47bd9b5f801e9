//! Axis-aligned hitboxes for overlap testing
//!
//! Hitboxes are ephemeral: recomputed from entity positions every tick,
//! never stored. Coordinates are pixels, y-up (top > bottom), with the
//! origin at the bottom-left of the viewport.

/// An axis-aligned rectangle used for collision tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Hitbox {
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Standard AABB overlap test. Touching edges do not count as overlap.
    #[inline]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.top > other.bottom
            && self.bottom < other.top
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Hitbox::new(0.0, 10.0, 0.0, 10.0);
        let b = Hitbox::new(5.0, 15.0, 5.0, 15.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_disjoint_horizontal() {
        let a = Hitbox::new(0.0, 10.0, 0.0, 10.0);
        let b = Hitbox::new(20.0, 30.0, 0.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_disjoint_vertical() {
        // Player over an obstacle: same x span, cleared vertically
        let player = Hitbox::new(40.0, 94.0, 100.0, 250.0);
        let obstacle = Hitbox::new(50.0, 90.0, 0.0, 90.0);
        assert!(!player.overlaps(&obstacle));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Hitbox::new(0.0, 10.0, 0.0, 10.0);
        let b = Hitbox::new(10.0, 20.0, 0.0, 10.0);
        assert!(!a.overlaps(&b));

        let c = Hitbox::new(0.0, 10.0, 10.0, 20.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Hitbox::new(0.0, 100.0, 0.0, 100.0);
        let inner = Hitbox::new(40.0, 60.0, 40.0, 60.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
