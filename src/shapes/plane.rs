use super::{normalize, Cuboid, Shape};

/// A single horizontal layer. Spans with differing Y bounds cover nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    pub span: Cuboid,
}

impl Plane {
    pub fn new(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Self {
        let (min, max) = normalize(p1, p2);
        Self {
            span: Cuboid { min, max },
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.span.min.1 == self.span.max.1
    }
}

impl Shape for Plane {
    fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        self.is_horizontal() && self.span.contains(x, y, z)
    }

    fn bounds(&self) -> (i32, i32, i32, i32, i32, i32) {
        self.span.bounds()
    }

    fn volume(&self) -> u64 {
        if self.is_horizontal() {
            self.span.volume()
        } else {
            0
        }
    }

    fn for_each_point<F>(&self, f: F)
    where
        F: FnMut(i32, i32, i32),
    {
        if self.is_horizontal() {
            self.span.for_each_point(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_plane_is_empty() {
        assert_eq!(Plane::new((0, 0, 0), (3, 1, 3)).points().len(), 0);
        assert_eq!(Plane::new((0, 5, 0), (3, 5, 3)).points().len(), 16);
    }
}
