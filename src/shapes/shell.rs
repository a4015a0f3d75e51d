use super::{normalize, Cuboid, Shape};

/// The outer layer of a box: every voxel with at least one coordinate on a bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    pub outer: Cuboid,
}

impl Shell {
    pub fn new(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Self {
        let (min, max) = normalize(p1, p2);
        Self {
            outer: Cuboid { min, max },
        }
    }

    fn on_bound(&self, x: i32, y: i32, z: i32) -> bool {
        let (min, max) = (self.outer.min, self.outer.max);
        x == min.0 || x == max.0 || y == min.1 || y == max.1 || z == min.2 || z == max.2
    }
}

impl Shape for Shell {
    fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        self.outer.contains(x, y, z) && self.on_bound(x, y, z)
    }

    fn bounds(&self) -> (i32, i32, i32, i32, i32, i32) {
        self.outer.bounds()
    }

    fn volume(&self) -> u64 {
        self.outer.surface_area()
    }

    fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(i32, i32, i32),
    {
        self.outer.for_each_point(|x, y, z| {
            if self.on_bound(x, y, z) {
                f(x, y, z);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_skips_interior() {
        let shell = Shell::new((0, 0, 0), (2, 2, 2));
        assert!(!shell.contains(1, 1, 1));
        assert!(shell.contains(1, 1, 0));
        assert!(shell.contains(2, 2, 2));
        assert_eq!(shell.points().len(), 26);
    }
}
