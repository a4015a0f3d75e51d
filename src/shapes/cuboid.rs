use super::{normalize, Shape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cuboid {
    pub min: (i32, i32, i32),
    pub max: (i32, i32, i32),
}

impl Cuboid {
    pub fn new(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Self {
        let (min, max) = normalize(p1, p2);
        Self { min, max }
    }

    pub fn dimensions(&self) -> (i32, i32, i32) {
        (
            self.max.0 - self.min.0 + 1,
            self.max.1 - self.min.1 + 1,
            self.max.2 - self.min.2 + 1,
        )
    }

    /// Voxels on the outer faces of the box.
    pub fn surface_area(&self) -> u64 {
        let (w, h, l) = self.dimensions();
        let inner = (w - 2).max(0) as u64 * (h - 2).max(0) as u64 * (l - 2).max(0) as u64;
        self.volume() - inner
    }
}

impl Shape for Cuboid {
    fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.min.0
            && x <= self.max.0
            && y >= self.min.1
            && y <= self.max.1
            && z >= self.min.2
            && z <= self.max.2
    }

    fn bounds(&self) -> (i32, i32, i32, i32, i32, i32) {
        (
            self.min.0, self.min.1, self.min.2, self.max.0, self.max.1, self.max.2,
        )
    }

    fn volume(&self) -> u64 {
        let (w, h, l) = self.dimensions();
        w as u64 * h as u64 * l as u64
    }

    /// Bottom layer first so supported blocks go down before what rests on them.
    fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(i32, i32, i32),
    {
        for y in self.min.1..=self.max.1 {
            for z in self.min.2..=self.max.2 {
                for x in self.min.0..=self.max.0 {
                    f(x, y, z);
                }
            }
        }
    }
}
