use serde::{Deserialize, Serialize};

/// Inclusive integer box. `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: (i32, i32, i32),
    pub max: (i32, i32, i32),
}

impl BoundingBox {
    pub fn new(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Self {
        BoundingBox {
            min: (p1.0.min(p2.0), p1.1.min(p2.1), p1.2.min(p2.2)),
            max: (p1.0.max(p2.0), p1.1.max(p2.1), p1.2.max(p2.2)),
        }
    }

    pub fn from_position_and_size(position: (i32, i32, i32), size: (i32, i32, i32)) -> Self {
        BoundingBox::new(
            position,
            (
                position.0 + size.0 - 1,
                position.1 + size.1 - 1,
                position.2 + size.2 - 1,
            ),
        )
    }

    pub fn get_dimensions(&self) -> (i32, i32, i32) {
        (
            self.max.0 - self.min.0 + 1,
            self.max.1 - self.min.1 + 1,
            self.max.2 - self.min.2 + 1,
        )
    }

    /// Voxel count as `u64`; large selections overflow `i32`.
    pub fn volume(&self) -> u64 {
        let (w, h, l) = self.get_dimensions();
        w as u64 * h as u64 * l as u64
    }

    pub fn contains(&self, pos: (i32, i32, i32)) -> bool {
        pos.0 >= self.min.0
            && pos.0 <= self.max.0
            && pos.1 >= self.min.1
            && pos.1 <= self.max.1
            && pos.2 >= self.min.2
            && pos.2 <= self.max.2
    }

    /// Integer centre, rounded towards the minimum corner.
    pub fn center(&self) -> (i32, i32, i32) {
        (
            self.min.0 + (self.max.0 - self.min.0) / 2,
            self.min.1 + (self.max.1 - self.min.1) / 2,
            self.min.2 + (self.max.2 - self.min.2) / 2,
        )
    }

    pub fn relative(&self, pos: (i32, i32, i32)) -> (i32, i32, i32) {
        (pos.0 - self.min.0, pos.1 - self.min.1, pos.2 - self.min.2)
    }

    /// Visits every voxel with Y outermost, then Z, then X.
    pub fn for_each_position<F>(&self, mut f: F)
    where
        F: FnMut((i32, i32, i32)),
    {
        for y in self.min.1..=self.max.1 {
            for z in self.min.2..=self.max.2 {
                for x in self.min.0..=self.max.0 {
                    f((x, y, z));
                }
            }
        }
    }
}
