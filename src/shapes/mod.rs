//! Voxel sets described by a pair of inclusive corners.
//!
//! Region descriptors store only `start`/`end`; these shapes turn them back
//! into the voxels a region covers.

mod cuboid;
mod line;
mod plane;
mod shell;

pub use cuboid::Cuboid;
pub use line::Line;
pub use plane::Plane;
pub use shell::Shell;

pub trait Shape {
    fn contains(&self, x: i32, y: i32, z: i32) -> bool;
    fn bounds(&self) -> (i32, i32, i32, i32, i32, i32);
    /// Number of voxels visited by [`Shape::for_each_point`].
    fn volume(&self) -> u64;
    fn for_each_point<F>(&self, f: F)
    where
        F: FnMut(i32, i32, i32);

    fn points(&self) -> Vec<(i32, i32, i32)> {
        let mut points = Vec::new();
        self.for_each_point(|x, y, z| points.push((x, y, z)));
        points
    }
}

pub(crate) fn normalize(
    p1: (i32, i32, i32),
    p2: (i32, i32, i32),
) -> ((i32, i32, i32), (i32, i32, i32)) {
    (
        (p1.0.min(p2.0), p1.1.min(p2.1), p1.2.min(p2.2)),
        (p1.0.max(p2.0), p1.1.max(p2.1), p1.2.max(p2.2)),
    )
}

macro_rules! delegate_span {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            SpanShape::Cuboid(s) => s.$method($($arg),*),
            SpanShape::Shell(s) => s.$method($($arg),*),
            SpanShape::Plane(s) => s.$method($($arg),*),
            SpanShape::Line(s) => s.$method($($arg),*),
        }
    };
}

/// The shapes a span region can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanShape {
    Cuboid(Cuboid),
    Shell(Shell),
    Plane(Plane),
    Line(Line),
}

impl Shape for SpanShape {
    fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        delegate_span!(self, contains, x, y, z)
    }

    fn bounds(&self) -> (i32, i32, i32, i32, i32, i32) {
        delegate_span!(self, bounds)
    }

    fn volume(&self) -> u64 {
        delegate_span!(self, volume)
    }

    fn for_each_point<F>(&self, f: F)
    where
        F: FnMut(i32, i32, i32),
    {
        delegate_span!(self, for_each_point, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_matches_visited_points() {
        let shapes = vec![
            SpanShape::Cuboid(Cuboid::new((0, 0, 0), (3, 2, 4))),
            SpanShape::Shell(Shell::new((0, 0, 0), (3, 2, 4))),
            SpanShape::Shell(Shell::new((0, 0, 0), (1, 5, 1))),
            SpanShape::Plane(Plane::new((0, 4, 0), (5, 4, 2))),
            SpanShape::Plane(Plane::new((0, 0, 0), (5, 4, 2))),
            SpanShape::Line(Line::new((0, 1, 1), (0, 7, 1))),
        ];
        for shape in shapes {
            let points = shape.points();
            assert_eq!(points.len() as u64, shape.volume(), "{:?}", shape);
            for (x, y, z) in points {
                assert!(shape.contains(x, y, z));
            }
        }
    }
}
