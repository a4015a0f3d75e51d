use super::{normalize, Shape};

/// An axis-aligned run. The walked axis is the first of X, Y, Z whose bounds
/// differ; the other two coordinates stay at the start corner. A line whose
/// start and end coincide covers that one voxel, so its block count and its
/// placement agree with every other inclusive span kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub start: (i32, i32, i32),
    pub end: (i32, i32, i32),
}

impl Line {
    pub fn new(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Self {
        let (start, end) = normalize(p1, p2);
        Self { start, end }
    }

    fn axis(&self) -> usize {
        if self.start.0 != self.end.0 {
            0
        } else if self.start.1 != self.end.1 {
            1
        } else {
            2
        }
    }
}

impl Shape for Line {
    fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        let (s, e) = (self.start, self.end);
        match self.axis() {
            0 => y == s.1 && z == s.2 && x >= s.0 && x <= e.0,
            1 => x == s.0 && z == s.2 && y >= s.1 && y <= e.1,
            _ => x == s.0 && y == s.1 && z >= s.2 && z <= e.2,
        }
    }

    fn bounds(&self) -> (i32, i32, i32, i32, i32, i32) {
        let (s, e) = (self.start, self.end);
        match self.axis() {
            0 => (s.0, s.1, s.2, e.0, s.1, s.2),
            1 => (s.0, s.1, s.2, s.0, e.1, s.2),
            _ => (s.0, s.1, s.2, s.0, s.1, e.2),
        }
    }

    fn volume(&self) -> u64 {
        let (s, e) = (self.start, self.end);
        let length = match self.axis() {
            0 => e.0 - s.0,
            1 => e.1 - s.1,
            _ => e.2 - s.2,
        };
        length as u64 + 1
    }

    fn for_each_point<F>(&self, mut f: F)
    where
        F: FnMut(i32, i32, i32),
    {
        let (s, e) = (self.start, self.end);
        match self.axis() {
            0 => (s.0..=e.0).for_each(|x| f(x, s.1, s.2)),
            1 => (s.1..=e.1).for_each(|y| f(s.0, y, s.2)),
            _ => (s.2..=e.2).for_each(|z| f(s.0, s.1, z)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walks_first_differing_axis() {
        let line = Line::new((0, 0, 0), (3, 2, 0));
        assert_eq!(line.points(), vec![(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0)]);

        let vertical = Line::new((1, 0, 1), (1, 2, 1));
        assert_eq!(vertical.points().len(), 3);
        assert!(vertical.contains(1, 2, 1));

        let point = Line::new((4, 4, 4), (4, 4, 4));
        assert_eq!(point.points(), vec![(4, 4, 4)]);
    }
}
