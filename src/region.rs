use crate::materials;
use crate::properties::PropertyBag;
use crate::shapes::{Cuboid, Line, Plane, Shape, Shell, SpanShape};
use serde::{Deserialize, Serialize};

/// One uniform-material span. `start <= end` componentwise, local coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanRegion {
    pub start: (i32, i32, i32),
    pub end: (i32, i32, i32),
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

impl SpanRegion {
    pub fn new(
        start: (i32, i32, i32),
        end: (i32, i32, i32),
        material: impl Into<String>,
        properties: Option<PropertyBag>,
    ) -> Self {
        let cuboid = Cuboid::new(start, end);
        SpanRegion {
            start: cuboid.min,
            end: cuboid.max,
            material: material.into(),
            properties: PropertyBag::normalize(properties),
        }
    }
}

/// A single voxel recorded on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    pub pos: (i32, i32, i32),
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyBag>,
}

impl BlockData {
    pub fn new(
        pos: (i32, i32, i32),
        material: impl Into<String>,
        properties: Option<PropertyBag>,
    ) -> Self {
        BlockData {
            pos,
            material: material.into(),
            properties: PropertyBag::normalize(properties),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Fill,
    Hollow,
    Plane,
    Line,
    Individual,
}

impl RegionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RegionKind::Fill => "fill",
            RegionKind::Hollow => "hollow",
            RegionKind::Plane => "plane",
            RegionKind::Line => "line",
            RegionKind::Individual => "individual",
        }
    }
}

/// A compressed description of part of a structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegionDescriptor {
    Fill(SpanRegion),
    Hollow(SpanRegion),
    Plane(SpanRegion),
    Line(SpanRegion),
    Individual { blocks: Vec<BlockData> },
}

impl RegionDescriptor {
    pub fn individual(block: BlockData) -> Self {
        RegionDescriptor::Individual {
            blocks: vec![block],
        }
    }

    pub fn kind(&self) -> RegionKind {
        match self {
            RegionDescriptor::Fill(_) => RegionKind::Fill,
            RegionDescriptor::Hollow(_) => RegionKind::Hollow,
            RegionDescriptor::Plane(_) => RegionKind::Plane,
            RegionDescriptor::Line(_) => RegionKind::Line,
            RegionDescriptor::Individual { .. } => RegionKind::Individual,
        }
    }

    pub fn span(&self) -> Option<&SpanRegion> {
        match self {
            RegionDescriptor::Fill(span)
            | RegionDescriptor::Hollow(span)
            | RegionDescriptor::Plane(span)
            | RegionDescriptor::Line(span) => Some(span),
            RegionDescriptor::Individual { .. } => None,
        }
    }

    pub fn span_mut(&mut self) -> Option<&mut SpanRegion> {
        match self {
            RegionDescriptor::Fill(span)
            | RegionDescriptor::Hollow(span)
            | RegionDescriptor::Plane(span)
            | RegionDescriptor::Line(span) => Some(span),
            RegionDescriptor::Individual { .. } => None,
        }
    }

    /// The voxel set of a span region, `None` for individual regions.
    pub fn shape(&self) -> Option<SpanShape> {
        Some(match self {
            RegionDescriptor::Fill(s) => SpanShape::Cuboid(Cuboid::new(s.start, s.end)),
            RegionDescriptor::Hollow(s) => SpanShape::Shell(Shell::new(s.start, s.end)),
            RegionDescriptor::Plane(s) => SpanShape::Plane(Plane::new(s.start, s.end)),
            RegionDescriptor::Line(s) => SpanShape::Line(Line::new(s.start, s.end)),
            RegionDescriptor::Individual { .. } => return None,
        })
    }

    /// Voxels this region writes when placed.
    pub fn block_count(&self) -> u64 {
        match self {
            RegionDescriptor::Individual { blocks } => blocks.len() as u64,
            _ => self.shape().map_or(0, |shape| shape.volume()),
        }
    }

    /// Visits every voxel as `(local position, material, properties)`.
    pub fn for_each_voxel<F>(&self, mut f: F)
    where
        F: FnMut((i32, i32, i32), &str, Option<&PropertyBag>),
    {
        match self {
            RegionDescriptor::Individual { blocks } => {
                for block in blocks {
                    f(block.pos, &block.material, block.properties.as_ref());
                }
            }
            _ => {
                if let (Some(span), Some(shape)) = (self.span(), self.shape()) {
                    shape.for_each_point(|x, y, z| {
                        f((x, y, z), &span.material, span.properties.as_ref())
                    });
                }
            }
        }
    }

    fn any_material(&self, predicate: impl Fn(&str) -> bool) -> bool {
        match self {
            RegionDescriptor::Individual { blocks } => {
                blocks.iter().any(|block| predicate(&block.material))
            }
            _ => self.span().map_or(false, |span| predicate(&span.material)),
        }
    }

    pub fn is_physics_sensitive(&self) -> bool {
        self.any_material(materials::is_physics_sensitive)
    }

    /// Holds doors or other two-voxel blocks.
    pub fn is_complex(&self) -> bool {
        self.any_material(materials::is_complex)
    }

    pub fn has_multi_facing(&self) -> bool {
        self.any_material(materials::is_multi_facing)
    }
}
