use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Square {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half && (point.y - self.center.y).abs() <= self.half
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half + other.half;
        let dx = ((self.center.x - other.center.x).abs() - reach).max(0.0);
        let dy = ((self.center.y - other.center.y).abs() - reach).max(0.0);
        dx * dx + dy * dy
    }

    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half * 0.5;
        let dx = if quadrant & 1 == 0 { -quarter } else { quarter };
        let dy = if quadrant & 2 == 0 { -quarter } else { quarter };
        Self {
            center: self.center + vec2(dx, dy),
            half: quarter,
        }
    }
}

/// Barnes-Hut cell. Leaves keep their member indices; inner cells keep only
/// the aggregate centroid, weight and largest member radius.
pub(super) struct Quad {
    pub(super) square: Square,
    pub(super) centroid: Vec2,
    pub(super) weight: f32,
    pub(super) max_radius: f32,
    pub(super) members: Vec<usize>,
    pub(super) children: [Option<Box<Quad>>; 4],
}

impl Quad {
    pub(super) fn build(positions: &[Vec2], radii: &[f32]) -> Option<Self> {
        let square = Square::enclosing(positions)?;
        let members = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::subdivide(square, members, positions, radii, 0))
    }

    fn subdivide(
        square: Square,
        members: Vec<usize>,
        positions: &[Vec2],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let weight = members.len() as f32;
        let mut centroid = Vec2::ZERO;
        let mut max_radius = 0.0_f32;
        for &index in &members {
            centroid += positions[index];
            max_radius = max_radius.max(radii.get(index).copied().unwrap_or(0.0));
        }
        if weight > 0.0 {
            centroid /= weight;
        }

        let mut quad = Self {
            square,
            centroid,
            weight,
            max_radius,
            members,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || quad.members.len() <= LEAF_CAPACITY {
            return quad;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &quad.members {
            buckets[square.quadrant_of(positions[index])].push(index);
        }

        // Coincident points would otherwise recurse to MAX_DEPTH for nothing.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return quad;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                quad.children[quadrant] = Some(Box::new(Self::subdivide(
                    square.child(quadrant),
                    bucket,
                    positions,
                    radii,
                    depth + 1,
                )));
            }
        }
        quad.members.clear();
        quad
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &Quad> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}
