//! Concentric-ring layout of the concept graph, plus the camera transform and
//! hit testing used to interact with it.
//!
//! World coordinates put the graph centre at the origin. Tier 1 sits at the
//! centre, every further tier on its own ring.

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;

use perspectra_common::{ConceptEdge, StudentConceptNode};
use serde::{Deserialize, Serialize};

use crate::catalog::tier_label;

/// Ring radius per tier, indexed by tier.
pub const TIER_RADII: [f64; 6] = [0.0, 0.0, 200.0, 360.0, 510.0, 650.0];
/// Gap left between an edge and the dependent node for the arrowhead.
pub const ARROW_GAP: f64 = 6.0;
pub const ARROW_SIZE: f64 = 8.0;

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 5.0;
pub const WHEEL_ZOOM_IN: f64 = 1.12;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const BUTTON_ZOOM: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub fn tier_radius(tier: u8) -> f64 {
    TIER_RADII
        .get(usize::from(tier))
        .copied()
        .unwrap_or(f64::from(tier) * 160.0)
}

pub fn node_radius(tier: u8) -> f64 {
    (34.0 - 3.0 * (f64::from(tier) - 1.0)).max(18.0)
}

/// Place items on their tier's ring in input order: item `i` of `n` at
/// angle `i/n·2π − π/2`, so the first item of each ring is at the top.
pub fn ring_positions<'a, I>(items: I) -> HashMap<&'a str, Point>
where
    I: IntoIterator<Item = (&'a str, u8)>,
{
    let mut by_tier: BTreeMap<u8, Vec<&'a str>> = BTreeMap::new();
    for (id, tier) in items {
        by_tier.entry(tier).or_default().push(id);
    }

    let mut positions = HashMap::new();
    for (tier, ids) in by_tier {
        let r = tier_radius(tier);
        let n = ids.len() as f64;
        for (i, id) in ids.into_iter().enumerate() {
            let angle = (i as f64 / n) * 2.0 * PI - PI / 2.0;
            positions.insert(id, Point::new(angle.cos() * r, angle.sin() * r));
        }
    }
    positions
}

/// A drawable edge from prerequisite to dependent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSegment {
    pub source: String,
    pub target: String,
    pub start: Point,
    pub end: Point,
    /// Arrowhead triangle: tip, then the two base corners.
    pub arrow: [Point; 3],
}

/// Line from the prerequisite's rim to just short of the dependent's rim.
pub fn edge_segment(prereq: Point, prereq_radius: f64, dependent: Point, dependent_radius: f64) -> (Point, Point) {
    let dx = dependent.x - prereq.x;
    let dy = dependent.y - prereq.y;
    let len = {
        let l = dx.hypot(dy);
        if l == 0.0 { 1.0 } else { l }
    };
    let (ux, uy) = (dx / len, dy / len);
    let start = Point::new(prereq.x + ux * prereq_radius, prereq.y + uy * prereq_radius);
    let end = Point::new(
        dependent.x - ux * (dependent_radius + ARROW_GAP),
        dependent.y - uy * (dependent_radius + ARROW_GAP),
    );
    (start, end)
}

/// Arrowhead at `end`, pointing along `start → end`.
pub fn arrowhead(start: Point, end: Point, size: f64) -> [Point; 3] {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let len = {
        let l = dx.hypot(dy);
        if l == 0.0 { 1.0 } else { l }
    };
    let (ux, uy) = (dx / len, dy / len);
    let (px, py) = (-uy, ux);
    let tip = Point::new(end.x + ux * size * 0.75, end.y + uy * size * 0.75);
    let base = Point::new(end.x - ux * size * 0.25, end.y - uy * size * 0.25);
    let half = size * 0.375;
    [
        tip,
        Point::new(base.x + px * half, base.y + py * half),
        Point::new(base.x - px * half, base.y - py * half),
    ]
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Pan/zoom transform: `screen = world · scale + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

impl Camera {
    /// Origin at the viewport centre, scale 1.
    pub fn centered(width: f64, height: f64) -> Self {
        Self { x: width / 2.0, y: height / 2.0, scale: 1.0 }
    }

    pub fn reset(&mut self, width: f64, height: f64) {
        *self = Self::centered(width, height);
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.x, p.y * self.scale + self.y)
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Zoom by `factor`, keeping the world point under `cursor` fixed on screen.
    pub fn zoom_at(&mut self, cursor: Point, factor: f64) {
        let new_scale = clamp_scale(self.scale * factor);
        let ratio = new_scale / self.scale;
        self.x = cursor.x - (cursor.x - self.x) * ratio;
        self.y = cursor.y - (cursor.y - self.y) * ratio;
        self.scale = new_scale;
    }

    /// Wheel zoom; negative delta zooms in.
    pub fn wheel(&mut self, cursor: Point, delta_y: f64) {
        let factor = if delta_y < 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
        self.zoom_at(cursor, factor);
    }

    /// Button zoom keeps the translation and only rescales.
    pub fn zoom_in(&mut self) {
        self.scale = clamp_scale(self.scale * BUTTON_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.scale = clamp_scale(self.scale / BUTTON_ZOOM);
    }
}

// ── Full layout ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: StudentConceptNode,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierGuide {
    pub tier: u8,
    pub label: String,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLayout {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<EdgeSegment>,
    pub tiers: Vec<TierGuide>,
}

impl GraphLayout {
    /// Lay out annotated nodes. Edges naming an unknown node are skipped.
    pub fn build(nodes: Vec<StudentConceptNode>, edges: &[ConceptEdge]) -> Self {
        let positions = ring_positions(nodes.iter().map(|n| (n.concept.id.as_str(), n.concept.tier)));
        let placed: HashMap<&str, (Point, f64)> = nodes
            .iter()
            .filter_map(|n| {
                let id = n.concept.id.as_str();
                positions.get(id).map(|p| (id, (*p, node_radius(n.concept.tier))))
            })
            .collect();

        let segments = edges
            .iter()
            .filter_map(|e| {
                let (dep, dep_r) = *placed.get(e.source.as_str())?;
                let (pre, pre_r) = *placed.get(e.target.as_str())?;
                let (start, end) = edge_segment(pre, pre_r, dep, dep_r);
                Some(EdgeSegment {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    start,
                    end,
                    arrow: arrowhead(start, end, ARROW_SIZE),
                })
            })
            .collect();

        let mut tiers: Vec<u8> = nodes.iter().map(|n| n.concept.tier).filter(|t| *t > 1).collect();
        tiers.sort_unstable();
        tiers.dedup();
        let tiers = tiers
            .into_iter()
            .map(|tier| TierGuide {
                tier,
                label: tier_label(tier).to_string(),
                radius: tier_radius(tier),
            })
            .collect();

        let points: Vec<Point> = nodes
            .iter()
            .map(|n| positions.get(n.concept.id.as_str()).copied().unwrap_or_default())
            .collect();

        let nodes = nodes
            .into_iter()
            .zip(points)
            .map(|(node, p)| {
                let radius = node_radius(node.concept.tier);
                PositionedNode { node, x: p.x, y: p.y, radius }
            })
            .collect();

        Self { nodes, edges: segments, tiers }
    }

    /// Topmost node under a screen point; later nodes are drawn on top.
    pub fn hit_test(&self, camera: &Camera, screen: Point) -> Option<&PositionedNode> {
        let world = camera.screen_to_world(screen);
        self.nodes
            .iter()
            .rev()
            .find(|n| world.distance(Point::new(n.x, n.y)) <= n.radius)
    }

    /// Ids of nodes whose name contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.nodes
            .iter()
            .filter(|n| n.node.concept.name.to_lowercase().contains(&q))
            .map(|n| n.node.concept.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ConceptGraph;
    use crate::overlay::student_nodes;
    use perspectra_common::Profile;
    use uuid::Uuid;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_node_radius() {
        assert_eq!(node_radius(1), 34.0);
        assert_eq!(node_radius(5), 22.0);
        assert_eq!(node_radius(9), 18.0);
    }

    #[test]
    fn test_ring_positions() {
        let pos = ring_positions([("a", 2), ("b", 2), ("c", 2), ("d", 2), ("z", 1), ("x", 7)]);
        assert!(close(pos["a"], Point::new(0.0, -200.0)));
        assert!(close(pos["b"], Point::new(200.0, 0.0)));
        assert!(close(pos["c"], Point::new(0.0, 200.0)));
        assert!(close(pos["z"], Point::new(0.0, 0.0)));
        assert!(close(pos["x"], Point::new(0.0, -1120.0)));
    }

    #[test]
    fn test_edge_trimmed_at_both_ends() {
        let (start, end) = edge_segment(Point::new(0.0, 0.0), 30.0, Point::new(100.0, 0.0), 20.0);
        assert!(close(start, Point::new(30.0, 0.0)));
        assert!(close(end, Point::new(74.0, 0.0)));
        let arrow = arrowhead(start, end, ARROW_SIZE);
        assert!(arrow[0].x > end.x);
        assert!((arrow[1].y + arrow[2].y).abs() < EPS);
    }

    #[test]
    fn test_coincident_nodes_do_not_produce_nan() {
        let (start, end) = edge_segment(Point::default(), 34.0, Point::default(), 34.0);
        assert!(start.x.is_finite() && end.x.is_finite());
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut cam = Camera::centered(800.0, 600.0);
        let cursor = Point::new(123.0, 456.0);
        let before = cam.screen_to_world(cursor);
        cam.wheel(cursor, -1.0);
        assert!((cam.scale - 1.12).abs() < EPS);
        assert!(close(cam.screen_to_world(cursor), before));
    }

    #[test]
    fn test_scale_clamped() {
        let mut cam = Camera::default();
        for _ in 0..50 {
            cam.zoom_in();
        }
        assert_eq!(cam.scale, MAX_SCALE);
        for _ in 0..100 {
            cam.wheel(Point::default(), 1.0);
        }
        assert_eq!(cam.scale, MIN_SCALE);
        cam.reset(100.0, 50.0);
        assert_eq!(cam, Camera { x: 50.0, y: 25.0, scale: 1.0 });
    }

    #[test]
    fn test_world_screen_round_trip() {
        let mut cam = Camera::centered(1000.0, 800.0);
        cam.zoom_at(Point::new(10.0, 10.0), 2.0);
        cam.pan_by(-30.0, 12.5);
        let p = Point::new(-250.0, 77.0);
        assert!(close(cam.screen_to_world(cam.world_to_screen(p)), p));
    }

    #[test]
    fn test_builtin_layout_and_hit_test() {
        let g = ConceptGraph::builtin().unwrap();
        let nodes = student_nodes(&g, &Profile::new(Uuid::new_v4()));
        let layout = GraphLayout::build(nodes, g.edges());
        assert_eq!(layout.nodes.len(), 30);
        assert_eq!(layout.edges.len(), 42);
        assert_eq!(layout.tiers.iter().map(|t| t.tier).collect::<Vec<_>>(), vec![2, 3, 4, 5]);

        // c06 is the first tier-2 node: top of the 200px ring.
        let cam = Camera::centered(800.0, 800.0);
        let hit = layout.hit_test(&cam, Point::new(400.0, 200.0)).unwrap();
        assert_eq!(hit.node.concept.id, "c06");

        // Tier 1 stacks at the centre; the last drawn wins.
        let centre = layout.hit_test(&cam, Point::new(400.0, 400.0)).unwrap();
        assert_eq!(centre.node.concept.id, "c05");

        assert!(layout.hit_test(&cam, Point::new(5.0, 5.0)).is_none());
        assert_eq!(layout.search("SORT"), vec!["c16", "c27"]);
    }

    #[test]
    fn test_layout_keeps_each_node_on_its_ring_slot() {
        let g = ConceptGraph::builtin().unwrap();
        let nodes = student_nodes(&g, &Profile::new(Uuid::new_v4()));
        let expected: HashMap<String, Point> = ring_positions(nodes.iter().map(|n| (n.concept.id.as_str(), n.concept.tier)))
            .into_iter()
            .map(|(id, p)| (id.to_string(), p))
            .collect();

        let layout = GraphLayout::build(nodes, g.edges());
        for placed in &layout.nodes {
            let want = expected[&placed.node.concept.id];
            assert!(close(Point::new(placed.x, placed.y), want), "{}", placed.node.concept.id);
            assert_eq!(placed.radius, node_radius(placed.node.concept.tier));
        }
    }
}
