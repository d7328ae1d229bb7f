use vptree::{Metric, VPTree};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f32,
    y: f32
}
impl Point {
    fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

struct Euclidean;

impl Metric<Point, f32> for Euclidean {
    fn distance(&self, p: &Point, q: &Point) -> f32 {
        let dx = p.x - q.x;
        let dy = p.y - q.y;
        (dx*dx + dy*dy).sqrt()
    }
}

#[test]
fn point_check() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);

    assert_eq!(Euclidean.distance(&a, &b), 1.0);
}

fn lattice_points(n: usize) -> Vec<Point> {
    (0..n).flat_map( |i| {
        (0..n).map(move |j| {
            Point::new(i as f32, j as f32)
        })
    }).collect()
}

#[test]
fn lattice_vpn() {
    let points: Vec<Point> = lattice_points(20);

    let tree = VPTree::from_points(points, Euclidean);

    let ps = tree.nearest_neighbors(&Point::new(4.46, 4.4), 4).unwrap();
    assert_eq!(ps.len(), 4);
    assert_eq!(*ps[0].point, Point::new(4.0, 4.0));
    assert_eq!(*ps[1].point, Point::new(5.0, 4.0));
    assert_eq!(*ps[2].point, Point::new(4.0, 5.0));
    assert_eq!(*ps[3].point, Point::new(5.0, 5.0));
}

#[test]
fn lattice_ties_fill_k() {
    let tree = VPTree::from_points(lattice_points(10), Euclidean);

    // four points at distance 1, four more at sqrt(2): k = 6 cuts through a tie
    let found = tree.knn(&Point::new(5.0, 5.0), 6).unwrap();
    assert_eq!(found.len(), 6);
    let mut dists: Vec<f32> = found.values().copied().collect();
    dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(&dists[..5], &[0.0, 1.0, 1.0, 1.0, 1.0]);
    assert_eq!(dists[5], 2.0f32.sqrt());
}

#[test]
fn lattice_range() {
    let tree = VPTree::from_points(lattice_points(20), Euclidean);

    // the 3x3 block around (10, 10)
    let found = tree.range(&Point::new(10.0, 10.0), 1.5).unwrap();
    assert_eq!(found.len(), 9);

    // a corner query only sees the quarter disc
    let (found, stats) = tree.range_with_stats(&Point::new(0.0, 0.0), 2.0).unwrap();
    assert_eq!(found.len(), 6);
    assert!(stats.nodes_visited < 200, "visited {}", stats.nodes_visited);
}
