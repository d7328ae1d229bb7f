use vptree::VPTree;

fn abs_diff(a: &f32, b: &f32) -> f32 {
    (a - b).abs()
}

#[test]
fn test_linear() {
    for n in 10..101 {
        let points: Vec<f32> = (0..n+1).map(|x| x as f32 / n as f32).collect();

        let vp = VPTree::from_points(points.clone(), abs_diff);
        assert_eq!(vp.len(), points.len());

        for (i, p) in points.iter().enumerate() {
            // each point should be nearest to itself.
            let nearest = vp.nearest_neighbor(p).unwrap();
            assert_eq!(*nearest.id, i, "\n{}", vp.dump());
            assert_eq!(nearest.distance, 0.0);
        }
    }
}

#[test]
fn test_harmonic() {
    for n in 10..101 {
        let points: Vec<f32> = (1..n+1).map(|x| 1.0 / (x as f32)).collect();

        let vp = VPTree::from_points(points.clone(), abs_diff);

        for (i, p) in points.iter().enumerate() {
            let nearest = vp.nearest_neighbor(p).unwrap();
            assert_eq!(*nearest.id, i, "\n{}", vp.dump());
        }
    }
}

#[test]
fn harmonic_tail_range() {
    let points: Vec<f32> = (1..1001).map(|x| 1.0 / (x as f32)).collect();
    let vp = VPTree::from_points(points.clone(), abs_diff);

    // the crowded tail near zero
    let found = vp.range(&0.0, 0.01).unwrap();
    let expected = points.iter().filter(|&&p| p <= 0.01).count();
    assert_eq!(found.len(), expected);
    assert!(found.keys().all(|&i| points[i] <= 0.01));
}
