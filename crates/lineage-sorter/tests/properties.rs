//! Sampled properties that must hold for every strategy.

use std::cmp::Ordering;
use std::sync::Arc;

use lineage_sorter::{
    decision_of, order_siblings, Decision, DescendantsSorter, FixedSpot, FullFrameSorter,
    Landmarks, Point3D, PolesSorter, SlicedSorter, Sorter, StrategyKind, Thresholds, TraceEvent,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLES: usize = 2_000;

fn sorters() -> Vec<Box<dyn DescendantsSorter>> {
    vec![
        Box::new(FullFrameSorter::new(
            Point3D::new(0.0, 0.0, 5.0),
            Point3D::new(0.0, 0.0, -5.0),
            Point3D::new(4.0, 1.0, 0.0),
        )),
        Box::new(SlicedSorter::new(
            Point3D::new(1.0, -2.0, -5.0),
            Point3D::new(-1.0, 2.0, 6.0),
        )),
        Box::new(PolesSorter::new(
            Point3D::new(2.0, 2.0, 0.0),
            Point3D::new(1.0, -2.0, -5.0),
            Point3D::new(-1.0, 2.0, 6.0),
        )),
    ]
}

fn random_point(rng: &mut StdRng) -> Point3D {
    Point3D::new(
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
    )
}

fn random_pair(rng: &mut StdRng) -> (FixedSpot, FixedSpot) {
    (
        FixedSpot::new(1, "d1", random_point(rng)),
        FixedSpot::new(2, "d2", random_point(rng)),
    )
}

fn traced(sorter: &dyn DescendantsSorter, d1: &FixedSpot, d2: &FixedSpot) -> (Ordering, Decision) {
    let mut events: Vec<TraceEvent> = Vec::new();
    let outcome = sorter.compare_traced(d1, d2, &mut events);
    let decision = decision_of(&events).expect("every comparison ends with a decision");
    (outcome, decision)
}

#[test]
fn self_comparison_is_equal() {
    let mut rng = StdRng::seed_from_u64(1);
    for sorter in sorters() {
        for _ in 0..200 {
            let d = FixedSpot::new(7, "d", random_point(&mut rng));
            assert_eq!(sorter.compare(&d, &d), Ordering::Equal);
            assert_eq!(sorter.compare_verbose(&d, &d), Ordering::Equal);
        }
    }
}

#[test]
fn verbose_comparator_matches_plain() {
    let mut rng = StdRng::seed_from_u64(2);
    for sorter in sorters() {
        for _ in 0..SAMPLES {
            let (d1, d2) = random_pair(&mut rng);
            let plain = sorter.compare(&d1, &d2);
            assert_eq!(sorter.compare_verbose(&d1, &d2), plain);
            assert_eq!(traced(sorter.as_ref(), &d1, &d2).0, plain);
        }
    }
}

#[test]
fn side_by_side_decisions_are_antisymmetric() {
    let mut rng = StdRng::seed_from_u64(3);
    for sorter in sorters() {
        let mut checked = 0;
        for _ in 0..SAMPLES {
            let (d1, d2) = random_pair(&mut rng);
            let (forward, forward_by) = traced(sorter.as_ref(), &d1, &d2);
            let (backward, backward_by) = traced(sorter.as_ref(), &d2, &d1);
            if forward_by.is_side_by_side() && backward_by.is_side_by_side() {
                assert_eq!(forward, backward.reverse(), "{:?} vs {:?}", d1.position, d2.position);
                checked += 1;
            }
        }
        assert!(checked > SAMPLES / 4, "{} only checked {checked} pairs", sorter.strategy());
    }
}

#[test]
fn layering_is_antisymmetric_when_mutual() {
    // d2 nearer in one order must read as d1 nearer in the other
    let mut rng = StdRng::seed_from_u64(4);
    for sorter in sorters() {
        for _ in 0..SAMPLES {
            let (d1, d2) = random_pair(&mut rng);
            let (forward, forward_by) = traced(sorter.as_ref(), &d1, &d2);
            let (backward, backward_by) = traced(sorter.as_ref(), &d2, &d1);
            let mutual = matches!(
                (forward_by, backward_by),
                (Decision::InnerLayer, Decision::OuterLayer) | (Decision::OuterLayer, Decision::InnerLayer)
            );
            if mutual {
                assert_eq!(forward, backward.reverse());
            }
        }
    }
}

#[test]
fn d2_at_query_centre_is_inner() {
    let full = FullFrameSorter::new(
        Point3D::new(0.0, 0.0, 5.0),
        Point3D::new(0.0, 0.0, -5.0),
        Point3D::new(4.0, 1.0, 0.0),
    );
    let d1 = FixedSpot::new(1, "d1", Point3D::new(3.0, -1.0, 2.0));
    let d2 = FixedSpot::new(2, "d2", full.frame().centre());
    assert_eq!(full.compare(&d1, &d2), Ordering::Greater);
    assert_eq!(full.compare(&d2, &d1), Ordering::Less);

    let sliced = SlicedSorter::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(0.0, 0.0, 10.0));
    let poles = PolesSorter::new(
        Point3D::new(0.0, 0.0, 3.0),
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(0.0, 0.0, 10.0),
    );
    for sorter in [&sliced as &dyn DescendantsSorter, &poles] {
        let d1 = FixedSpot::new(1, "d1", Point3D::new(-4.0, 2.0, 7.0));
        let d2 = FixedSpot::new(2, "d2", Point3D::new(0.0, 0.0, 7.0));
        assert_eq!(sorter.compare(&d1, &d2), Ordering::Greater);
        assert_eq!(sorter.compare(&d2, &d1), Ordering::Less);
    }
}

#[test]
fn raising_lower_cutoff_never_grows_side_by_side_set() {
    let landmarks = Landmarks {
        north: Some(Point3D::new(0.0, 0.0, 5.0)),
        south: Some(Point3D::new(0.0, 0.0, -5.0)),
        east: Some(Point3D::new(4.0, 1.0, 0.0)),
        centre: Some(Point3D::new(1.0, 1.0, 0.0)),
    };
    let cutoffs = [5.0, 15.0, 30.0, 45.0];

    let mut rng = StdRng::seed_from_u64(5);
    for kind in StrategyKind::ALL {
        let sorters: Vec<Sorter> = cutoffs
            .iter()
            .map(|&lower| {
                let t = kind.default_thresholds().with_layering(lower, 160.0).unwrap();
                Sorter::from_landmarks(kind, &landmarks, Some(t)).unwrap()
            })
            .collect();

        let mut side_by_side = vec![0usize; cutoffs.len()];
        for _ in 0..SAMPLES {
            let (d1, d2) = random_pair(&mut rng);
            let decisions: Vec<Decision> = sorters.iter().map(|s| traced(s, &d1, &d2).1).collect();
            for pair in decisions.windows(2) {
                if pair[1].is_side_by_side() {
                    assert!(pair[0].is_side_by_side(), "{kind}: {pair:?}");
                }
                if pair[0] == Decision::InnerLayer {
                    assert_eq!(pair[1], Decision::InnerLayer, "{kind}");
                }
            }
            for (count, decision) in side_by_side.iter_mut().zip(&decisions) {
                if decision.is_side_by_side() {
                    *count += 1;
                }
            }
        }
        assert!(side_by_side.windows(2).all(|w| w[0] >= w[1]), "{kind}: {side_by_side:?}");
        assert!(side_by_side[0] > side_by_side[cutoffs.len() - 1], "{kind}: {side_by_side:?}");
    }
}

#[test]
fn thresholds_are_read_at_each_comparison() {
    let d1 = FixedSpot::new(1, "d1", Point3D::new(1.0, 0.0, 1.0));
    let d2 = FixedSpot::new(2, "d2", Point3D::new(1.0, 0.0, -1.0));
    let north = Point3D::new(0.0, 0.0, 1.0);
    let south = Point3D::new(0.0, 0.0, -1.0);
    let east = Point3D::new(1.0, 0.0, 0.0);

    let strict = FullFrameSorter::new(north, south, east);
    let loose = strict
        .clone()
        .with_thresholds(Thresholds::FULL_FRAME.with_layering(60.0, 160.0).unwrap());
    assert_eq!(traced(&strict, &d1, &d2).1, Decision::BestAxis);
    assert_eq!(traced(&loose, &d1, &d2).1, Decision::InnerLayer);
}

#[test]
fn sorter_is_shared_across_threads() {
    let sorter: Arc<dyn DescendantsSorter> = Arc::new(SlicedSorter::new(
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(0.0, 0.0, 10.0),
    ));
    let mut rng = StdRng::seed_from_u64(6);
    let pairs: Vec<(FixedSpot, FixedSpot)> = (0..400).map(|_| random_pair(&mut rng)).collect();
    let expected: Vec<Ordering> = pairs.iter().map(|(a, b)| sorter.compare(a, b)).collect();

    std::thread::scope(|scope| {
        for chunk in pairs.chunks(100).zip(expected.chunks(100)) {
            let sorter = Arc::clone(&sorter);
            scope.spawn(move || {
                for ((a, b), want) in chunk.0.iter().zip(chunk.1) {
                    assert_eq!(sorter.compare(a, b), *want);
                }
            });
        }
    });
}

#[test]
fn order_siblings_follows_comparator() {
    let sorter = SlicedSorter::new(Point3D::new(0.0, 0.0, 0.0), Point3D::new(0.0, 0.0, 10.0));
    let lower = FixedSpot::new(1, "lower", Point3D::new(0.0, 5.0, 0.0));
    let upper = FixedSpot::new(2, "upper", Point3D::new(0.0, 5.0, 5.0));

    let mut siblings = vec![upper.clone(), lower.clone()];
    order_siblings(&sorter, &mut siblings);
    assert_eq!(siblings, vec![lower, upper]);
}
