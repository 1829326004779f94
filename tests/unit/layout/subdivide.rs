use super::*;
use crate::rng::{Seed, SeedRng};
use proptest::prelude::*;

struct Fixed(f64);

impl Random for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

fn square() -> Rect {
    Rect::new(0.0, 0.0, 1000.0, 1000.0)
}

#[test]
fn thousand_square_depth_eight_is_bounded() {
    let mut rng = SeedRng::from_seed(&Seed::new("panospace"));
    let cells = subdivide(&mut rng, square(), &SubdivisionParams::default());
    assert!(cells.len() > 1);
    assert!(cells.len() <= 256);
    assert!(cells.iter().all(|c| c.depth <= 8));
}

#[test]
fn cells_stay_inside_bounds_and_do_not_overlap() {
    let mut rng = SeedRng::from_seed(&Seed::new("memphis"));
    let params = SubdivisionParams {
        ratio_jitter: 1.0,
        ..SubdivisionParams::default()
    };
    let cells = subdivide(&mut rng, square(), &params);
    for c in &cells {
        assert!(c.rect.x0 >= 0.0 && c.rect.y0 >= 0.0);
        assert!(c.rect.x1 <= 1000.0 && c.rect.y1 <= 1000.0);
    }
    for (i, a) in cells.iter().enumerate() {
        for b in &cells[i + 1..] {
            let inter = a.rect.intersect(b.rect);
            assert!(inter.width() <= 0.0 || inter.height() <= 0.0);
        }
    }
}

#[test]
fn requested_depth_is_clamped_to_hard_limit() {
    let params = SubdivisionParams {
        max_depth: 1_000,
        min_size: 0.0,
        gap: 0.0,
        early_stop: false,
        ..SubdivisionParams::default()
    };
    let cells = subdivide(&mut Fixed(0.0), Rect::new(0.0, 0.0, 1e9, 1e9), &params);
    assert_eq!(cells.len(), 1 << MAX_SUBDIVISION_DEPTH);
}

#[test]
fn zero_depth_yields_single_cell() {
    let params = SubdivisionParams {
        max_depth: 0,
        ..SubdivisionParams::default()
    };
    let cells = subdivide(&mut Fixed(0.5), square(), &params);
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].rect, square());
}

#[test]
fn columns_policy_only_splits_horizontally() {
    let params = SubdivisionParams {
        max_depth: 3,
        policy: SplitPolicy::Columns,
        early_stop: false,
        ..SubdivisionParams::default()
    };
    let cells = subdivide(&mut Fixed(0.3), square(), &params);
    assert_eq!(cells.len(), 8);
    assert!(cells.iter().all(|c| c.rect.y0 == 0.0 && c.rect.y1 == 1000.0));
    assert!(cells.windows(2).all(|w| w[0].rect.x0 < w[1].rect.x0));
}

proptest! {
    #[test]
    fn terminates_for_any_constant_stream(
        v in 0.0f64..1.0,
        depth in 0u32..40,
        jitter in 0.0f64..1.0,
    ) {
        let params = SubdivisionParams {
            max_depth: depth,
            ratio_jitter: jitter,
            ..SubdivisionParams::default()
        };
        let cells = subdivide(&mut Fixed(v), square(), &params);
        let limit = 1usize << depth.min(MAX_SUBDIVISION_DEPTH);
        prop_assert!(!cells.is_empty());
        prop_assert!(cells.len() <= limit);
        prop_assert!(cells.iter().all(|c| c.depth <= MAX_SUBDIVISION_DEPTH));
    }

    #[test]
    fn same_seed_same_cells(seed in "[a-z]{0,12}") {
        let params = SubdivisionParams::default();
        let a = subdivide(&mut SeedRng::from_seed(&Seed::new(seed.clone())), square(), &params);
        let b = subdivide(&mut SeedRng::from_seed(&Seed::new(seed)), square(), &params);
        prop_assert_eq!(a, b);
    }
}
