use super::*;
use crate::rng::{Seed, SeedRng};

fn bounds() -> Rect {
    Rect::new(0.0, 0.0, 200.0, 100.0)
}

#[test]
fn uniform_stays_in_bounds_with_independent_motion() {
    let mut rng = SeedRng::from_seed(&Seed::new("bubbles"));
    let params = ScatterParams {
        count: 500,
        vx: (-1.0, 1.0),
        vy: (2.0, 5.0),
        ..ScatterParams::default()
    };
    let ps = scatter(&mut rng, bounds(), &params);
    assert_eq!(ps.len(), 500);
    for p in &ps {
        assert!(bounds().contains(p.position.xy()));
        assert!((2.0..5.0).contains(&p.velocity.y));
        assert!((0.0..TAU).contains(&p.phase));
    }
    assert!(ps.windows(2).any(|w| w[0].phase != w[1].phase));
}

#[test]
fn every_pattern_consumes_seven_draws_per_particle() {
    for pattern in [
        ScatterPattern::Uniform,
        ScatterPattern::Grid {
            cols: 4,
            rows: 3,
            jitter: 0.5,
        },
        ScatterPattern::Concentric {
            rings: 3,
            jitter: 0.2,
        },
    ] {
        let mut rng = SeedRng::from_u32(7);
        let params = ScatterParams {
            pattern,
            count: 13,
            ..ScatterParams::default()
        };
        let _ = scatter(&mut rng, bounds(), &params);
        assert_eq!(rng.draws(), 13 * 7);
    }
}

#[test]
fn grid_without_jitter_hits_cell_centres() {
    let mut rng = SeedRng::from_u32(1);
    let params = ScatterParams {
        pattern: ScatterPattern::Grid {
            cols: 2,
            rows: 2,
            jitter: 0.0,
        },
        count: 4,
        ..ScatterParams::default()
    };
    let ps = scatter(&mut rng, bounds(), &params);
    let xy: Vec<_> = ps.iter().map(|p| (p.position.x, p.position.y)).collect();
    assert_eq!(xy, vec![(50.0, 25.0), (150.0, 25.0), (50.0, 75.0), (150.0, 75.0)]);
}

#[test]
fn concentric_radii_follow_rings() {
    let mut rng = SeedRng::from_u32(3);
    let params = ScatterParams {
        pattern: ScatterPattern::Concentric {
            rings: 2,
            jitter: 0.0,
        },
        count: 10,
        ..ScatterParams::default()
    };
    let c = bounds().center();
    for (i, p) in scatter(&mut rng, bounds(), &params).iter().enumerate() {
        let r = (p.position.xy() - c).hypot();
        let expected = 25.0 * ((i % 2) as f64 + 1.0);
        assert!((r - expected).abs() < 1e-9);
    }
}

#[test]
fn count_is_clamped() {
    let mut rng = SeedRng::from_u32(3);
    let params = ScatterParams {
        count: MAX_SCATTER * 3,
        ..ScatterParams::default()
    };
    assert_eq!(scatter(&mut rng, bounds(), &params).len(), MAX_SCATTER);
}
