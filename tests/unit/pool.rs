use super::*;

fn rain(capacity: usize) -> PoolSpec {
    PoolSpec {
        capacity,
        initial: capacity / 2,
        spawn_rate: 30.0,
        vx: (-0.02, 0.02),
        vy: (0.4, 0.9),
        size: (1.0, 2.0),
        margin: 0.05,
    }
}

#[test]
fn capacity_is_fixed_over_many_frames() {
    let mut pool = EntityPool::new(rain(50), SeedRng::from_u32(42));
    let allocated = pool.allocated_capacity();
    assert!(allocated >= 50);
    for _ in 0..100_000 {
        pool.advance(1.0 / 60.0);
        assert!(pool.len() <= 50);
    }
    assert_eq!(pool.len(), 50);
    assert_eq!(pool.allocated_capacity(), allocated);
    assert!(pool.recycled() > 0);
}

#[test]
fn elements_stay_within_margin() {
    let mut pool = EntityPool::new(rain(20), SeedRng::from_u32(1));
    for _ in 0..2_000 {
        pool.advance(0.05);
        for item in pool.items() {
            assert!(item.position.y >= -0.05 - 1e-9 && item.position.y <= 1.05 + 1e-9);
            assert!(item.position.x >= -0.05 - 1e-9 && item.position.x <= 1.05 + 1e-9);
        }
    }
}

#[test]
fn falling_items_reset_to_top() {
    let spec = PoolSpec {
        capacity: 1,
        initial: 1,
        vy: (1.0, 1.0),
        ..PoolSpec::default()
    };
    let mut pool = EntityPool::new(spec, SeedRng::from_u32(9));
    // One second of travel at speed 1 always crosses the bottom edge.
    pool.advance(1.1);
    assert_eq!(pool.items()[0].position.y, -spec.margin);
    assert_eq!(pool.items()[0].age, 0.0);
    assert_eq!(pool.recycled(), 1);
}

#[test]
fn rising_items_reset_to_bottom() {
    let spec = PoolSpec {
        capacity: 1,
        initial: 1,
        vy: (-1.0, -1.0),
        ..PoolSpec::default()
    };
    let mut pool = EntityPool::new(spec, SeedRng::from_u32(9));
    pool.advance(1.1);
    assert_eq!(pool.items()[0].position.y, 1.0 + spec.margin);
}

#[test]
fn zero_or_bad_dt_is_a_no_op() {
    let mut pool = EntityPool::new(rain(10), SeedRng::from_u32(5));
    let before: Vec<_> = pool.items().to_vec();
    pool.advance(0.0);
    pool.advance(-1.0);
    pool.advance(f64::NAN);
    assert_eq!(pool.items(), before.as_slice());
}

#[test]
fn spawning_is_lazy_and_deterministic() {
    let spec = PoolSpec {
        capacity: 10,
        initial: 0,
        spawn_rate: 10.0,
        ..PoolSpec::default()
    };
    let mut a = EntityPool::new(spec, SeedRng::from_u32(3));
    let mut b = EntityPool::new(spec, SeedRng::from_u32(3));
    assert!(a.is_empty());
    a.advance(0.25);
    b.advance(0.25);
    assert_eq!(a.len(), 2);
    assert_eq!(a.items(), b.items());
}
