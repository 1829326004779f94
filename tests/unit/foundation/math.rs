use super::*;

#[test]
fn stable_hash_is_order_sensitive_and_repeatable() {
    let mut a = StableHasher::new();
    a.write_str("panospace");
    a.write_u32(7);
    let mut b = StableHasher::new();
    b.write_str("panospace");
    b.write_u32(7);
    assert_eq!(a.finish(), b.finish());

    let mut c = StableHasher::new();
    c.write_u32(7);
    c.write_str("panospace");
    let mut d = StableHasher::new();
    d.write_str("panospace");
    d.write_u32(7);
    assert_ne!(c.finish(), d.finish());
}

#[test]
fn str_writes_are_length_prefixed() {
    let mut a = StableHasher::new();
    a.write_str("ab");
    a.write_str("c");
    let mut b = StableHasher::new();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish_u64(), b.finish_u64());
}

#[test]
fn smoothstep_clamps_and_handles_degenerate_edges() {
    assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
    assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-12);
    assert_eq!(smoothstep(1.0, 1.0, 0.5), 0.0);
    assert_eq!(smoothstep(1.0, 1.0, 1.5), 1.0);
}

#[test]
fn fingerprint_displays_as_32_hex_digits() {
    let fp = Fingerprint { hi: 1, lo: 0xff };
    assert_eq!(fp.to_string(), "000000000000000100000000000000ff");
}
