use super::*;

#[derive(Default)]
struct Collect {
    frames: Vec<(SceneHandle, u32, u32)>,
    fail: bool,
}

impl Presenter for Collect {
    fn present(&mut self, handle: SceneHandle, frame: &FrameRGBA) -> SceneResult<()> {
        if self.fail {
            return Err(SceneError::render("surface lost"));
        }
        self.frames.push((handle, frame.width, frame.height));
        Ok(())
    }
}

fn engine() -> Engine {
    Engine::new(EngineOpts {
        generation: GenerationMode::Inline,
        ..EngineOpts::default()
    })
    .unwrap()
}

fn shown(w: f64, h: f64) -> Surface {
    Surface {
        viewport: Viewport::new(w, h, 1.0),
        visible: true,
    }
}

#[test]
fn defaults_match_documented_values() {
    let opts = EngineOpts::default();
    assert_eq!(opts.cache_capacity, 32);
    assert_eq!(opts.generation, GenerationMode::Background);
    assert_eq!(opts.threads, None);
    assert_eq!(opts.max_frame_dt, 0.1);
}

#[test]
fn animated_scene_presents_every_tick_once_mounted() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("aurora", SceneKind::Orbital, SceneConfig::default())
        .unwrap();
    assert_eq!(e.state(h), Some(InstanceState::Unmounted));

    // Generated but not mounted: nothing to present.
    let r = e.tick(0.0, &mut p);
    assert_eq!(r.generated, 1);
    assert_eq!(r.presented, 0);

    e.mount(h, shown(60.0, 20.0)).unwrap();
    assert!(e.is_scheduled(h));
    for i in 0..3 {
        e.tick(i as f64 * 0.016, &mut p);
    }
    assert_eq!(p.frames, vec![(h, 60, 20); 3]);
    assert!(e.is_scheduled(h));
}

#[test]
fn static_scene_renders_once_per_change() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("tiles", SceneKind::TiledPattern, SceneConfig::default())
        .unwrap();
    e.mount(h, shown(40.0, 20.0)).unwrap();
    e.tick(0.0, &mut p);
    e.tick(0.1, &mut p);
    e.tick(0.2, &mut p);
    assert_eq!(p.frames.len(), 1);
    assert!(!e.is_scheduled(h));

    e.observe(h, SurfaceEvent::Resized(Viewport::new(80.0, 20.0, 1.0)))
        .unwrap();
    e.tick(0.3, &mut p);
    e.tick(0.4, &mut p);
    assert_eq!(p.frames.len(), 2);
    assert_eq!(p.frames[1], (h, 80, 20));
}

#[test]
fn hidden_scene_is_never_scheduled() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("quiet", SceneKind::MetaballField, SceneConfig::default())
        .unwrap();
    e.mount(
        h,
        Surface {
            viewport: Viewport::new(30.0, 10.0, 1.0),
            visible: false,
        },
    )
    .unwrap();
    e.tick(0.0, &mut p);
    e.tick(1.0, &mut p);
    assert!(p.frames.is_empty());
    assert!(!e.is_scheduled(h));
    assert_eq!(e.state(h), Some(InstanceState::Invisible));

    e.observe(h, SurfaceEvent::Visibility(true)).unwrap();
    e.tick(2.0, &mut p);
    assert_eq!(p.frames.len(), 1);
}

#[test]
fn unmount_is_idempotent_and_drops_pending_worlds() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("gone", SceneKind::Voxel, SceneConfig::default())
        .unwrap();
    e.mount(h, shown(30.0, 10.0)).unwrap();
    e.unmount(h);
    e.unmount(h);
    e.unmount(SceneHandle(999));

    let r = e.tick(0.0, &mut p);
    assert_eq!(r.stale, 1);
    assert_eq!(r.presented, 0);
    assert!(e.world(h).is_none());
    assert_eq!(e.state(h), Some(InstanceState::Unmounted));

    // The discarded round still filled the cache, so remounting is immediate.
    e.mount(h, shown(30.0, 10.0)).unwrap();
    assert!(e.world(h).is_some());
    assert_eq!(e.cache_stats().hits, 1);
    e.tick(0.016, &mut p);
    assert_eq!(p.frames.len(), 1);
}

#[test]
fn nothing_is_presented_after_unmount() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("fade", SceneKind::Orbital, SceneConfig::default())
        .unwrap();
    e.mount(h, shown(30.0, 10.0)).unwrap();
    e.tick(0.0, &mut p);
    let n = p.frames.len();
    e.unmount(h);
    e.tick(0.016, &mut p);
    e.tick(0.032, &mut p);
    assert_eq!(p.frames.len(), n);
    assert!(e.world(h).is_some());
}

#[test]
fn cosmetic_updates_keep_the_world() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("calm", SceneKind::FractalForest, SceneConfig::default())
        .unwrap();
    e.tick(0.0, &mut p);
    let before = e.world(h).unwrap();

    let mut cfg = SceneConfig::default();
    cfg.speed = Some(2.5);
    cfg.tuning.insert("forest.breeze".into(), 0.5);
    e.update_config(h, cfg.clone()).unwrap();
    e.tick(0.1, &mut p);
    assert!(Arc::ptr_eq(&before, &e.world(h).unwrap()));

    cfg.density = Some(3);
    e.update_config(h, cfg).unwrap();
    assert!(e.world(h).is_none());
    e.tick(0.2, &mut p);
    assert!(!Arc::ptr_eq(&before, &e.world(h).unwrap()));
}

#[test]
fn invalid_updates_are_rejected() {
    let mut e = engine();
    let h = e
        .create_scene("x", SceneKind::Voxel, SceneConfig::default())
        .unwrap();
    let mut cfg = SceneConfig::default();
    cfg.speed = Some(f64::NAN);
    assert!(matches!(
        e.update_config(h, cfg.clone()),
        Err(SceneError::Validation(_))
    ));
    assert!(matches!(
        e.create_scene("y", SceneKind::Voxel, cfg),
        Err(SceneError::Validation(_))
    ));
    assert!(e.mount(SceneHandle(404), shown(1.0, 1.0)).is_err());
}

#[test]
fn unsupported_kind_fails_fast() {
    let mut e = Engine::with_registry(
        EngineOpts {
            generation: GenerationMode::Inline,
            ..EngineOpts::default()
        },
        SceneRegistry::empty(),
    )
    .unwrap();
    let err = e
        .create_scene("x", SceneKind::Voxel, SceneConfig::default())
        .unwrap_err();
    assert!(matches!(err, SceneError::UnsupportedSceneKind(_)));
    assert_eq!(e.handles().count(), 0);
}

#[test]
fn identical_scenes_share_a_cached_world() {
    let mut e = engine();
    let mut p = Collect::default();
    let a = e
        .create_scene("twin", SceneKind::Orbital, SceneConfig::default())
        .unwrap();
    e.tick(0.0, &mut p);
    let b = e
        .create_scene("twin", SceneKind::Orbital, SceneConfig::default())
        .unwrap();
    assert!(Arc::ptr_eq(&e.world(a).unwrap(), &e.world(b).unwrap()));
    let stats = e.cache_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn reduced_motion_freezes_time() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("still", SceneKind::MetaballField, SceneConfig::default())
        .unwrap();
    e.mount(h, shown(30.0, 10.0)).unwrap();
    e.tick(0.0, &mut p);
    e.tick(0.05, &mut p);
    assert!(e.instance(h).unwrap().time() > 0.0);

    e.set_reduced_motion(true);
    e.tick(0.1, &mut p);
    e.tick(0.2, &mut p);
    assert_eq!(e.instance(h).unwrap().time(), 0.0);
    assert!(!e.is_scheduled(h));
    assert_eq!(p.frames.len(), 3);

    e.set_reduced_motion(false);
    assert!(e.is_scheduled(h));
}

#[test]
fn presenter_errors_do_not_stop_the_engine() {
    let mut e = engine();
    let mut p = Collect {
        fail: true,
        ..Collect::default()
    };
    let h = e
        .create_scene("err", SceneKind::Orbital, SceneConfig::default())
        .unwrap();
    e.mount(h, shown(30.0, 10.0)).unwrap();
    e.tick(0.0, &mut p);
    let r = e.tick(0.016, &mut p);
    assert_eq!(r.failed, 1);
    assert!(e.is_scheduled(h));
}

#[test]
fn failed_static_frame_is_retried_next_tick() {
    let mut e = engine();
    let mut p = Collect {
        fail: true,
        ..Collect::default()
    };
    let h = e
        .create_scene("retry", SceneKind::TiledPattern, SceneConfig::default())
        .unwrap();
    e.mount(h, shown(40.0, 20.0)).unwrap();
    let r = e.tick(0.0, &mut p);
    assert_eq!(r.failed, 1);
    assert!(e.is_scheduled(h));
    assert!(e.instance(h).unwrap().needs_redraw());

    p.fail = false;
    let r = e.tick(0.1, &mut p);
    assert_eq!((r.presented, r.failed), (1, 0));
    assert_eq!(p.frames, vec![(h, 40, 20)]);
    assert!(!e.is_scheduled(h));

    e.tick(0.2, &mut p);
    assert_eq!(p.frames.len(), 1);
}

#[test]
fn kind_and_seed_changes_regenerate() {
    let mut e = engine();
    let mut p = Collect::default();
    let h = e
        .create_scene("one", SceneKind::Voxel, SceneConfig::default())
        .unwrap();
    e.tick(0.0, &mut p);
    e.set_kind(h, SceneKind::TiledPattern).unwrap();
    e.tick(0.0, &mut p);
    assert_eq!(e.world(h).unwrap().kind, SceneKind::TiledPattern);

    let before = e.world(h).unwrap();
    e.set_seed(h, "two").unwrap();
    e.tick(0.0, &mut p);
    assert_ne!(before.fingerprint(), e.world(h).unwrap().fingerprint());
}

#[test]
fn background_generation_arrives_after_wait() {
    let mut e = Engine::new(EngineOpts {
        threads: Some(2),
        ..EngineOpts::default()
    })
    .unwrap();
    let h = e
        .create_scene("bg", SceneKind::Orbital, SceneConfig::default())
        .unwrap();
    let r = e.wait_for_generation();
    assert_eq!(r.generated, 1);
    assert!(e.world(h).is_some());
}

#[test]
fn stills_are_pure() {
    let seed = Seed::new("still");
    let cfg = SceneConfig::default();
    let vp = Viewport::new(90.0, 30.0, 1.0);
    let (ga, a) = render_still(&seed, SceneKind::MetaballField, &cfg, vp, 1.25).unwrap();
    let (gb, b) = render_still(&seed, SceneKind::MetaballField, &cfg, vp, 1.25).unwrap();
    assert_eq!(ga, gb);
    assert_eq!(a, b);
    assert_eq!((a.width, a.height), (90, 30));
}
