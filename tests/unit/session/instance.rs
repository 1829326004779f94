use super::*;
use crate::scene::registry::SceneRegistry;

fn instance(kind: SceneKind) -> SceneInstance {
    let registry = SceneRegistry::with_defaults();
    let config = SceneConfig::default();
    let seed = Seed::new("instance");
    let generated = registry.generate(&seed, kind, &config).unwrap();
    let mut inst = SceneInstance::new(seed, kind, config, registry.get(kind).unwrap(), 0.1);
    inst.begin_generation();
    inst.accept(generated);
    inst
}

#[test]
fn renders_only_when_visible_ready_and_sized() {
    let mut inst = instance(SceneKind::MetaballField);
    assert_eq!(inst.render(0.0).unwrap(), None);

    inst.resize(Viewport::new(120.0, 40.0, 2.0));
    assert_eq!(inst.render(0.0).unwrap(), None);

    inst.set_visible(true);
    let frame = inst.render(0.0).unwrap().expect("frame");
    assert_eq!((frame.width, frame.height), (240, 80));
    assert_eq!(inst.frames(), 1);
    assert!(!inst.needs_redraw());
}

#[test]
fn zero_sized_surface_defers() {
    let mut inst = instance(SceneKind::Voxel);
    inst.set_visible(true);
    inst.resize(Viewport::new(0.0, 0.0, 1.0));
    assert_eq!(inst.surface_pixels(), None);
    assert_eq!(inst.render(0.0).unwrap(), None);

    inst.resize(Viewport::new(60.0, 20.0, 1.0));
    assert_eq!(inst.surface_pixels(), Some((60, 20)));
    assert!(inst.render(0.0).unwrap().is_some());
}

#[test]
fn resize_keeps_the_world() {
    let mut inst = instance(SceneKind::Orbital);
    let before = inst.world().cloned().unwrap();
    for w in [10.0, 300.0, 45.5, 1000.0] {
        inst.resize(Viewport::new(w, w / 3.0, 1.5));
    }
    assert!(Arc::ptr_eq(&before, inst.world().unwrap()));
}

#[test]
fn clock_advances_while_visible_and_pauses_when_hidden() {
    let mut inst = instance(SceneKind::MetaballField);
    inst.resize(Viewport::new(30.0, 10.0, 1.0));
    inst.set_visible(true);
    inst.render(0.0).unwrap();
    inst.render(0.05).unwrap();
    let t = inst.time();
    assert!((t - 0.05).abs() < 1e-12);

    inst.set_visible(false);
    assert_eq!(inst.render(10.0).unwrap(), None);
    inst.set_visible(true);
    inst.render(20.0).unwrap();
    assert!((inst.time() - t).abs() < 1e-12);
}

#[test]
fn frozen_instance_stays_at_phase_zero() {
    let mut inst = instance(SceneKind::Voxel);
    inst.resize(Viewport::new(30.0, 10.0, 1.0));
    inst.set_visible(true);
    inst.set_frozen(true);
    let a = inst.render(0.0).unwrap();
    let b = inst.render(0.05).unwrap();
    assert_eq!(inst.time(), 0.0);
    assert_eq!(a, b);
}

#[test]
fn failed_generation_draws_nothing() {
    let mut inst = instance(SceneKind::Voxel);
    inst.resize(Viewport::new(30.0, 10.0, 1.0));
    inst.set_visible(true);
    inst.begin_generation();
    inst.fail(&SceneError::generation("boom"));
    inst.fail(&SceneError::generation("boom again"));
    assert_eq!(inst.generation(), GenerationState::Failed);
    assert_eq!(inst.render(0.0).unwrap(), None);
}

#[test]
fn new_round_cancels_the_previous_token() {
    let mut inst = instance(SceneKind::Voxel);
    let first = inst.begin_generation();
    let epoch = inst.epoch;
    let second = inst.begin_generation();
    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(inst.epoch, epoch + 1);
    assert_eq!(inst.generation(), GenerationState::Pending);
}

#[test]
fn detach_releases_the_surface() {
    let mut inst = instance(SceneKind::Voxel);
    inst.resize(Viewport::new(30.0, 10.0, 1.0));
    inst.set_visible(true);
    inst.detach();
    assert_eq!(inst.state(), InstanceState::Unmounted);
    assert_eq!(inst.surface_pixels(), None);
    assert_eq!(inst.render(1.0).unwrap(), None);
}
