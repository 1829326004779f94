use super::*;

fn request(handle: u64, epoch: u64, seed: &str) -> GenerationRequest {
    GenerationRequest {
        handle: SceneHandle(handle),
        epoch,
        seed: Seed::new(seed),
        kind: SceneKind::TiledPattern,
        config: SceneConfig::default(),
        cancel: CancelToken::new(),
    }
}

fn generator(mode: GenerationMode) -> Generator {
    Generator::new(Arc::new(SceneRegistry::with_defaults()), mode, Some(2)).unwrap()
}

#[test]
fn inline_outcomes_are_ready_immediately() {
    let mut g = generator(GenerationMode::Inline);
    g.submit(request(1, 0, "a"));
    assert_eq!(g.in_flight(), 1);
    let out = g.drain();
    assert_eq!(out.len(), 1);
    assert_eq!(g.in_flight(), 0);
    assert!(out[0].result.is_ok());
    assert_eq!(out[0].handle, SceneHandle(1));
}

#[test]
fn background_matches_inline() {
    let mut bg = generator(GenerationMode::Background);
    let mut inline = generator(GenerationMode::Inline);
    for (i, seed) in ["a", "b", "c", "d"].into_iter().enumerate() {
        bg.submit(request(i as u64, 7, seed));
        inline.submit(request(i as u64, 7, seed));
    }
    let mut a = bg.wait_all();
    let mut b = inline.wait_all();
    assert_eq!(bg.in_flight(), 0);
    a.sort_by_key(|o| o.handle);
    b.sort_by_key(|o| o.handle);
    assert_eq!(a.len(), 4);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.key, y.key);
        assert_eq!(x.epoch, 7);
        assert_eq!(x.result.as_ref().unwrap(), y.result.as_ref().unwrap());
    }
}

#[test]
fn cancelled_requests_skip_generation() {
    let mut g = generator(GenerationMode::Inline);
    let req = request(1, 0, "a");
    req.cancel.cancel();
    g.submit(req);
    let out = g.drain();
    assert!(matches!(out[0].result, Err(SceneError::Generation(_))));
}

#[test]
fn zero_threads_is_rejected() {
    let err = Generator::new(
        Arc::new(SceneRegistry::with_defaults()),
        GenerationMode::Background,
        Some(0),
    )
    .unwrap_err();
    assert!(matches!(err, SceneError::Validation(_)));
}
