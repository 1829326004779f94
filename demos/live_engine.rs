use seedscape::{
    Engine, EngineOpts, FrameRGBA, Presenter, SceneConfig, SceneHandle, SceneKind, SceneResult,
    Surface, Viewport,
};

struct Stats {
    frames: usize,
    lit: usize,
}

impl Presenter for Stats {
    fn present(&mut self, _handle: SceneHandle, frame: &FrameRGBA) -> SceneResult<()> {
        self.frames += 1;
        self.lit = frame.data.chunks_exact(4).filter(|px| px[3] > 0).count();
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut engine = Engine::new(EngineOpts::from_env())?;
    let mut handles = Vec::new();
    for kind in SceneKind::ALL {
        let h = engine.create_scene("panospace", kind, SceneConfig::default())?;
        handles.push((h, kind));
    }
    engine.wait_for_generation();

    for &(h, _) in &handles {
        engine.mount(
            h,
            Surface {
                viewport: Viewport::new(600.0, 200.0, 1.0),
                visible: true,
            },
        )?;
    }

    let mut stats = Stats { frames: 0, lit: 0 };
    for i in 0..120 {
        let report = engine.tick(i as f64 / 60.0, &mut stats);
        if i % 30 == 0 {
            println!("tick {i}: {report:?}");
        }
    }
    for (h, kind) in handles {
        let world = engine.world(h).map(|w| w.summary());
        println!("{kind}: {world:?}");
    }
    println!("{} frames presented, {} lit pixels in the last", stats.frames, stats.lit);
    println!("cache: {:?}", engine.cache_stats());
    Ok(())
}
