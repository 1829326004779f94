use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "seedscape", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print a JSON summary of the generated world.
    Describe(SceneArgs),
    /// List the registered scene kinds.
    Kinds,
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Seed string. Empty falls back to the default seed.
    #[arg(long, default_value = "")]
    seed: String,

    /// Scene kind (`voxel`, `orbital`, `fractalForest`, `metaballField`, `parallaxWindow`,
    /// `tiledPattern`).
    #[arg(long)]
    kind: String,

    /// Optional scene config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Layout width.
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Layout height.
    #[arg(long, default_value_t = 400.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Scene time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Describe(args) => cmd_describe(args),
        Command::Kinds => cmd_kinds(),
    }
}

fn load_scene(
    args: &SceneArgs,
) -> anyhow::Result<(seedscape::Seed, seedscape::SceneKind, seedscape::SceneConfig)> {
    let kind: seedscape::SceneKind = args
        .kind
        .parse()
        .with_context(|| format!("parse scene kind '{}'", args.kind))?;
    let config = match &args.config {
        Some(path) => seedscape::SceneConfig::from_path(path)
            .with_context(|| format!("load scene config '{}'", path.display()))?,
        None => seedscape::SceneConfig::default(),
    };
    Ok((seedscape::Seed::new(args.seed.as_str()), kind, config))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (seed, kind, config) = load_scene(&args.scene)?;
    let viewport = seedscape::Viewport::new(args.width, args.height, args.dpr);
    let (generated, frame) = seedscape::render_still(&seed, kind, &config, viewport, args.time)?;
    let frame = frame.to_straight();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({kind}, seed '{seed}', world {})",
        args.out.display(),
        generated.world.fingerprint()
    );
    Ok(())
}

fn cmd_describe(args: SceneArgs) -> anyhow::Result<()> {
    let (seed, kind, config) = load_scene(&args)?;
    let registry = seedscape::SceneRegistry::with_defaults();
    let generated = registry.generate(&seed, kind, &config)?;
    let out = serde_json::json!({
        "seed": seed.as_str(),
        "budget": registry.get(kind)?.budget(),
        "theme": generated.theme.as_ref(),
        "world": generated.world.summary(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize world summary")?
    );
    Ok(())
}

fn cmd_kinds() -> anyhow::Result<()> {
    for kind in seedscape::SceneRegistry::with_defaults().kinds() {
        println!("{kind}");
    }
    Ok(())
}
