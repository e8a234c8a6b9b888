use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "poseplay", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Retarget a detector keypoint document into an animation JSON.
    Retarget(RetargetArgs),
    /// Sample an animation at a time and print the normalized pose.
    Sample(SampleArgs),
    /// Print a summary of an animation, including advisory joint-limit violations.
    Inspect(InspectArgs),
    /// Write a procedural animation.
    Synth(SynthArgs),
}

#[derive(Parser, Debug)]
struct RetargetArgs {
    /// Detector JSON (`metadata` + `detections`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output animation JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Configuration JSON; defaults apply to anything it omits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keypoint table to use, overriding the configuration (e.g. `YOLO`, `MediaPipe`).
    #[arg(long)]
    source: Option<String>,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input animation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Sample time in seconds; clamped to the animation.
    #[arg(long)]
    time: f64,

    /// Configuration JSON for the normalizer.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print world-space joint positions of the posed humanoid instead of the pose.
    #[arg(long)]
    world: bool,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input animation JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SynthArgs {
    /// Motion to generate: idle, wave or walk.
    #[arg(long)]
    kind: poseplay::synth::SyntheticKind,

    /// Number of frames.
    #[arg(long, default_value_t = 60)]
    frames: usize,

    /// Frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Output animation JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Retarget(args) => cmd_retarget(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Synth(args) => cmd_synth(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<poseplay::PoseplayConfig> {
    match path {
        Some(p) => Ok(poseplay::PoseplayConfig::load(p)?),
        None => Ok(poseplay::PoseplayConfig::default()),
    }
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn read_animation(path: &Path) -> anyhow::Result<poseplay::Animation> {
    let json = read_text(path, "animation")?;
    poseplay::import_animation_json(&json)
        .with_context(|| format!("import animation '{}'", path.display()))
}

fn write_animation(path: &Path, animation: &poseplay::Animation) -> anyhow::Result<()> {
    let json = poseplay::export_animation_json(animation)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("write animation '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_retarget(args: RetargetArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(source) = args.source {
        config.retarget.source = source;
    }

    let json = read_text(&args.in_path, "detections")?;
    let input = poseplay::parse_detector_json(&json)
        .with_context(|| format!("parse detections '{}'", args.in_path.display()))?;

    let mut retargeter = poseplay::PoseRetargeter::humanoid(config.retarget)?;
    let animation = retargeter.process_sequence(&input)?;
    eprintln!(
        "retargeted {} of {} detection frames",
        animation.len(),
        input.detections.len()
    );
    write_animation(&args.out, &animation)
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let animation = read_animation(&args.in_path)?;
    if !animation.is_playable() {
        anyhow::bail!("animation '{}' has no playable frames", animation.name());
    }

    let normalizer = poseplay::PoseNormalizer::new(config.normalizer.clone())?;
    let mut player = poseplay::AnimationPlayer::new(config.player, normalizer)?;
    let mut skeleton = poseplay::SkeletonKinematics::humanoid()
        .with_position_joints(config.normalizer.position_joints);
    player.load(animation, &mut skeleton)?;
    player.seek(args.time, &mut skeleton);

    if args.world {
        for name in skeleton.definition().traversal_order() {
            if let Some(p) = skeleton.world_position(name) {
                println!("{name:<16} {:>9.4} {:>9.4} {:>9.4}", p.x, p.y, p.z);
            }
        }
        return Ok(());
    }

    let pose = player
        .last_pose()
        .context("player produced no pose")?;
    println!("{}", serde_json::to_string_pretty(pose)?);
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let animation = read_animation(&args.in_path)?;
    let skeleton = poseplay::SkeletonDefinition::humanoid();

    println!("name:       {}", animation.name());
    println!("frames:     {}", animation.len());
    println!("frame rate: {}", animation.metadata.frame_rate);
    println!("duration:   {:.3}s", animation.duration());
    println!(
        "dimensions: {}x{}",
        animation.metadata.dimensions.width, animation.metadata.dimensions.height
    );
    println!("playable:   {}", animation.is_playable());

    let mut joints = std::collections::BTreeMap::<&str, (usize, usize)>::new();
    let mut unknown = std::collections::BTreeSet::new();
    for frame in &animation.frames {
        for (name, joint) in frame.pose.iter() {
            if !skeleton.contains(name) {
                unknown.insert(name);
                continue;
            }
            let entry = joints.entry(name).or_default();
            entry.0 += 1;
            if let (Some(q), Some(limits)) = (joint.rotation, skeleton.limits(name))
                && !limits.contains(q)
            {
                entry.1 += 1;
            }
        }
    }

    println!("joints:");
    for (name, (keyed, outside)) in &joints {
        if *outside > 0 {
            println!("  {name:<16} {keyed:>5} frames, {outside} outside limits");
        } else {
            println!("  {name:<16} {keyed:>5} frames");
        }
    }
    if !unknown.is_empty() {
        let names: Vec<&str> = unknown.into_iter().collect();
        println!("unknown joints: {}", names.join(", "));
    }
    Ok(())
}

fn cmd_synth(args: SynthArgs) -> anyhow::Result<()> {
    let fps = poseplay::FrameRate::new(args.fps)?;
    let animation = poseplay::synth::generate(args.kind, args.frames, fps)?;
    write_animation(&args.out, &animation)
}
