use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use landscape_common::ViewportSize;
use landscape_gpu::{BindingSlot, LIGHT_STRIDE, RecordingDevice};
use landscape_physics::{PhysicsWorld, RigidBody};
use landscape_render::{FrameDelegate, FrameOutcome, RendererDescriptor, SceneRenderer};
use landscape_scene::{CameraConfig, SceneConfig, ShapeConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "landscape-cli", about = "CLI tool for landscape operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the shader binding table
    Info,
    /// Load and validate a scene description
    CheckScene {
        /// Scene file (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// Render frames against the recording backend and print what was submitted
    Frames {
        /// Scene file; a single sphere if omitted
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Number of frames to draw
        #[arg(short, long, default_value = "3")]
        count: u32,
        /// Make every Nth frame acquisition fail (0 disables)
        #[arg(long, default_value = "0")]
        drop_every: u32,
    },
    /// Step a small rigid-body world and print body positions
    Simulate {
        /// Number of steps
        #[arg(short, long, default_value = "20")]
        steps: u32,
        /// Seconds per step
        #[arg(long, default_value = "0.05")]
        dt: f32,
    },
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => {
            SceneConfig::load(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => Ok(SceneConfig::default()),
    }
}

fn check_scene(file: &Path) -> anyhow::Result<()> {
    let config = load_scene(Some(file))?;
    let camera = match config.camera {
        CameraConfig::FirstPerson(_) => "first person",
        CameraConfig::Arcball(_) => "arcball",
    };
    println!("Scene {}: OK", file.display());
    println!("camera: {camera}");
    println!("lights: {}", config.lights.len());
    for light in &config.lights {
        println!("  {:?} intensity={}", light.kind, light.intensity);
    }
    println!("objects: {}", config.objects.len());
    for object in &config.objects {
        let ShapeConfig::Sphere {
            radius,
            segments,
            rings,
            ..
        } = object.shape;
        println!(
            "  {} sphere r={radius} {segments}x{rings} at ({:.2}, {:.2}, {:.2})",
            object.name, object.position.x, object.position.y, object.position.z
        );
    }

    // Tessellate and upload through the recording backend to catch mesh errors.
    let scene = config.build(&RecordingDevice::new())?;
    let indices: u32 = scene
        .objects()
        .iter()
        .flat_map(|o| o.mesh().submeshes())
        .map(|s| s.index_count)
        .sum();
    println!("triangles: {}", indices / 3);
    Ok(())
}

fn record_frames(scene: Option<&Path>, count: u32, drop_every: u32) -> anyhow::Result<()> {
    let config = load_scene(scene)?;
    let device = RecordingDevice::new();
    let scene = config.build(&device)?;
    let mut renderer = SceneRenderer::new(device, &RendererDescriptor::default(), scene)?;
    renderer.resize(ViewportSize::new(1280.0, 720.0));

    for i in 1..=count {
        if drop_every > 0 && i % drop_every == 0 {
            renderer.renderer_mut().device_mut().drop_next_frames(1);
        }
        if renderer.draw() == FrameOutcome::Dropped {
            println!("frame {i}: dropped");
        }
    }

    for frame in renderer.renderer().device().frames() {
        print!("{}", landscape_render::summarize_frame(frame));
    }
    println!(
        "presented={} dropped={}",
        renderer.renderer().frames_presented(),
        renderer.renderer().frames_dropped()
    );
    Ok(())
}

fn simulate(steps: u32, dt: f32) -> anyhow::Result<()> {
    let mut world = PhysicsWorld::new();
    world.add_body(RigidBody::sphere(
        1,
        1.0,
        Vec3::new(-3.0, 0.0, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
        0.5,
    )?)?;
    world.add_body(RigidBody::sphere(
        2,
        2.0,
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        0.5,
    )?)?;
    world.add_body(RigidBody::cube(
        3,
        5.0,
        Vec3::new(0.0, 3.0, 0.0),
        Vec3::new(0.0, -1.5, 0.0),
        1.0,
    )?)?;

    println!("Physics demo: {} bodies, dt={dt}, steps={steps}", world.bodies().len());
    for step in 1..=steps {
        for event in world.step(dt) {
            println!(
                "step {step}: contact {} <-> {} depth={:.3}",
                event.a, event.b, event.contact.depth
            );
        }
    }
    for body in world.bodies() {
        let p = body.position;
        let v = body.velocity;
        println!(
            "body {}: position=({:.3}, {:.3}, {:.3}) velocity=({:.3}, {:.3}, {:.3})",
            body.code(),
            p.x,
            p.y,
            p.z,
            v.x,
            v.y,
            v.z
        );
    }
    println!(
        "momentum={:.3} energy={:.3}",
        world.total_momentum().length(),
        world.total_kinetic_energy()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("landscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", landscape_render::crate_info());
            println!("light stride: {LIGHT_STRIDE} bytes");
            for slot in BindingSlot::ALL {
                println!(
                    "slot {:>2} group {} {:?} {:?}",
                    slot.index(),
                    slot.group(),
                    slot.stage(),
                    slot
                );
            }
        }
        Commands::CheckScene { file } => check_scene(&file)?,
        Commands::Frames {
            scene,
            count,
            drop_every,
        } => record_frames(scene.as_deref(), count, drop_every)?,
        Commands::Simulate { steps, dt } => simulate(steps, dt)?,
    }

    Ok(())
}
