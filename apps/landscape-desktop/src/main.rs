use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use landscape_common::ViewportSize;
use landscape_render::{FrameDelegate, RendererDescriptor, SceneRenderer};
use landscape_render_wgpu::WgpuDevice;
use landscape_scene::SceneConfig;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "landscape-desktop", about = "Landscape scene viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene description (.yaml, .yml or .json); a single sphere if omitted
    #[arg(long)]
    scene: Option<PathBuf>,
}

struct App {
    scene_path: Option<PathBuf>,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer<WgpuDevice>>,
}

impl App {
    fn new(scene_path: Option<PathBuf>) -> Self {
        Self {
            scene_path,
            window: None,
            renderer: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Landscape")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let size = window.inner_size();
        let device = WgpuDevice::for_surface(&instance, surface, size.width, size.height)?;

        let config = match &self.scene_path {
            Some(path) => SceneConfig::load(path)
                .with_context(|| format!("load scene {}", path.display()))?,
            None => SceneConfig::default(),
        };
        let scene = config.build(&device)?;

        let desc = RendererDescriptor {
            color_format: device
                .color_format()
                .context("surface format is not a supported color format")?,
            depth_format: device.depth_format(),
            ..RendererDescriptor::default()
        };
        let mut renderer = SceneRenderer::new(device, &desc, scene)?;
        renderer.resize(ViewportSize::from_physical(size.width, size.height));

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("failed to start renderer: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(ViewportSize::from_physical(new_size.width, new_size.height));
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.draw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("landscape-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(cli.scene);
    event_loop.run_app(&mut app)?;

    Ok(())
}
