use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use tunnel_flyer::camera::Camera;
use tunnel_flyer::cli::Cli;
use tunnel_flyer::config::Config;
use tunnel_flyer::flight::FlightController;
use tunnel_flyer::frame::{FpsCounter, FrameIterator};
use tunnel_flyer::labels::LabelSet;
use tunnel_flyer::renderer::{HudFrame, TunnelRenderer};
use tunnel_flyer::scene::{build_scene, SceneGeometry};
use tunnel_flyer::spline::{tunnel_control_points, CurvePath};

// === Constants ===

const PIXELS_PER_LINE: f32 = 40.0;
const FPS_UPDATE_INTERVAL: f32 = 1.0;

// === Type Aliases ===

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// === Application ===

struct App {
    config: Config,
    show_hud: bool,
    window: Option<Arc<Window>>,
    renderer: Option<TunnelRenderer>,
    camera: Camera,
    controller: FlightController,
    labels: LabelSet,
    // Held until the renderer uploads it in `resumed`.
    scene: Option<SceneGeometry>,
    frames: FrameIterator,
    fps_counter: FpsCounter,
}

impl App {
    fn new(config: Config, show_hud: bool) -> Result<Self> {
        let path = CurvePath::new(tunnel_control_points())?;
        let scene = build_scene(&path, &config.tube, &config.boxes);
        let labels = LabelSet::along_path(&path, &config.labels);
        let controller = FlightController::new(path, &config.flight);

        let camera = Camera::new(
            config.camera.fov_degrees,
            config.camera.near,
            config.camera.far,
            config.window.width as f32,
            config.window.height as f32,
        );

        Ok(Self {
            config,
            show_hud,
            window: None,
            renderer: None,
            camera,
            controller,
            labels,
            scene: Some(scene),
            frames: FrameIterator::new(),
            fps_counter: FpsCounter::new(FPS_UPDATE_INTERVAL),
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let Some(scene) = self.scene.take() else {
            return;
        };

        let size = window.inner_size();
        self.camera.set_viewport(size.width as f32, size.height as f32);

        let renderer = match pollster::block_on(TunnelRenderer::new(
            window.clone(),
            &self.camera,
            &scene,
            self.config.fog_density,
            self.show_hud,
        )) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return; // egui consumed the event
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scroll-up as positive, the wheel delta the
                // controller expects is the browser convention (positive =
                // toward the user).
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
                };
                self.controller.on_scroll_delta(pixels);
            }
            WindowEvent::Resized(new_size) => {
                self.camera
                    .set_viewport(new_size.width as f32, new_size.height as f32);
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                let frame = self.frames.advance();
                if let Some(fps) = self.fps_counter.tick(frame.delta) {
                    log::debug!("FPS: {:.1}", fps);
                }

                let pose = self.controller.tick();
                self.camera.set_pose(pose);
                let anchors = self.labels.anchors(&self.camera);

                if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
                    let hud = HudFrame {
                        fps: self.fps_counter.fps(),
                        scroll: self.controller.scroll(),
                        labels: self.labels.labels(),
                        anchors: &anchors,
                    };
                    match renderer.render(&self.camera, window, &hud) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = renderer.size();
                            renderer.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("Render error: out of GPU memory");
                            event_loop.exit();
                        }
                        Err(e) => eprintln!("Render error: {}", e),
                    }
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
    env_logger::init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.boxes.seed = seed;
    }
    config.validate()?;

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, !cli.no_hud)?;

    println!("Tunnel Flyer - scroll to fly, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
