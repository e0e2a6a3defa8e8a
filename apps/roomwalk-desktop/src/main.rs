use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use roomwalk_config::{RoomwalkConfig, WindowConfig};
use roomwalk_input::KeyBindings;
use roomwalk_kernel::{FrameLoop, FrameReport, MonotonicClock, SimulationState};
use roomwalk_render::Projection;
use roomwalk_render_wgpu::WgpuRenderer;
use roomwalk_scene::Scene;
use roomwalk_tools::FrameInspector;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Radians of yaw/pitch per pixel of mouse motion.
const MOUSE_SENSITIVITY: f64 = 0.002;

#[derive(Parser)]
#[command(name = "roomwalk-desktop", about = "Walk around the furnished room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    scene: Scene,
    frame_loop: FrameLoop<MonotonicClock>,
    bindings: KeyBindings,
    projection: Projection,
    last_report: Option<FrameReport>,
    show_hud: bool,
    pointer_locked: bool,
}

impl AppState {
    fn new(config: &RoomwalkConfig, scene: Scene) -> Self {
        let mut projection = config.projection;
        projection.resize(config.window.width, config.window.height);
        Self {
            scene,
            frame_loop: FrameLoop::new(
                SimulationState::new(config.spawn),
                config.motion,
                MonotonicClock::new(),
            ),
            bindings: config.bindings.clone(),
            projection,
            last_report: None,
            show_hud: true,
            pointer_locked: false,
        }
    }

    /// Returns `true` when the key asks to release the pointer lock.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let name = format!("{key:?}");
        let flags = self.frame_loop.state_mut().flags_mut();
        if self.bindings.apply(flags, &name, pressed).is_some() || !pressed {
            return false;
        }
        match key {
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
                false
            }
            KeyCode::Escape => self.pointer_locked,
            _ => false,
        }
    }

    fn look(&mut self, dx: f64, dy: f64) {
        if self.pointer_locked {
            self.frame_loop
                .state_mut()
                .pose_mut()
                .look(-dx * MOUSE_SENSITIVITY, -dy * MOUSE_SENSITIVITY);
        }
    }

    fn draw_hud(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let state = self.frame_loop.state();
        egui::Window::new("roomwalk")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                match &self.last_report {
                    Some(report) => {
                        let summary = FrameInspector::summary(&self.scene, state, report);
                        ui.label(format!("Frame: {}", summary.frame));
                        ui.label(format!(
                            "Position: ({:.2}, {:.2}, {:.2})",
                            summary.position[0], summary.position[1], summary.position[2]
                        ));
                        ui.label(format!(
                            "Yaw: {:.2}  Pitch: {:.2}",
                            summary.yaw, summary.pitch
                        ));
                        ui.label(format!("Speed: {:.5}", summary.horizontal_speed));
                        ui.label(format!("Keys: {}", summary.keys));
                        if let Some(name) = &summary.blocked_by {
                            ui.colored_label(egui::Color32::LIGHT_RED, format!("Blocked by {name}"));
                        }
                    }
                    None => {
                        ui.label("Waiting for first frame");
                    }
                }
                ui.separator();
                ui.small(if self.pointer_locked {
                    "WASD: Move | C: Spin | Esc: Release mouse | F1: Toggle HUD"
                } else {
                    "Click to look around | WASD: Move | C: Spin | F1: Toggle HUD"
                });
            });
    }
}

struct GpuApp {
    state: AppState,
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(config: RoomwalkConfig, scene: Scene) -> Self {
        Self {
            state: AppState::new(&config, scene),
            window_config: config.window,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("roomwalk_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.state.projection.resize(size.width, size.height);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            "GPU initialized"
        );

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn lock_pointer(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.state.pointer_locked = true;
                tracing::debug!("pointer locked");
            }
            Err(e) => tracing::warn!("cursor grab unavailable: {e}"),
        }
    }

    fn release_pointer(&mut self) {
        if !self.state.pointer_locked {
            return;
        }
        if let Some(window) = &self.window {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
        }
        self.state.pointer_locked = false;
        tracing::debug!("pointer released");
    }

    fn redraw(&mut self) {
        let report = self.state.frame_loop.advance(&self.state.scene);
        self.state.last_report = Some(report);

        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
        )
        else {
            return;
        };

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        renderer.render(
            device,
            queue,
            &view,
            &self.state.scene,
            self.state.frame_loop.state().pose(),
            &self.state.projection,
        );

        let raw_input = egui_winit.take_egui_input(window);
        let state = &self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_hud(ctx);
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("GPU initialization failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // egui only sees input while the pointer is free.
        if !self.state.pointer_locked {
            if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
                if egui_winit.on_window_event(window, &event).consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state.projection.resize(new_size.width, new_size.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key, key_state == ElementState::Pressed) {
                    self.release_pointer();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if !self.state.pointer_locked {
                    self.lock_pointer();
                }
            }
            WindowEvent::Focused(false) => {
                // Key-up events are lost while unfocused.
                self.state.frame_loop.state_mut().flags_mut().clear();
                self.release_pointer();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.look(delta.0, delta.1);
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

    tracing::info!("roomwalk-desktop starting");

    let config = match &cli.config {
        Some(path) => RoomwalkConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RoomwalkConfig::default(),
    };
    let scene = config.build_scene()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, scene);
    event_loop.run_app(&mut app)?;

    Ok(())
}
