use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId, WindowLevel};

use crate::config::PetConfig;
use crate::ecs::systems::Simulation;
use crate::error::PetError;
use crate::platform;
use crate::render::instance::SlimeInstance;
use crate::render::GpuState;
use crate::shell::ShellHost;
use crate::slime;

/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    frame_count: u64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frame_count: 0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    /// Returns true when a log line is due.
    fn record_frame(&mut self, dt: f64) -> bool {
        self.frame_count += 1;
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_max = self.frame_time_max.max(dt);
        self.last_log_time.elapsed().as_secs_f64() >= FPS_LOG_INTERVAL
    }

    fn log(&mut self, sim: &Simulation) {
        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        let avg_ms = (self.frame_time_sum / self.frames_since_log.max(1) as f64) * 1000.0;
        log::info!(
            "FPS: {:.0} | avg: {:.2}ms | max: {:.2}ms | frames: {} | ticks: {}",
            self.frames_since_log as f64 / elapsed,
            avg_ms,
            self.frame_time_max * 1000.0,
            self.frame_count,
            sim.tick_count(),
        );
        log::debug!("Systems: {}", sim.timers().summary());
        self.last_log_time = Instant::now();
        self.frame_time_sum = 0.0;
        self.frame_time_max = 0.0;
        self.frames_since_log = 0;
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    host: ShellHost,
    sim: Simulation,
    last_frame_time: Option<Instant>,
    frame_stats: FrameStats,
    pointer: Vec2,
    /// Reused every frame.
    instance_buf: Vec<SlimeInstance>,
    /// Startup failure to report once the loop exits.
    fatal: Option<PetError>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            host: ShellHost::default(),
            sim: Simulation::new(hecs::World::new(), fastrand::Rng::new()),
            last_frame_time: None,
            frame_stats: FrameStats::new(),
            pointer: Vec2::ZERO,
            instance_buf: Vec::new(),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PetError> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| PetError::Display("no monitor found".into()))?;
        let screen_size = monitor.size();

        // Start hidden; shown once the slime has been placed
        let attrs = WindowAttributes::default()
            .with_title("SlimePet")
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_visible(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            .with_inner_size(screen_size)
            .with_position(winit::dpi::PhysicalPosition::new(0, 0));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| PetError::Display(format!("failed to create window: {e}")))?,
        );

        let size = window.inner_size();
        log::info!(
            "Overlay window created: {}x{} on {:?}",
            size.width,
            size.height,
            monitor.name().unwrap_or_default()
        );

        self.gpu = Some(GpuState::new(window.clone())?);
        self.host = ShellHost::new(window.clone());

        let mut config = PetConfig::default();
        let screen = Vec2::new(size.width as f32, size.height as f32);
        config.spawn = ((screen - config.sprite_size) * 0.5).max(Vec2::ZERO);
        slime::spawn_slime(self.sim.world_mut(), &config);
        self.sim.start(&mut self.host)?;
        log::info!("Slime spawned at {:?}", config.spawn);

        if platform::supports_click_through() {
            self.host.enable_click_through();
            log::info!("Click-through enabled; the slime takes the pointer only on hover");
        } else {
            log::info!("No global pointer polling here; the overlay keeps every click");
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        window.set_visible(true);
        self.window = Some(window);
        Ok(())
    }

    fn pointer_at(&mut self, pointer: Vec2) {
        if pointer != self.pointer {
            self.pointer = pointer;
            self.sim.pointer_moved(pointer, &mut self.host);
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_frame_time {
            let dt = now.duration_since(last).as_secs_f64();
            self.sim.advance(dt, &mut self.host);
            if self.frame_stats.record_frame(dt) {
                self.frame_stats.log(&self.sim);
            }
        }
        self.last_frame_time = Some(now);

        self.host.build_instances(&mut self.instance_buf);
        if let Some(gpu) = &mut self.gpu {
            gpu.update_instances(&self.instance_buf);
            gpu.render_frame(self.host.backdrop());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.fatal.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else { return };

        // While click-through, winit delivers no pointer or key events
        if platform::escape_pressed() {
            log::info!("ESC pressed, exiting");
            event_loop.exit();
            return;
        }
        if let Some(pointer) = platform::global_cursor() {
            self.pointer_at(pointer);
        }

        window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("ESC pressed, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.host.resize(new_size.width, new_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_at(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.sim.pointer_pressed(self.pointer, &mut self.host),
                ElementState::Released => self.sim.pointer_released(self.pointer, &mut self.host),
            },
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

/// Entry point: create the event loop and run until the window closes.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    match app.fatal {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
