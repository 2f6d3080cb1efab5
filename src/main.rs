use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use pixel_loop::cli::Cli;
use pixel_loop::config::AppConfig;
use pixel_loop::demo::DemoGame;
use pixel_loop::{
    FixedStepLoop, Framebuffer, LoopConfig, LoopController, MonotonicClock, SharedSurface,
    WindowSurface,
};

struct App {
    config: AppConfig,
    controller: LoopController,
    surface_slot: SharedSurface,
    window: Option<Arc<Window>>,
    loop_thread: Option<JoinHandle<()>>,
    fullscreen: bool,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            controller: LoopController::new(),
            surface_slot: SharedSurface::new(),
            window: None,
            loop_thread: None,
            fullscreen: false,
        }
    }

    fn spawn_loop(&mut self) -> anyhow::Result<()> {
        let framebuffer = Framebuffer::new(self.config.width, self.config.height)
            .context("invalid framebuffer dimensions")?;
        let mut game = DemoGame::new(framebuffer, self.surface_slot.clone());
        let mut sim_loop = FixedStepLoop::new(
            LoopConfig {
                ticks_per_second: self.config.ticks_per_second,
            },
            MonotonicClock::new(),
        );

        self.controller.start()?;
        let controller = self.controller.clone();
        let handle = std::thread::Builder::new()
            .name("fixed-step-loop".into())
            .spawn(move || sim_loop.run(&controller, &mut game))
            .context("failed to spawn loop thread")?;
        self.loop_thread = Some(handle);

        Ok(())
    }

    /// Stop the loop, wait for it to return, then tear the window down.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.controller.stop();
        if let Some(handle) = self.loop_thread.take() {
            if handle.join().is_err() {
                log::error!("loop thread panicked");
            }
        }
        event_loop.exit();
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else { return };

        self.fullscreen = !self.fullscreen;
        if self.fullscreen {
            log::info!("entering fullscreen");
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            log::info!("leaving fullscreen");
            window.set_fullscreen(None);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (window_width, window_height) = self.config.window_size();
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(window_width, window_height)),
        ) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match WindowSurface::new(window.clone(), self.config.width, self.config.height) {
            Ok(surface) => self.surface_slot.install(surface),
            Err(e) => {
                log::error!("failed to initialize presentation surface: {e}");
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);

        if self.loop_thread.is_none() {
            if let Err(e) = self.spawn_loop() {
                log::error!("failed to start loop: {e}");
                self.shutdown(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::F11 => self.toggle_fullscreen(),
                _ => {}
            },
            WindowEvent::Resized(size) => self.surface_slot.resize(size.width, size.height),
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli)?;
    log::info!(
        "starting {}x{} framebuffer at {} ticks/sec",
        config.width,
        config.height,
        config.ticks_per_second
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
