use std::{sync::Arc, time::Instant};

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::{
    assets::AssetQueue,
    config::SceneConfig,
    gfx::RenderEngine,
    session::{Session, Viewport},
    ui::UiManager,
};

pub struct MallowApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    session: Session,
    assets: AssetQueue,
    fatal: Option<anyhow::Error>,
}

impl MallowApp {
    /// Creates the app and starts loading the scene's models.
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut assets = AssetQueue::new().context("failed to start asset loader")?;

        let session = Session::new(config, Viewport::new(1200, 800, 1.0));
        for (role, path) in session.asset_requests() {
            assets.request(role, path);
        }

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                session,
                assets,
                fatal: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop failed")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.session.config().intro.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
            )
            .context("failed to create window")?;
        let window_handle = Arc::new(window);

        let PhysicalSize { width, height } = window_handle.inner_size();
        let lighting = self.session.config().lighting;
        let window_clone = window_handle.clone();
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, &lighting).await
        })?;

        self.session
            .resize(width, height, window_handle.scale_factor());

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window_handle);
        Ok(())
    }

    /// Pointer input reaches the camera only when nothing is on top of the scene.
    fn camera_input_blocked(&self) -> bool {
        self.session.intro.captures_input()
            || self
                .ui_manager
                .as_ref()
                .is_some_and(|ui| ui.wants_mouse())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        for event in self.assets.drain() {
            self.session.apply_asset(event);
        }

        let now = Instant::now();
        self.session.intro.update(now);
        self.session.tick();

        let Self {
            window,
            render_engine,
            ui_manager,
            session,
            ..
        } = self;
        let (Some(window), Some(render_engine)) = (window.as_ref(), render_engine.as_mut()) else {
            return;
        };

        let scale_factor = session.viewport().scale_factor as f32;
        render_engine.set_blur_radius(session.intro.blur_radius(now) * scale_factor);
        render_engine.prepare(&mut session.scene);

        let intro = &mut session.intro;
        let result = match ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame_with_ui(
                &session.scene,
                |device, queue, encoder, color_attachment| {
                    ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                        intro.draw(ui, now);
                    });
                },
            ),
            None => render_engine.render_frame_simple(&session.scene),
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => log::warn!("Dropped frame: {}", err),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            log::error!("{:#}", err);
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let ui_captured = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                ui_manager.handle_input(&window, &ui_event)
            }
            None => false,
        };

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.session.resize(width, height, window.scale_factor());
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                window.request_redraw();
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            // Releases and focus loss always reach the controller so a drag
            // never sticks
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            }
            | WindowEvent::Focused(false) => {
                self.session.scene.camera_manager.process_window_event(&event);
            }
            WindowEvent::MouseInput { .. } | WindowEvent::MouseWheel { .. } => {
                if !ui_captured && !self.camera_input_blocked() {
                    self.session.scene.camera_manager.process_window_event(&event);
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() || self.camera_input_blocked() {
            return;
        }

        let height = self.session.viewport().height;
        self.session
            .scene
            .camera_manager
            .process_device_event(&event, height);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
