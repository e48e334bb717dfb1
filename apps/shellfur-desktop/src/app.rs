use crate::keymap::{PIXELS_PER_LINE, route_key};
use crate::ui::draw_tuning_panel;
use anyhow::Context as _;
use egui::Context as EguiContext;
use glam::Vec2;
use shellfur_assets::load_scene_assets;
use shellfur_common::ShellConfig;
use shellfur_input::InputSnapshot;
use shellfur_kernel::{FpsCounter, FrameClock, Scene, fps_title};
use shellfur_render::{FrameView, LightingState, Viewport};
use shellfur_render_wgpu::{GpuContext, ShellRenderer};
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{CursorGrabMode, Window, WindowId};

/// Platform-independent application state.
struct AppState {
    config: ShellConfig,
    scene: Scene,
    lighting: LightingState,
    previous: InputSnapshot,
    current: InputSnapshot,
    clock: FrameClock,
    fps: FpsCounter,
    /// Latest resize, applied at the top of the next frame.
    pending_resize: Option<PhysicalSize<u32>>,
    close_requested: bool,
}

impl AppState {
    fn new(config: ShellConfig) -> Self {
        let now = Instant::now();
        Self {
            scene: Scene::new(&config),
            lighting: LightingState::default(),
            previous: InputSnapshot::new(),
            current: InputSnapshot::new(),
            clock: FrameClock::new(now),
            fps: FpsCounter::new(now),
            pending_resize: None,
            close_requested: false,
            config,
        }
    }

    fn design_size(&self) -> (u32, u32) {
        (self.config.window.width, self.config.window.height)
    }

    /// Close the frame's input window: this frame's snapshot becomes the
    /// edge reference for the next one.
    fn end_input_frame(&mut self) {
        self.previous = self.current.carry_over();
        self.current = self.current.carry_over();
    }
}

pub struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<ShellRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
            init_error: None,
        }
    }

    /// Fatal initialization error, if startup failed.
    pub fn take_init_error(&mut self) -> Option<anyhow::Error> {
        self.init_error.take()
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let cfg = &self.state.config.window;
        let attrs = Window::default_attributes()
            .with_title(cfg.title.clone())
            .with_inner_size(PhysicalSize::new(cfg.width, cfg.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize GPU")?;

        let assets = load_scene_assets(&self.state.config.mesh);
        let renderer = ShellRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.format(),
            gpu.size(),
            &assets.mesh,
            &assets.texture,
            self.state.lighting.markers(),
            gpu.wireframe_supported,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        set_pointer_captured(&window, true);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn apply_pending_resize(&mut self) {
        let Some(size) = self.state.pending_resize.take() else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(size.width, size.height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, size.width, size.height);
            }
        }
    }

    fn redraw(&mut self) {
        self.apply_pending_resize();

        let now = Instant::now();
        let dt = self.state.clock.tick(now);
        let outcome = self
            .state
            .scene
            .step(&self.state.previous, &self.state.current, dt);
        self.state.end_input_frame();

        let ui_mode = self.state.scene.modes().ui_mode;
        if outcome.ui_mode_changed {
            if let Some(window) = &self.window {
                set_pointer_captured(window, !ui_mode);
            }
        }
        if outcome.close_requested {
            self.state.close_requested = true;
        }

        if let Some(fps) = self.state.fps.frame(now) {
            if let Some(window) = &self.window {
                window.set_title(&fps_title(&self.state.config.window.title, fps));
            }
        }

        let (Some(window), Some(gpu), Some(renderer)) = (&self.window, &self.gpu, &self.renderer)
        else {
            return;
        };

        let Some(viewport) = Viewport::fit(self.state.design_size(), gpu.size()) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
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

        let frame = FrameView::capture(&self.state.scene, &self.state.lighting, viewport);
        renderer.render(&gpu.device, &gpu.queue, &view, &frame);

        if ui_mode {
            if let (Some(egui_winit), Some(egui_renderer)) =
                (&mut self.egui_winit, &mut self.egui_renderer)
            {
                let raw_input = egui_winit.take_egui_input(window);
                let fps = self.state.fps.latest();
                let scene = &mut self.state.scene;
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    draw_tuning_panel(ctx, scene, fps);
                });
                egui_winit.handle_platform_output(window, full_output.platform_output);

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);
                let (width, height) = gpu.size();
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: full_output.pixels_per_point,
                };

                for (id, image_delta) in &full_output.textures_delta.set {
                    egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
                }
                let mut encoder = gpu
                    .device
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("egui_encoder"),
                    });
                egui_renderer.update_buffers(
                    &gpu.device,
                    &gpu.queue,
                    &mut encoder,
                    &paint_jobs,
                    &screen_descriptor,
                );
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
                gpu.queue.submit(std::iter::once(encoder.finish()));
                for id in &full_output.textures_delta.free {
                    egui_renderer.free_texture(id);
                }
            }
        }

        output.present();
    }
}

/// Capture (hide and lock) or release the pointer.
fn set_pointer_captured(window: &Window, captured: bool) {
    if captured {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("pointer grab unavailable: {e}");
        }
    } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        tracing::warn!("pointer release failed: {e}");
    }
    window.set_cursor_visible(!captured);
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(()) => tracing::info!("renderer initialized"),
            Err(err) => {
                tracing::error!("{err:#}");
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let ui_mode = self.state.scene.modes().ui_mode;
        let mut ui_consumed = false;
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            ui_consumed = ui_mode && egui_winit.on_window_event(window, &event).consumed;
        }
        // Keys are filtered per transition in `route_key`.
        if ui_consumed && !matches!(event, WindowEvent::KeyboardInput { .. }) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.state.pending_resize = Some(new_size);
            }
            WindowEvent::Focused(false) => {
                self.state.current.release_all();
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
                route_key(
                    &mut self.state.current,
                    key,
                    key_state == ElementState::Pressed,
                    ui_consumed,
                );
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.state.current.add_scroll(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if self.state.close_requested {
                    event_loop.exit();
                } else if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
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
            if !self.state.scene.modes().ui_mode {
                self.state
                    .current
                    .add_look_delta(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // GPU objects go before the window they render into.
        self.egui_renderer = None;
        self.renderer = None;
        self.gpu = None;
        if self.init_error.is_none() {
            tracing::info!("shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shellfur_input::Action;

    #[test]
    fn toggle_edges_survive_frame_boundaries() {
        let mut state = AppState::new(ShellConfig::default());
        state.current.press(Action::ToggleFlashlight);
        for _ in 0..5 {
            state.scene.step(&state.previous, &state.current, 0.016);
            state.end_input_frame();
        }
        assert!(state.scene.modes().flashlight);
    }

    #[test]
    fn look_deltas_cleared_each_frame() {
        let mut state = AppState::new(ShellConfig::default());
        state.current.add_look_delta(Vec2::new(5.0, 5.0));
        state.end_input_frame();
        assert_eq!(state.current.look_delta(), Vec2::ZERO);
        assert_eq!(state.previous.look_delta(), Vec2::ZERO);
    }
}
