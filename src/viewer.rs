//! Standalone viewer window backed by winit, with egui parameter panels.
//!
//! ```no_run
//! # use parasurf::Viewer;
//! Viewer::builder().build().run().unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::axes::create_axes;
use crate::camera::Camera;
use crate::error::ParasurfError;
use crate::gpu::render_context::RenderContext;
use crate::input::InputEvent;
use crate::options::Options;
use crate::scene::{Component, Handle, Object, Scene};
use crate::surface::create_surface;
use crate::ui;
use crate::util::frame_timing::FrameTiming;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            options: None,
            title: "Parasurf".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the parametric surface scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ParasurfError::Viewer`] if the event loop cannot be
    /// created or fails while running.
    pub fn run(self) -> Result<(), ParasurfError> {
        let event_loop = EventLoop::new()
            .map_err(|e| ParasurfError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            stage: None,
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ParasurfError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Everything that exists only once the window does: GPU context, scene,
/// and the egui plumbing.
struct Stage {
    gpu: RenderContext,
    scene: Scene,
    surface: Handle,
    camera: Handle,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    timing: FrameTiming,
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    stage: Option<Stage>,
    options: Options,
    title: String,
}

impl Stage {
    fn new(
        window: &Arc<Window>,
        event_loop: &ActiveEventLoop,
        options: &Options,
    ) -> Result<Self, ParasurfError> {
        let size = window.inner_size();
        let gpu = pollster::block_on(RenderContext::new(
            window.clone(),
            (size.width.max(1), size.height.max(1)),
        ))?;

        let mut scene = Scene::new();

        let mut camera_params = options.camera;
        camera_params.aspect = gpu.aspect();
        let mut camera = Camera::new(camera_params);
        camera.set_pose(glam::Vec3::new(0.0, 0.0, 2.0), glam::Vec2::ZERO);
        let mut camera_obj = Object::new();
        camera_obj.add_component(Component::Camera(camera));
        let camera_handle = scene.add_main_camera(camera_obj);

        let surface_handle =
            scene.add_object(create_surface(&gpu, options.surface.clone())?);
        scene.add_object(create_axes(&gpu)?);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            event_loop,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format(),
            egui_wgpu::RendererOptions::default(),
        );

        Ok(Self {
            gpu,
            scene,
            surface: surface_handle,
            camera: camera_handle,
            egui_ctx,
            egui_state,
            egui_renderer,
            timing: FrameTiming::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        let aspect = self.gpu.aspect();
        if let Some(camera) = self
            .scene
            .object_mut(self.camera)
            .and_then(Object::camera_mut)
        {
            camera.set_aspect(aspect);
        }
    }

    fn frame(&mut self, window: &Window) {
        let dt = self.timing.tick();
        self.scene.update(&self.gpu, dt);

        // UI pass: the panels mutate the editable parameter structs; the
        // components observe the changes on the next update.
        let raw_input = self.egui_state.take_egui_input(window);
        let scene = &mut self.scene;
        let (surface, camera) = (self.surface, self.camera);
        let fps = self.timing.fps();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if let Some(editor) = scene
                .object_mut(surface)
                .and_then(Object::surface_editor_mut)
            {
                ui::surface_panel(ctx, editor);
            }
            if let Some(camera) =
                scene.object_mut(camera).and_then(Object::camera_mut)
            {
                ui::camera_panel(ctx, camera, fps);
            }
        });
        self.egui_state
            .handle_platform_output(window, full_output.platform_output);
        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        // Uniform writes and dirty-mesh uploads happen before the pass.
        self.scene.prepare(&self.gpu);

        let frame = match self.gpu.get_next_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let size = window.inner_size();
                self.resize(size.width, size.height);
                window.request_redraw();
                return;
            }
            Err(e) => {
                log::error!("render error: {e:?}");
                window.request_redraw();
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu.create_encoder();
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Scene Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: 0.02,
                                    g: 0.02,
                                    b: 0.03,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.gpu.depth,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
            self.scene.record(&mut pass);
        }

        for (id, delta) in full_output.textures_delta.set {
            self.egui_renderer.update_texture(
                &self.gpu.device,
                &self.gpu.queue,
                id,
                &delta,
            );
        }
        self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen,
        );
        {
            let pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("UI Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
            let mut pass = pass.forget_lifetime();
            self.egui_renderer.render(&mut pass, &paint_jobs, &screen);
        }
        for id in full_output.textures_delta.free {
            self.egui_renderer.free_texture(&id);
        }

        self.gpu.submit(encoder);
        frame.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (mon_size.width as f64 / scale * 0.75) as u32;
            let logical_h = (mon_size.height as f64 / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let stage = match Stage::new(&window, event_loop, &self.options) {
            Ok(stage) => stage,
            Err(e) => {
                log::error!("failed to initialize: {e}");
                event_loop.exit();
                return;
            }
        };

        window.request_redraw();
        self.window = Some(window);
        self.stage = Some(stage);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        let (Some(window), Some(stage)) = (&self.window, &mut self.stage)
        else {
            return;
        };
        let consumed =
            stage.egui_state.on_window_event(window, &event).consumed;

        match event {
            WindowEvent::Resized(size) => {
                stage.resize(size.width.max(1), size.height.max(1));
            }

            // Key releases can no longer be observed, so the controller
            // accumulator would be left unbalanced.
            WindowEvent::Focused(false) => {
                stage.scene.input.push(InputEvent::Reset);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if consumed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key_str = format!("{code:?}");
                if let Some(binding) = self.options.keys.lookup(&key_str) {
                    stage.scene.input.push(InputEvent::Key {
                        binding,
                        pressed: event.state == ElementState::Pressed,
                    });
                }
            }

            WindowEvent::RedrawRequested => {
                let window = window.clone();
                stage.frame(&window);
            }

            _ => (),
        }
    }
}
