//! Object/component scene model and per-frame update/draw orchestration.
//!
//! A [`Scene`] owns every live [`Object`], the input queue feeding the
//! movement [`Controller`], and frame timing. The frame pipeline is:
//! drain input, sweep deleted objects, update every component, then draw
//! every renderer-bearing object with the designated main camera.

mod handle;
mod object;

pub use handle::Handle;
pub use object::{Component, ComponentKind, Object};
use rustc_hash::FxHashMap;

use crate::gpu::render_context::RenderContext;
use crate::input::{Controller, InputEvent, InputQueue};

/// Per-frame context handed to component updates.
pub struct UpdateCtx<'a> {
    /// GPU context, for components that rebuild GPU resources mid-frame.
    pub gpu: &'a RenderContext,
    /// Accumulated movement/look axes.
    pub controller: &'a Controller,
    /// Wall-clock seconds since scene creation.
    pub time: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// The map of live objects plus the shared per-frame state.
pub struct Scene {
    objects: FxHashMap<Handle, Object>,
    main_camera: Option<Handle>,
    /// Pending input events, drained FIFO at the start of each update.
    pub input: InputQueue,
    /// Movement/look axis accumulator fed by the input queue.
    pub controller: Controller,
    /// Wall-clock seconds since scene creation (shader `time` uniform).
    pub time: f32,
    dt: f32,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: FxHashMap::default(),
            main_camera: None,
            input: InputQueue::new(),
            controller: Controller::default(),
            time: 0.0,
            dt: 0.0,
        }
    }

    /// Insert an object, returning its handle.
    pub fn add_object(&mut self, object: Object) -> Handle {
        let handle = object.handle();
        let _ = self.objects.insert(handle, object);
        handle
    }

    /// Insert an object and designate it as the main camera.
    pub fn add_main_camera(&mut self, object: Object) -> Handle {
        let handle = self.add_object(object);
        self.main_camera = Some(handle);
        handle
    }

    /// Handle of the designated main camera object, if any.
    #[must_use]
    pub fn main_camera(&self) -> Option<Handle> {
        self.main_camera
    }

    /// Look up an object by handle.
    #[must_use]
    pub fn object(&self, handle: Handle) -> Option<&Object> {
        self.objects.get(&handle)
    }

    /// Look up an object by handle, mutably.
    pub fn object_mut(&mut self, handle: Handle) -> Option<&mut Object> {
        self.objects.get_mut(&handle)
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Run one update phase: drain input, sweep deleted objects, then
    /// update every remaining object's components.
    pub fn update(&mut self, gpu: &RenderContext, dt: f32) {
        self.dt = dt;
        self.time += dt;

        self.drain_input();
        self.sweep_deleted();

        let ctx = UpdateCtx {
            gpu,
            controller: &self.controller,
            time: self.time,
            dt,
        };
        for object in self.objects.values_mut() {
            object.update(&ctx);
        }
    }

    /// Apply every queued input event to the controller, in FIFO order.
    fn drain_input(&mut self) {
        while let Some(event) = self.input.pop() {
            self.controller.apply(event);
        }
    }

    /// Remove objects marked deleted instead of updating them.
    fn sweep_deleted(&mut self) {
        self.objects.retain(|_, object| !object.deleted);
    }

    /// Run the pre-pass half of the draw phase: resolve the main camera's
    /// view/projection, then write uniforms and upload dirty meshes for
    /// every renderable object. Must run before the render pass is open,
    /// since uploads create new buffers.
    pub fn prepare(&mut self, gpu: &RenderContext) {
        let Some((view, proj)) = self.camera_matrices() else {
            return;
        };
        let time = self.time;
        for object in self.objects.values_mut() {
            object.prepare_draw(gpu, view, proj, time);
        }
    }

    /// Record draw calls for every renderable object into an open pass.
    pub fn record(&self, pass: &mut wgpu::RenderPass<'_>) {
        for object in self.objects.values() {
            if let (Some(renderer), Some(mesh)) =
                (object.renderer(), object.mesh())
            {
                renderer.record(pass, mesh);
            }
        }
    }

    /// View and projection matrices of the main camera.
    ///
    /// `None` when no main camera is designated. A designated object that
    /// lost its camera component (or was removed without clearing the
    /// designation) is a construction bug and panics.
    fn camera_matrices(&mut self) -> Option<(glam::Mat4, glam::Mat4)> {
        let handle = self.main_camera?;
        let camera = self
            .objects
            .get_mut(&handle)
            .and_then(Object::camera_mut)
            .expect("main camera object lost its Camera component");
        Some((camera.xform(), camera.projection()))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Axis, AxisBinding};

    fn key(axis: Axis, dir: f32, pressed: bool) -> InputEvent {
        InputEvent::Key {
            binding: AxisBinding { axis, dir },
            pressed,
        }
    }

    #[test]
    fn drain_applies_fifo_and_reset() {
        let mut scene = Scene::new();
        scene.input.push(key(Axis::MoveZ, -1.0, true));
        scene.input.push(key(Axis::LookX, 1.0, true));
        scene.input.push(InputEvent::Reset);
        scene.input.push(key(Axis::MoveY, 1.0, true));
        scene.drain_input();

        // Reset lands between the earlier presses and the later one.
        assert_eq!(scene.controller.movement.z, 0.0);
        assert_eq!(scene.controller.look.x, 0.0);
        assert_eq!(scene.controller.movement.y, 1.0);
        assert!(scene.input.pop().is_none());
    }

    #[test]
    fn sweep_removes_marked_objects() {
        let mut scene = Scene::new();
        let keep = scene.add_object(Object::new());
        let doomed = scene.add_object(Object::new());
        scene.object_mut(doomed).unwrap().deleted = true;

        scene.sweep_deleted();
        assert_eq!(scene.len(), 1);
        assert!(scene.object(keep).is_some());
        assert!(scene.object(doomed).is_none());
    }

    #[test]
    fn main_camera_designation() {
        let mut scene = Scene::new();
        assert!(scene.main_camera().is_none());
        let handle = scene.add_main_camera(Object::new());
        assert_eq!(scene.main_camera(), Some(handle));
    }
}
