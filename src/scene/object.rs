use glam::Mat4;

use super::{Handle, UpdateCtx};
use crate::camera::Camera;
use crate::gpu::render_context::RenderContext;
use crate::mesh::Mesh;
use crate::renderer::Renderer;
use crate::surface::SurfaceEditor;

/// The closed set of component kinds an [`Object`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// CPU-side geometry plus its GPU buffers.
    Mesh,
    /// View/projection transform source.
    Camera,
    /// Linked pipeline that draws the object's mesh.
    Renderer,
    /// Live-editable surface parameters driving mesh/shader refresh.
    SurfaceEditor,
}

impl ComponentKind {
    /// All kinds, in slot order.
    pub const ALL: [Self; 4] =
        [Self::Mesh, Self::Camera, Self::Renderer, Self::SurfaceEditor];

    const fn index(self) -> usize {
        match self {
            Self::Mesh => 0,
            Self::Camera => 1,
            Self::Renderer => 2,
            Self::SurfaceEditor => 3,
        }
    }
}

/// A component instance, tagged by kind.
///
/// The component set is closed: dispatch is a `match`, not a vtable. Mesh and
/// Renderer carry no per-frame behavior of their own; they are read by the
/// draw phase.
pub enum Component {
    /// See [`Mesh`].
    Mesh(Mesh),
    /// See [`Camera`].
    Camera(Camera),
    /// See [`Renderer`].
    Renderer(Renderer),
    /// See [`SurfaceEditor`].
    SurfaceEditor(SurfaceEditor),
}

impl Component {
    /// The kind tag for this component.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Mesh(_) => ComponentKind::Mesh,
            Self::Camera(_) => ComponentKind::Camera,
            Self::Renderer(_) => ComponentKind::Renderer,
            Self::SurfaceEditor(_) => ComponentKind::SurfaceEditor,
        }
    }

    fn update(&mut self, ctx: &UpdateCtx<'_>, obj: &mut Object) {
        match self {
            Self::Mesh(_) | Self::Renderer(_) => {}
            Self::Camera(c) => c.update(ctx.controller, ctx.dt),
            Self::SurfaceEditor(e) => e.update(ctx, obj),
        }
    }
}

/// A scene object: a [`Handle`] plus at most one component per kind.
pub struct Object {
    handle: Handle,
    slots: [Option<Component>; 4],
    /// Marked objects are removed by the scene sweep instead of updated.
    pub deleted: bool,
}

impl Object {
    /// Create an empty object with a fresh handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: Handle::next(),
            slots: [None, None, None, None],
            deleted: false,
        }
    }

    /// This object's process-unique handle.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Attach a component. Returns `false` (leaving the existing component
    /// untouched) if a component of the same kind is already attached.
    pub fn add_component(&mut self, component: Component) -> bool {
        let slot = &mut self.slots[component.kind().index()];
        if slot.is_some() {
            log::warn!(
                "object {:#x}: duplicate {:?} component ignored",
                self.handle.raw(),
                component.kind()
            );
            return false;
        }
        *slot = Some(component);
        true
    }

    /// Whether a component of the given kind is attached.
    #[must_use]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// The attached mesh, if any.
    #[must_use]
    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.slots[ComponentKind::Mesh.index()] {
            Some(Component::Mesh(m)) => Some(m),
            _ => None,
        }
    }

    /// Mutable access to the attached mesh.
    pub fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.slots[ComponentKind::Mesh.index()] {
            Some(Component::Mesh(m)) => Some(m),
            _ => None,
        }
    }

    /// The attached camera, if any.
    #[must_use]
    pub fn camera(&self) -> Option<&Camera> {
        match &self.slots[ComponentKind::Camera.index()] {
            Some(Component::Camera(c)) => Some(c),
            _ => None,
        }
    }

    /// Mutable access to the attached camera.
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.slots[ComponentKind::Camera.index()] {
            Some(Component::Camera(c)) => Some(c),
            _ => None,
        }
    }

    /// The attached renderer, if any.
    #[must_use]
    pub fn renderer(&self) -> Option<&Renderer> {
        match &self.slots[ComponentKind::Renderer.index()] {
            Some(Component::Renderer(r)) => Some(r),
            _ => None,
        }
    }

    /// Mutable access to the attached renderer.
    pub fn renderer_mut(&mut self) -> Option<&mut Renderer> {
        match &mut self.slots[ComponentKind::Renderer.index()] {
            Some(Component::Renderer(r)) => Some(r),
            _ => None,
        }
    }

    /// The attached surface editor, if any.
    #[must_use]
    pub fn surface_editor(&self) -> Option<&SurfaceEditor> {
        match &self.slots[ComponentKind::SurfaceEditor.index()] {
            Some(Component::SurfaceEditor(e)) => Some(e),
            _ => None,
        }
    }

    /// Mutable access to the attached surface editor.
    pub fn surface_editor_mut(&mut self) -> Option<&mut SurfaceEditor> {
        match &mut self.slots[ComponentKind::SurfaceEditor.index()] {
            Some(Component::SurfaceEditor(e)) => Some(e),
            _ => None,
        }
    }

    /// Run every attached component's per-frame update.
    ///
    /// Each component is taken out of its slot for the duration of its own
    /// update so it can reach sibling components through `self` (the surface
    /// editor mutates its object's mesh and renderer). Iteration order over
    /// kinds is not part of the contract.
    pub fn update(&mut self, ctx: &UpdateCtx<'_>) {
        for kind in ComponentKind::ALL {
            if let Some(mut component) = self.slots[kind.index()].take() {
                component.update(ctx, self);
                self.slots[kind.index()] = Some(component);
            }
        }
    }

    /// Write draw uniforms and perform any pending mesh upload for this
    /// object. No-op unless both a renderer and a mesh are attached.
    pub fn prepare_draw(
        &mut self,
        gpu: &RenderContext,
        view: Mat4,
        proj: Mat4,
        time: f32,
    ) {
        let idx = ComponentKind::Renderer.index();
        if let Some(Component::Renderer(renderer)) = self.slots[idx].take() {
            if let Some(mesh) = self.mesh_mut() {
                renderer.prepare(gpu, mesh, view, proj, time);
            }
            self.slots[idx] = Some(Component::Renderer(renderer));
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraParams;
    use crate::mesh::{Mesh, Vertex};

    fn test_mesh(first_u: f32) -> Mesh {
        Mesh::new(
            vec![Vertex {
                position: [first_u, 0.0, 0.0],
                uv: [0.0, 0.0],
            }],
            vec![],
        )
    }

    #[test]
    fn add_component_rejects_duplicates() {
        let mut obj = Object::new();
        assert!(obj.add_component(Component::Mesh(test_mesh(1.0))));
        assert!(!obj.add_component(Component::Mesh(test_mesh(2.0))));

        // The original component survives the rejected insertion.
        let mesh = obj.mesh().unwrap();
        assert_eq!(mesh.vertices[0].position[0], 1.0);
    }

    #[test]
    fn typed_accessors_match_kind() {
        let mut obj = Object::new();
        assert!(obj.mesh().is_none());
        assert!(obj.camera().is_none());

        obj.add_component(Component::Camera(Camera::new(
            CameraParams::default(),
        )));
        assert!(obj.camera().is_some());
        assert!(obj.mesh().is_none());
        assert!(obj.has(ComponentKind::Camera));
        assert!(!obj.has(ComponentKind::Renderer));
    }

    #[test]
    fn handles_differ_between_objects() {
        assert_ne!(Object::new().handle(), Object::new().handle());
    }
}
