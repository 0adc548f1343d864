use std::cell::RefCell;
use std::rc::Rc;

use tessera_core::{CanvasObject, NativeBackend, NativeHandle, Position, Size, SurfaceId, theme};

use crate::error::CanvasError;
use crate::main_loop;
use crate::registry::Registry;
use crate::scale::unscale_int;
use crate::surfaces::SurfaceRegistration;

/// Mirrors a scene graph onto one native surface.
///
/// Native objects are created once per node the first time the node is
/// seen and reused afterwards; every refresh re-runs layouts and pushes fresh
/// geometry to them.
pub struct Canvas {
    surface: SurfaceId,
    state: Rc<RefCell<CanvasState>>,
}

pub(crate) struct CanvasState {
    pub(crate) backend: Box<dyn NativeBackend>,
    pub(crate) scale: f32,
    pub(crate) content: Option<CanvasObject>,
    pub(crate) registry: Registry,
    surface: Option<SurfaceRegistration>,
}

impl Canvas {
    pub fn new(backend: impl NativeBackend + 'static, scale: f32) -> Self {
        Self {
            surface: backend.surface_id(),
            state: Rc::new(RefCell::new(CanvasState {
                backend: Box::new(backend),
                scale,
                content: None,
                registry: Registry::default(),
                surface: None,
            })),
        }
    }

    /// Replaces the content, discarding every native object mapping, builds
    /// the new tree and refreshes it.
    pub fn set_content(&self, o: impl Into<CanvasObject>) {
        let o = o.into();
        let _main = main_loop::begin();
        {
            let Ok(mut s) = self.state.try_borrow_mut() else {
                log::warn!("content {o:?} not set: canvas is busy");
                return;
            };
            // drop the old entry first, it would otherwise remove the new one
            s.surface = None;
            s.surface = Some(SurfaceRegistration::register(self.surface, &self.state));
            s.registry.clear();
            s.content = Some(o.clone());
            s.setup(&o);
        }
        self.refresh(&o);
    }

    /// Fits the window to the content, re-runs layouts and updates native
    /// geometry below `o`, which is anchored at the padded origin.
    ///
    /// A refresh requested while this canvas is already building or
    /// refreshing (from inside a layout) is logged and skipped.
    pub fn refresh(&self, o: &CanvasObject) {
        let _main = main_loop::begin();
        let Ok(mut s) = self.state.try_borrow_mut() else {
            log::warn!("refresh of {o:?} skipped: canvas is busy");
            return;
        };
        if s.content.is_none() {
            log::debug!("refresh of {o:?} skipped: canvas has no content");
            return;
        }
        s.refresh(o);
    }

    /// Whether `o` has been given a native object.
    pub fn contains(&self, o: &CanvasObject) -> bool {
        self.state.borrow().registry.contains(o)
    }

    pub fn native(&self, o: &CanvasObject) -> Option<NativeHandle> {
        self.state.borrow().registry.lookup_native(o)
    }

    pub fn content(&self) -> Option<CanvasObject> {
        self.state.borrow().content.clone()
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface
    }

    /// Logical size of the window.
    pub fn size(&self) -> Size {
        let s = self.state.borrow();
        let (w, h) = s.backend.window_size();
        Size::new(unscale_int(s.scale, w), unscale_int(s.scale, h))
    }

    pub fn scale(&self) -> f32 {
        self.state.borrow().scale
    }

    /// Resizes the window by the ratio of new to old scale and re-places the
    /// content. Native geometry catches up on the next refresh.
    pub fn set_scale(&self, scale: f32) -> Result<(), CanvasError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CanvasError::InvalidScale(scale));
        }
        let _main = main_loop::begin();
        let mut s = self
            .state
            .try_borrow_mut()
            .map_err(|_| CanvasError::Busy(self.surface))?;
        s.rescale(scale);
        Ok(())
    }

    /// Stops routing input from this canvas's surface to it.
    pub fn close(&self) -> Result<(), CanvasError> {
        let mut s = self
            .state
            .try_borrow_mut()
            .map_err(|_| CanvasError::Busy(self.surface))?;
        s.surface = None;
        Ok(())
    }
}

impl CanvasState {
    fn setup(&mut self, o: &CanvasObject) {
        match o {
            CanvasObject::Container(c) => self.build_container(&c.objects(), Some(o.clone())),
            CanvasObject::Widget(w) => {
                let children = w.layout(w.base().size());
                self.build_container(&children, Some(o.clone()));
            }
            _ => {
                self.build_object(o, o, o.size());
            }
        }
    }

    fn refresh(&mut self, o: &CanvasObject) {
        self.fit_content();
        let pad = theme::padding();
        let origin = Position::new(pad, pad);
        match o {
            CanvasObject::Container(c) => {
                c.apply_layout();
                self.refresh_container(&c.objects(), Some(o.clone()), origin, o.size());
            }
            CanvasObject::Widget(w) => {
                let children = w.layout(o.size());
                self.refresh_container(&children, Some(o.clone()), origin, o.size());
            }
            _ => self.refresh_object(o, o, origin, o.size()),
        }
    }

    pub(crate) fn is_content(&self, o: &CanvasObject) -> bool {
        self.content.as_ref() == Some(o)
    }
}
