//! Process-wide table from native surface to the canvas drawing on it, used
//! to route backend input events back to a canvas.
//!
//! Canvases live on the main thread, so the table does too.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tessera_core::SurfaceId;

use crate::canvas::CanvasState;

thread_local! {
    static CANVASES: RefCell<HashMap<SurfaceId, Weak<RefCell<CanvasState>>>> =
        RefCell::new(HashMap::new());
}

/// Owner-scoped table entry; removed again when dropped.
pub(crate) struct SurfaceRegistration {
    id: SurfaceId,
    canvas: Weak<RefCell<CanvasState>>,
}

impl SurfaceRegistration {
    pub(crate) fn register(id: SurfaceId, canvas: &Rc<RefCell<CanvasState>>) -> Self {
        let canvas = Rc::downgrade(canvas);
        CANVASES.with(|t| t.borrow_mut().insert(id, canvas.clone()));
        log::debug!("registered canvas for surface {id:?}");
        Self { id, canvas }
    }
}

impl Drop for SurfaceRegistration {
    fn drop(&mut self) {
        // the table may already be gone during thread teardown
        let _ = CANVASES.try_with(|t| {
            let mut t = t.borrow_mut();
            // a newer registration for the same surface stays
            if t.get(&self.id).is_some_and(|w| w.ptr_eq(&self.canvas)) {
                t.remove(&self.id);
                log::debug!("unregistered canvas for surface {:?}", self.id);
            }
        });
    }
}

pub(crate) fn lookup(id: SurfaceId) -> Option<Rc<RefCell<CanvasState>>> {
    CANVASES.with(|t| t.borrow().get(&id).and_then(Weak::upgrade))
}

/// Whether a canvas currently owns `id` on this thread.
pub fn is_registered(id: SurfaceId) -> bool {
    lookup(id).is_some()
}
