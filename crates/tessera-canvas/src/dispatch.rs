use tessera_core::{MouseEvent, NativeMouseDown, Position};

use crate::error::CanvasError;
use crate::main_loop;
use crate::scale::unscale_int;
use crate::surfaces;

/// Delivers a backend press to the node its native object was built for.
///
/// The position handed to the node is logical and relative to the native
/// object's origin. Returns whether a click handler ran.
pub fn dispatch_mouse_down(ev: NativeMouseDown) -> Result<bool, CanvasError> {
    let _main = main_loop::begin();
    let canvas = surfaces::lookup(ev.surface).ok_or(CanvasError::UnknownSurface(ev.surface))?;

    let (target, event) = {
        let state = canvas
            .try_borrow()
            .map_err(|_| CanvasError::Busy(ev.surface))?;
        let target = state
            .registry
            .lookup_abstract(ev.object)
            .cloned()
            .ok_or(CanvasError::UnknownObject(ev.object))?;
        let origin = state.backend.geometry(ev.object);
        let position = Position::new(
            unscale_int(state.scale, ev.x - origin.x),
            unscale_int(state.scale, ev.y - origin.y),
        );
        (
            target,
            MouseEvent {
                position,
                button: ev.button,
            },
        )
    };

    // handlers may refresh the canvas, so no borrow is held here
    match target.as_clickable() {
        Some(c) => {
            log::debug!("{:?} clicked at {:?}", target, event.position);
            c.on_clicked(&event);
            Ok(true)
        }
        None => Ok(false),
    }
}
