use tessera_core::{NativeHandle, SurfaceId};

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("no canvas is registered for surface {0:?}")]
    UnknownSurface(SurfaceId),
    #[error("native object {0:?} does not belong to any node")]
    UnknownObject(NativeHandle),
    #[error("canvas for surface {0:?} is busy")]
    Busy(SurfaceId),
    #[error("invalid canvas scale {0}")]
    InvalidScale(f32),
}
