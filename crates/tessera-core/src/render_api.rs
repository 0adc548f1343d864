use std::path::Path;

use slotmap::new_key_type;

use crate::input::MouseButton;
use crate::{Color, PhysicalRect};

new_key_type! {
    /// Opaque backend-owned drawable.
    pub struct NativeHandle;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeKind {
    Text,
    Rectangle,
    Image,
    Line,
    Vector,
}

/// Circle path appended to a vector object, in physical units relative to
/// the object's origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorCircle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub fill: Option<Color>,
}

/// A press reported by the backend, in physical surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeMouseDown {
    pub surface: SurfaceId,
    pub object: NativeHandle,
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
}

/// A retained 2D drawing surface and its window.
///
/// Every method must be called from the thread that owns the surface. Calls
/// never fail from the caller's point of view; backends log and carry on.
pub trait NativeBackend {
    fn surface_id(&self) -> SurfaceId;

    fn window_size(&self) -> (i32, i32);
    fn set_window_min_size(&mut self, width: i32, height: i32);
    fn resize_window(&mut self, width: i32, height: i32);

    fn add_object(&mut self, kind: NativeKind) -> NativeHandle;
    fn show(&mut self, obj: NativeHandle);
    fn listen_mouse_down(&mut self, obj: NativeHandle);

    fn set_color(&mut self, obj: NativeHandle, color: Color);
    fn geometry(&self, obj: NativeHandle) -> PhysicalRect;
    fn set_geometry(&mut self, obj: NativeHandle, rect: PhysicalRect);

    fn set_text(&mut self, obj: NativeHandle, text: &str);
    fn set_font(&mut self, obj: NativeHandle, family: &str, size: i32);
    fn text_char_count(&self, obj: NativeHandle) -> usize;
    /// Advance width and height of the glyph at `index`.
    fn text_char_extents(&self, obj: NativeHandle, index: usize) -> (i32, i32);

    fn set_image_alpha(&mut self, obj: NativeHandle, alpha: bool);
    fn set_image_filled(&mut self, obj: NativeHandle, filled: bool);
    fn set_image_file(&mut self, obj: NativeHandle, path: &Path);
    fn set_image_size(&mut self, obj: NativeHandle, width: i32, height: i32);
    /// Installs 0xAARRGGBB pixels, row-major, sized by `set_image_size`.
    fn set_image_data(&mut self, obj: NativeHandle, pixels: Vec<u32>);
    fn add_image_damage(&mut self, obj: NativeHandle, rect: PhysicalRect);

    fn set_line(&mut self, obj: NativeHandle, x1: i32, y1: i32, x2: i32, y2: i32);
    fn set_vector_circle(&mut self, obj: NativeHandle, circle: VectorCircle);
}
