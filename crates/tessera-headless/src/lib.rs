//! An in-memory [`NativeBackend`].
//!
//! Objects live in a slot map and keep every property the canvas sets on
//! them, so callers can inspect what a real surface would show. The backend
//! is a cheap clonable handle: hand one clone to the canvas and keep another
//! to look at the result or to simulate presses.

mod object;

use std::cell::{Ref, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;
use tessera_core::{
    Color, MouseButton, NativeBackend, NativeHandle, NativeKind, NativeMouseDown, PhysicalRect,
    SurfaceId, VectorCircle,
};

pub use object::{ImageData, NativeObject, ObjectData, TextData, glyph_extents};

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Default)]
pub struct Surface {
    pub size: (i32, i32),
    pub min_size: (i32, i32),
    objects: SlotMap<NativeHandle, NativeObject>,
    // creation order doubles as stacking order
    order: Vec<NativeHandle>,
}

#[derive(Clone, Debug)]
pub struct HeadlessBackend {
    id: SurfaceId,
    surface: Rc<RefCell<Surface>>,
}

impl HeadlessBackend {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            id: SurfaceId(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed)),
            surface: Rc::new(RefCell::new(Surface {
                size: (width, height),
                ..Surface::default()
            })),
        }
    }

    pub fn surface(&self) -> Ref<'_, Surface> {
        self.surface.borrow()
    }

    pub fn object(&self, obj: NativeHandle) -> Option<NativeObject> {
        self.surface.borrow().objects.get(obj).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.surface.borrow().objects.len()
    }

    /// Handles in stacking order, bottom first.
    pub fn handles(&self) -> Vec<NativeHandle> {
        self.surface.borrow().order.clone()
    }

    pub fn window_min_size(&self) -> (i32, i32) {
        self.surface.borrow().min_size
    }

    /// Hit-tests a press at physical `(x, y)` against visible objects that
    /// listen for mouse-down, top-most first.
    pub fn press(&self, x: i32, y: i32, button: u32) -> Option<NativeMouseDown> {
        let s = self.surface.borrow();
        let object = s.order.iter().rev().copied().find(|h| {
            s.objects
                .get(*h)
                .is_some_and(|o| o.visible && o.mouse_down && o.geometry.contains(x, y))
        })?;
        Some(NativeMouseDown {
            surface: self.id,
            object,
            x,
            y,
            button: MouseButton::from_native(button),
        })
    }

    fn with_object(&self, obj: NativeHandle, op: &str, f: impl FnOnce(&mut NativeObject)) {
        match self.surface.borrow_mut().objects.get_mut(obj) {
            Some(o) => f(o),
            None => log::warn!("{op}: unknown native object {obj:?}"),
        }
    }
}

impl NativeBackend for HeadlessBackend {
    fn surface_id(&self) -> SurfaceId {
        self.id
    }

    fn window_size(&self) -> (i32, i32) {
        self.surface.borrow().size
    }

    fn set_window_min_size(&mut self, width: i32, height: i32) {
        self.surface.borrow_mut().min_size = (width, height);
    }

    fn resize_window(&mut self, width: i32, height: i32) {
        let mut s = self.surface.borrow_mut();
        s.size = (width.max(s.min_size.0), height.max(s.min_size.1));
    }

    fn add_object(&mut self, kind: NativeKind) -> NativeHandle {
        let mut s = self.surface.borrow_mut();
        let h = s.objects.insert(NativeObject::new(kind));
        s.order.push(h);
        h
    }

    fn show(&mut self, obj: NativeHandle) {
        self.with_object(obj, "show", |o| o.visible = true);
    }

    fn listen_mouse_down(&mut self, obj: NativeHandle) {
        self.with_object(obj, "listen_mouse_down", |o| o.mouse_down = true);
    }

    fn set_color(&mut self, obj: NativeHandle, color: Color) {
        self.with_object(obj, "set_color", |o| o.color = color);
    }

    fn geometry(&self, obj: NativeHandle) -> PhysicalRect {
        self.surface
            .borrow()
            .objects
            .get(obj)
            .map(|o| o.geometry)
            .unwrap_or_default()
    }

    fn set_geometry(&mut self, obj: NativeHandle, rect: PhysicalRect) {
        self.with_object(obj, "set_geometry", |o| o.geometry = rect);
    }

    fn set_text(&mut self, obj: NativeHandle, text: &str) {
        self.with_object(obj, "set_text", |o| match &mut o.data {
            ObjectData::Text(t) => t.text = text.to_string(),
            _ => log::warn!("set_text on a {:?} object", o.kind),
        });
    }

    fn set_font(&mut self, obj: NativeHandle, family: &str, size: i32) {
        self.with_object(obj, "set_font", |o| match &mut o.data {
            ObjectData::Text(t) => t.font = Some((family.to_string(), size)),
            _ => log::warn!("set_font on a {:?} object", o.kind),
        });
    }

    fn text_char_count(&self, obj: NativeHandle) -> usize {
        self.surface
            .borrow()
            .objects
            .get(obj)
            .and_then(NativeObject::text)
            .map(|t| t.text.chars().count())
            .unwrap_or(0)
    }

    fn text_char_extents(&self, obj: NativeHandle, index: usize) -> (i32, i32) {
        let s = self.surface.borrow();
        let Some(t) = s.objects.get(obj).and_then(NativeObject::text) else {
            return (0, 0);
        };
        if index >= t.text.chars().count() {
            return (0, 0);
        }
        match &t.font {
            Some((family, size)) => glyph_extents(family, *size),
            None => (0, 0),
        }
    }

    fn set_image_alpha(&mut self, obj: NativeHandle, alpha: bool) {
        self.with_object(obj, "set_image_alpha", |o| {
            if let ObjectData::Image(i) = &mut o.data {
                i.alpha = alpha;
            }
        });
    }

    fn set_image_filled(&mut self, obj: NativeHandle, filled: bool) {
        self.with_object(obj, "set_image_filled", |o| {
            if let ObjectData::Image(i) = &mut o.data {
                i.filled = filled;
            }
        });
    }

    fn set_image_file(&mut self, obj: NativeHandle, path: &Path) {
        let decoded = object::decode_file(path);
        self.with_object(obj, "set_image_file", |o| {
            let ObjectData::Image(i) = &mut o.data else {
                log::warn!("set_image_file on a {:?} object", o.kind);
                return;
            };
            i.file = Some(path.to_path_buf());
            match decoded {
                Ok((size, pixels)) => {
                    i.size = size;
                    i.pixels = pixels;
                }
                Err(e) => log::warn!("could not load image {}: {e}", path.display()),
            }
        });
    }

    fn set_image_size(&mut self, obj: NativeHandle, width: i32, height: i32) {
        self.with_object(obj, "set_image_size", |o| {
            if let ObjectData::Image(i) = &mut o.data {
                i.size = (width, height);
            }
        });
    }

    fn set_image_data(&mut self, obj: NativeHandle, pixels: Vec<u32>) {
        self.with_object(obj, "set_image_data", |o| {
            let ObjectData::Image(i) = &mut o.data else {
                log::warn!("set_image_data on a {:?} object", o.kind);
                return;
            };
            let expected = (i.size.0.max(0) as usize) * (i.size.1.max(0) as usize);
            if pixels.len() != expected {
                log::warn!(
                    "image data has {} pixels, buffer is {}x{}",
                    pixels.len(),
                    i.size.0,
                    i.size.1
                );
            }
            i.pixels = pixels;
            i.uploads += 1;
        });
    }

    fn add_image_damage(&mut self, obj: NativeHandle, rect: PhysicalRect) {
        self.with_object(obj, "add_image_damage", |o| {
            if let ObjectData::Image(i) = &mut o.data {
                i.damage.push(rect);
            }
        });
    }

    fn set_line(&mut self, obj: NativeHandle, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.with_object(obj, "set_line", |o| {
            if !matches!(o.data, ObjectData::Line(_)) {
                log::warn!("set_line on a {:?} object", o.kind);
                return;
            }
            o.data = ObjectData::Line(Some([x1, y1, x2, y2]));
            o.geometry = PhysicalRect::new(
                x1.min(x2),
                y1.min(y2),
                (x2 - x1).abs() + 1,
                (y2 - y1).abs() + 1,
            );
        });
    }

    fn set_vector_circle(&mut self, obj: NativeHandle, circle: VectorCircle) {
        self.with_object(obj, "set_vector_circle", |o| match &mut o.data {
            ObjectData::Vector(c) => *c = Some(circle),
            _ => log::warn!("set_vector_circle on a {:?} object", o.kind),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_respects_min_size() {
        let mut b = HeadlessBackend::new(30, 30);
        b.set_window_min_size(58, 40);
        b.resize_window(20, 100);
        assert_eq!(b.window_size(), (58, 100));
    }

    #[test]
    fn test_text_extents_follow_font() {
        let mut b = HeadlessBackend::new(100, 100);
        let t = b.add_object(NativeKind::Text);
        b.set_text(t, "Hi");
        assert_eq!(b.text_char_extents(t, 0), (0, 0));

        b.set_font(t, "NotoSans-Regular", 20);
        assert_eq!(b.text_char_count(t), 2);
        assert_eq!(b.text_char_extents(t, 1), (12, 24));
        assert_eq!(b.text_char_extents(t, 2), (0, 0));

        b.set_font(t, "NotoSans-Bold", 20);
        assert_eq!(b.text_char_extents(t, 0), (13, 24));
    }

    #[test]
    fn test_press_hits_top_most_listener() {
        let mut b = HeadlessBackend::new(100, 100);
        let low = b.add_object(NativeKind::Rectangle);
        let high = b.add_object(NativeKind::Rectangle);
        let deaf = b.add_object(NativeKind::Rectangle);
        for h in [low, high, deaf] {
            b.set_geometry(h, PhysicalRect::new(0, 0, 50, 50));
            b.show(h);
        }
        b.listen_mouse_down(low);
        b.listen_mouse_down(high);

        let ev = b.press(10, 10, 1).expect("press lands on an object");
        assert_eq!(ev.object, high);
        assert_eq!(ev.button, MouseButton::Primary);
        assert!(b.press(60, 60, 1).is_none());
    }

    #[test]
    fn test_missing_image_file_is_not_fatal() {
        let mut b = HeadlessBackend::new(10, 10);
        let img = b.add_object(NativeKind::Image);
        b.set_image_file(img, Path::new("/nonexistent/tessera/icon.png"));

        let data = b.object(img).and_then(|o| o.image().cloned()).expect("image");
        assert!(data.file.is_some());
        assert!(data.pixels.is_empty());
    }

    #[test]
    fn test_image_file_is_decoded() {
        let path = std::env::temp_dir().join(format!("tessera-headless-{}.png", std::process::id()));
        let mut buf = image::RgbaImage::new(2, 1);
        buf.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        buf.put_pixel(1, 0, image::Rgba([0, 0, 255, 128]));
        buf.save(&path).expect("write png");

        let mut b = HeadlessBackend::new(10, 10);
        let img = b.add_object(NativeKind::Image);
        b.set_image_file(img, &path);
        let _ = std::fs::remove_file(&path);

        let data = b.object(img).and_then(|o| o.image().cloned()).expect("image");
        assert_eq!(data.size, (2, 1));
        assert_eq!(data.pixels, vec![0xFFFF_0000, 0x8000_00FF]);
    }
}
