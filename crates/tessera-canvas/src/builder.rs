//! Creation of native objects for leaf nodes.

use tessera_core::{
    CanvasObject, NativeHandle, NativeKind, Size, Text, VectorCircle, theme,
};

use crate::canvas::CanvasState;
use crate::scale::{scale_int, unscale_int};

/// Margin, in logical units, around vector shapes so wide strokes are not
/// clipped by the object bounds.
pub const VECTOR_PAD: i32 = 10;

// spacing the native text primitive leaves between glyphs
const GLYPH_GAP: i32 = 2;

impl CanvasState {
    /// Creates, registers and shows the native object for a leaf node.
    ///
    /// Returns `None` for nodes with no native counterpart.
    pub(crate) fn build_object(
        &mut self,
        o: &CanvasObject,
        target: &CanvasObject,
        size: Size,
    ) -> Option<NativeHandle> {
        let obj = match o {
            CanvasObject::Text(t) => {
                let obj = self.backend.add_object(NativeKind::Text);
                self.backend.set_text(obj, &t.text());
                self.backend.set_color(obj, t.color());
                self.update_text_min_size(obj, t);
                obj
            }
            CanvasObject::Rectangle(r) => {
                let obj = self.backend.add_object(NativeKind::Rectangle);
                self.backend.set_color(obj, r.fill_color());
                obj
            }
            CanvasObject::Image(img) => {
                let obj = self.backend.add_object(NativeKind::Image);
                self.backend.set_image_alpha(obj, false);
                self.backend.set_image_filled(obj, true);
                if let Some(res) = img.resource() {
                    self.backend.set_image_file(obj, &res.path);
                }
                obj
            }
            CanvasObject::Line(l) => {
                let obj = self.backend.add_object(NativeKind::Line);
                self.backend.set_color(obj, l.stroke_color());
                obj
            }
            CanvasObject::Circle(c) => {
                let obj = self.backend.add_object(NativeKind::Vector);
                let size = size.abs();
                let fill = c.fill_color();
                self.backend.set_vector_circle(
                    obj,
                    VectorCircle {
                        cx: f64::from(scale_int(self.scale, VECTOR_PAD + size.width / 2)),
                        cy: f64::from(scale_int(self.scale, VECTOR_PAD + size.height / 2)),
                        radius: f64::from(scale_int(self.scale, size.width / 2)),
                        stroke_color: c.stroke_color(),
                        stroke_width: f64::from(c.stroke_width() * self.scale),
                        fill: (fill.a() != 0).then_some(fill),
                    },
                );
                obj
            }
            CanvasObject::Container(_) | CanvasObject::Widget(_) | CanvasObject::Custom(_) => {
                log::warn!("unrecognised object {o:?}, not drawn");
                return None;
            }
        };

        self.registry.register(o, obj, target);
        self.backend.listen_mouse_down(obj);
        self.backend.show(obj);
        log::debug!("built {obj:?} for {o:?}");
        Some(obj)
    }

    /// Applies the font, measures the glyph run and feeds the logical size
    /// back as the node's minimum.
    pub(crate) fn update_text_min_size(&mut self, obj: NativeHandle, t: &Text) -> Size {
        self.update_font(obj, t);
        let native = self.native_text_bounds(obj);
        let min = Size::new(
            unscale_int(self.scale, native.width),
            unscale_int(self.scale, native.height),
        );
        t.base().set_min_size(min);
        min
    }

    fn update_font(&mut self, obj: NativeHandle, t: &Text) {
        let theme = theme::current();
        let family = theme.font_for(t.style());
        self.backend
            .set_font(obj, family, scale_int(self.scale, t.font_size()));
    }

    /// Physical size of the laid out glyph run.
    fn native_text_bounds(&self, obj: NativeHandle) -> Size {
        (0..self.backend.text_char_count(obj))
            .map(|i| self.backend.text_char_extents(obj, i))
            .fold(Size::default(), |acc, (w, h)| {
                Size::new(acc.width + w + GLYPH_GAP, acc.height.max(h))
            })
    }
}
