use tessera_core::{CanvasObject, PhysicalRect, Position, Size};

use crate::builder::VECTOR_PAD;
use crate::canvas::CanvasState;
use crate::scale::scale_int;

impl CanvasState {
    /// Pushes the geometry of one leaf at absolute logical position `pos`,
    /// building its native object first if it has none yet.
    pub(crate) fn refresh_object(
        &mut self,
        o: &CanvasObject,
        target: &CanvasObject,
        pos: Position,
        size: Size,
    ) {
        let obj = match self.registry.lookup_native(o) {
            Some(obj) => obj,
            None => match self.build_object(o, target, size) {
                Some(obj) => obj,
                None => return,
            },
        };

        match o {
            CanvasObject::Text(t) => {
                self.backend.set_text(obj, &t.text());
                let min = self.update_text_min_size(obj, t);
                let centred = Position::new(
                    pos.x + (size.width - min.width) / 2,
                    pos.y + (size.height - min.height) / 2,
                );
                self.backend.set_geometry(obj, self.physical_rect(centred, size));
            }
            CanvasObject::Image(img) => {
                let old = self.backend.geometry(obj);
                let rect = self.physical_rect(pos, size);
                self.backend.set_geometry(obj, rect);

                if let Some(f) = img.pixel_color()
                    && (old.w != rect.w || old.h != rect.h)
                {
                    self.backend.set_image_size(obj, rect.w, rect.h);
                    self.render_image(o, &f, rect.w, rect.h);
                }
            }
            CanvasObject::Circle(_) => {
                self.backend
                    .set_geometry(obj, circle_bounds(self.scale, pos, size));
            }
            CanvasObject::Line(_) => {
                let [x1, y1, x2, y2] = line_endpoints(self.scale, pos, size);
                self.backend.set_line(obj, x1, y1, x2, y2);
            }
            _ => {
                self.backend.set_geometry(obj, self.physical_rect(pos, size));
            }
        }
    }
}

/// Physical endpoints of a line whose box starts at `pos` and whose signed
/// `size` runs from its first point to its second.
pub fn line_endpoints(scale: f32, pos: Position, size: Size) -> [i32; 4] {
    let s = |v| scale_int(scale, v);
    match (size.width >= 0, size.height >= 0) {
        (true, true) => [s(pos.x), s(pos.y), s(pos.x + size.width), s(pos.y + size.height)],
        (true, false) => [s(pos.x), s(pos.y - size.height), s(pos.x + size.width), s(pos.y)],
        (false, true) => [s(pos.x - size.width), s(pos.y), s(pos.x), s(pos.y + size.height)],
        (false, false) => [s(pos.x - size.width), s(pos.y - size.height), s(pos.x), s(pos.y)],
    }
}

/// Bounds of the native object backing a circle.
pub fn circle_bounds(scale: f32, pos: Position, size: Size) -> PhysicalRect {
    let size = size.abs().inflate(VECTOR_PAD);
    PhysicalRect::new(
        scale_int(scale, pos.x - VECTOR_PAD),
        scale_int(scale, pos.y - VECTOR_PAD),
        scale_int(scale, size.width),
        scale_int(scale, size.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_down_right() {
        let got = line_endpoints(1.0, Position::new(10, 20), Size::new(30, 40));
        assert_eq!(got, [10, 20, 40, 60]);
    }

    #[test]
    fn test_line_up_right() {
        // p1 = (10, 60), p2 = (40, 20)
        let got = line_endpoints(1.0, Position::new(10, 20), Size::new(30, -40));
        assert_eq!(got, [10, 60, 40, 20]);
    }

    #[test]
    fn test_line_down_left() {
        // p1 = (40, 20), p2 = (10, 60)
        let got = line_endpoints(1.0, Position::new(10, 20), Size::new(-30, 40));
        assert_eq!(got, [40, 20, 10, 60]);
    }

    #[test]
    fn test_line_up_left() {
        let got = line_endpoints(2.0, Position::new(10, 20), Size::new(-30, -40));
        assert_eq!(got, [80, 120, 20, 40]);
    }

    #[test]
    fn test_circle_bounds_pad_both_sides() {
        let r = circle_bounds(1.0, Position::new(50, 50), Size::new(-20, 30));
        assert_eq!(r, PhysicalRect::new(40, 40, 40, 50));

        let r = circle_bounds(1.5, Position::new(50, 50), Size::new(20, 20));
        assert_eq!(r, PhysicalRect::new(60, 60, 60, 60));
    }
}
