use crate::{CanvasObject, Position, Size};

/// Positions a container's children within its size.
///
/// Like [`Widget::layout`](crate::Widget::layout), this runs in the middle of
/// a canvas refresh and must not expect calls back into the canvas to apply.
pub trait Layout {
    fn layout(&self, objects: &[CanvasObject], size: Size);
    fn min_size(&self, objects: &[CanvasObject]) -> Size;
}

/// Stacks every child at the origin, filling the available size.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxLayout;

impl Layout for MaxLayout {
    fn layout(&self, objects: &[CanvasObject], size: Size) {
        for o in objects {
            o.move_to(Position::default());
            o.resize(size);
        }
    }

    fn min_size(&self, objects: &[CanvasObject]) -> Size {
        objects
            .iter()
            .fold(Size::default(), |acc, o| acc.union(o.min_size()))
    }
}
