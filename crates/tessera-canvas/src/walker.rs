//! Recursive passes over containers and widgets.
//!
//! `target` is the node credited with input from the native objects built
//! below it. A subtree entered without one adopts its first leaf.

use tessera_core::{CanvasObject, NativeKind, PhysicalRect, Position, Size, theme};

use crate::canvas::CanvasState;
use crate::scale::scale_int;

impl CanvasState {
    /// Build pass: a background rectangle for the composite, then native
    /// objects for every leaf below it.
    pub(crate) fn build_container(
        &mut self,
        objects: &[CanvasObject],
        mut target: Option<CanvasObject>,
    ) {
        let bg = self.backend.add_object(NativeKind::Rectangle);
        self.backend.set_color(bg, theme::background_color());
        self.backend.show(bg);
        if let Some(t) = &target {
            self.registry.bind(t, bg);
        }

        for child in objects {
            match child {
                CanvasObject::Container(c) => {
                    self.build_container(&c.objects(), Some(child.clone()));
                }
                CanvasObject::Widget(w) => {
                    let children = w.layout(w.base().size());
                    self.build_container(&children, Some(child.clone()));
                }
                _ => {
                    let target = target.get_or_insert_with(|| child.clone()).clone();
                    self.build_object(child, &target, child.size());
                }
            }
        }
    }

    /// Refresh pass: re-runs layouts and pushes geometry for everything below
    /// `objects`, offset by `pos`.
    pub(crate) fn refresh_container(
        &mut self,
        objects: &[CanvasObject],
        mut target: Option<CanvasObject>,
        pos: Position,
        size: Size,
    ) {
        let (bg_pos, bg_size) = match &target {
            Some(t) if self.is_content(t) => {
                (Position::default(), size.inflate(theme::padding()))
            }
            _ => (pos, size),
        };
        if let Some(bg) = target.as_ref().and_then(|t| self.registry.lookup_native(t)) {
            self.backend.set_geometry(bg, self.physical_rect(bg_pos, bg_size));
        }

        for child in objects {
            let child_pos = child.position() + pos;
            match child {
                CanvasObject::Container(c) => {
                    c.apply_layout();
                    self.refresh_container(&c.objects(), None, child_pos, child.size());
                }
                CanvasObject::Widget(w) => {
                    let children = w.layout(child.size());
                    self.refresh_container(&children, Some(child.clone()), child_pos, child.size());
                }
                _ => {
                    let target = target.get_or_insert_with(|| child.clone()).clone();
                    self.refresh_object(child, &target, child_pos, child.size());
                }
            }
        }
    }

    pub(crate) fn physical_rect(&self, pos: Position, size: Size) -> PhysicalRect {
        PhysicalRect::new(
            scale_int(self.scale, pos.x),
            scale_int(self.scale, pos.y),
            scale_int(self.scale, size.width),
            scale_int(self.scale, size.height),
        )
    }
}
