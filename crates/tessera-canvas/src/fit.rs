use tessera_core::{CanvasObject, Position, Size, theme};

use crate::canvas::CanvasState;
use crate::scale::{scale_int, unscale_int};

impl CanvasState {
    /// Grows the window to hold the content plus padding, floors it at that
    /// minimum and re-places the content inside the padding.
    pub(crate) fn fit_content(&mut self) {
        let Some(content) = self.content.clone() else {
            return;
        };
        let pad = theme::padding();
        let (w, h) = self.backend.window_size();

        let min = content.min_size();
        let min_width = scale_int(self.scale, min.width + pad * 2);
        let min_height = scale_int(self.scale, min.height + pad * 2);
        let width = min_width.max(w);
        let height = min_height.max(h);

        self.backend.set_window_min_size(min_width, min_height);
        self.backend.resize_window(width, height);
        self.place_content(&content, width, height);
    }

    /// Scales the window by `scale / old scale` and re-places the content.
    pub(crate) fn rescale(&mut self, scale: f32) {
        log::info!("canvas scale {scale}");
        let ratio = scale / self.scale;
        self.scale = scale;

        let (w, h) = self.backend.window_size();
        let width = (w as f32 * ratio) as i32;
        let height = (h as f32 * ratio) as i32;
        self.backend.resize_window(width, height);

        if let Some(content) = self.content.clone() {
            self.place_content(&content, width, height);
        }
    }

    fn place_content(&self, content: &CanvasObject, width: i32, height: i32) {
        let pad = theme::padding();
        content.move_to(Position::new(pad, pad));
        content.resize(Size::new(
            unscale_int(self.scale, width) - pad * 2,
            unscale_int(self.scale, height) - pad * 2,
        ));
    }
}
