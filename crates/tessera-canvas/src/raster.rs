//! Rasterisation of images backed by a per-pixel color function.
//!
//! The buffer is split into four quadrants, each filled by its own task. The
//! left and top quadrants take the floor half of each axis, so odd sizes leave
//! the extra column and row to the right and bottom quadrants.

use smallvec::SmallVec;
use tessera_core::{CanvasObject, Color, PhysicalRect, PixelColorFn};

use crate::canvas::CanvasState;
use crate::main_loop;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quadrant {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

pub fn quadrants(width: usize, height: usize) -> SmallVec<[Quadrant; 4]> {
    let (hw, hh) = (width / 2, height / 2);
    let q = |x, y, width, height| Quadrant {
        x,
        y,
        width,
        height,
    };
    smallvec::smallvec![
        q(0, 0, hw, hh),
        q(hw, 0, width - hw, hh),
        q(0, hh, hw, height - hh),
        q(hw, hh, width - hw, height - hh),
    ]
}

/// Evaluates `f` for every pixel of a `width` x `height` image and packs the
/// results as row-major 0xAARRGGBB.
pub fn rasterize<F>(f: &F, width: i32, height: i32) -> Vec<u32>
where
    F: Fn(i32, i32, i32, i32) -> Color + Send + Sync + ?Sized,
{
    let (w, h) = (width.max(0) as usize, height.max(0) as usize);
    let mut pixels = vec![0u32; w * h];
    if pixels.is_empty() {
        return pixels;
    }

    let quads = quadrants(w, h);
    let (top, bottom) = pixels.split_at_mut(quads[2].y * w);
    let (top_left, top_right) = split_columns(top, w, quads[1].x);
    let (bottom_left, bottom_right) = split_columns(bottom, w, quads[3].x);
    let parts = [top_left, top_right, bottom_left, bottom_right];

    // returns once every task has finished
    rayon::scope(|s| {
        for (quad, rows) in quads.iter().copied().zip(parts) {
            s.spawn(move |_| fill_quadrant(f, quad, rows, width, height));
        }
    });
    pixels
}

fn split_columns(
    rows: &mut [u32],
    stride: usize,
    at: usize,
) -> (Vec<&mut [u32]>, Vec<&mut [u32]>) {
    rows.chunks_exact_mut(stride)
        .map(|row| row.split_at_mut(at))
        .unzip()
}

fn fill_quadrant<F>(f: &F, quad: Quadrant, rows: Vec<&mut [u32]>, width: i32, height: i32)
where
    F: Fn(i32, i32, i32, i32) -> Color + Sync + ?Sized,
{
    for (dy, row) in rows.into_iter().enumerate() {
        let y = (quad.y + dy) as i32;
        for (dx, px) in row.iter_mut().enumerate() {
            *px = f((quad.x + dx) as i32, y, width, height).to_argb();
        }
    }
}

impl CanvasState {
    /// Rasterises `img` at its physical size and hands the pixels to its
    /// native object on the main loop.
    pub(crate) fn render_image(
        &mut self,
        img: &CanvasObject,
        f: &PixelColorFn,
        width: i32,
        height: i32,
    ) {
        let pixels = rasterize(&**f, width, height);
        if pixels.is_empty() {
            log::debug!("skipped empty render of {img:?}");
            return;
        }

        let _main = main_loop::begin();
        let Some(obj) = self.registry.lookup_native(img) else {
            return;
        };
        self.backend.set_image_data(obj, pixels);
        self.backend
            .add_image_damage(obj, PhysicalRect::new(0, 0, width, height));
        log::debug!("rendered {width}x{height} pixels for {img:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(x: i32, y: i32, w: i32, h: i32) -> Color {
        Color::from_rgba((x * 255 / w) as u8, (y * 255 / h) as u8, (x + y) as u8, 255)
    }

    fn reference(w: i32, h: i32) -> Vec<u32> {
        let mut out = Vec::new();
        for y in 0..h {
            for x in 0..w {
                out.push(gradient(x, y, w, h).to_argb());
            }
        }
        out
    }

    #[test]
    fn test_quadrants_cover_odd_sizes() {
        let q = quadrants(5, 3);
        assert_eq!(q[0], Quadrant { x: 0, y: 0, width: 2, height: 1 });
        assert_eq!(q[1], Quadrant { x: 2, y: 0, width: 3, height: 1 });
        assert_eq!(q[2], Quadrant { x: 0, y: 1, width: 2, height: 2 });
        assert_eq!(q[3], Quadrant { x: 2, y: 1, width: 3, height: 2 });
        let area: usize = q.iter().map(|q| q.width * q.height).sum();
        assert_eq!(area, 15);
    }

    #[test]
    fn test_matches_reference_for_odd_dimensions() {
        for (w, h) in [(7, 5), (1, 9), (9, 1), (8, 6), (33, 17)] {
            assert_eq!(rasterize(&gradient, w, h), reference(w, h), "{w}x{h}");
        }
    }

    #[test]
    fn test_passes_full_image_size_to_every_pixel() {
        let px = rasterize(
            &|_x: i32, _y: i32, w: i32, h: i32| Color::from_rgba(w as u8, h as u8, 0, 0),
            3,
            2,
        );
        assert!(px.iter().all(|p| *p == Color::from_rgba(3, 2, 0, 0).to_argb()));
    }

    #[test]
    fn test_empty_image_has_no_pixels() {
        assert!(rasterize(&gradient, 0, 10).is_empty());
        assert!(rasterize(&gradient, 10, 0).is_empty());
    }
}
