//! # Canvas bridge
//!
//! A [`Canvas`] mirrors a `tessera-core` scene graph onto a retained
//! [`NativeBackend`](tessera_core::NativeBackend). Each leaf node gets one
//! native object the first time the canvas sees it; containers and widgets
//! get a background rectangle. Every [`Canvas::refresh`] re-runs layouts,
//! fits the window around the content and pushes fresh geometry, converting
//! logical units to physical pixels with the canvas scale.
//!
//! Images with a per-pixel color function are rasterised on four worker
//! tasks and handed back to the backend under the main loop
//! ([`main_loop::begin`]).
//!
//! Presses reported by the backend are routed back into the tree with
//! [`dispatch_mouse_down`].
//!
//! ```rust
//! use tessera_canvas::Canvas;
//! use tessera_core::*;
//! use tessera_headless::HeadlessBackend;
//!
//! let backend = HeadlessBackend::new(200, 100);
//! let canvas = Canvas::new(backend.clone(), 1.0);
//!
//! let label = Text::new("Hello");
//! let content: CanvasObject = Container::new(vec![label.into()]).into();
//! canvas.set_content(content.clone());
//!
//! assert!(canvas.contains(&content));
//! assert_eq!(canvas.size(), Size::new(200, 100));
//! ```

mod builder;
mod canvas;
mod dispatch;
mod error;
mod fit;
pub mod main_loop;
mod raster;
mod refresh;
mod registry;
pub mod scale;
mod surfaces;
mod walker;

pub use builder::VECTOR_PAD;
pub use canvas::Canvas;
pub use dispatch::dispatch_mouse_down;
pub use error::CanvasError;
pub use raster::{Quadrant, quadrants, rasterize};
pub use refresh::{circle_bounds, line_endpoints};
pub use surfaces::is_registered;
