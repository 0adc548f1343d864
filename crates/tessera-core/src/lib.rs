//! # Scene graph contract
//!
//! `tessera-core` defines what a canvas draws and what it draws with:
//!
//! - [`CanvasObject`]: the node tree of containers, widgets and leaf
//!   primitives (text, rectangles, images, lines, circles).
//! - [`Layout`]: how containers place their children; [`MaxLayout`] is the
//!   default.
//! - [`theme`]: colors, padding, fonts and icons, queried on demand.
//! - [`NativeBackend`]: the retained drawing surface a canvas mirrors the
//!   tree onto.
//!
//! ```rust
//! use std::rc::Rc;
//! use tessera_core::*;
//!
//! let clicks = Rc::new(std::cell::Cell::new(0));
//! let button = {
//!     let clicks = clicks.clone();
//!     Button::new("OK", move |_| clicks.set(clicks.get() + 1))
//! };
//! let content = Container::new(vec![
//!     CanvasObject::widget(button),
//!     Circle::new(Position::new(0, 0), Position::new(20, 20)).into(),
//! ]);
//! assert_eq!(content.objects().len(), 2);
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod object;
pub mod render_api;
pub mod settings;
pub mod theme;
pub mod widget;

pub use color::*;
pub use error::*;
pub use geometry::*;
pub use input::*;
pub use layout::*;
pub use object::*;
pub use render_api::*;
pub use settings::Settings;
pub use theme::Theme;
pub use widget::*;
