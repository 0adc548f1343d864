//! # Scene nodes
//!
//! A scene is a tree of [`CanvasObject`]s. Containers and widgets own
//! children, everything else is a leaf primitive that a canvas backs with one
//! native object.
//!
//! Nodes are shared through `Rc` handles and mutated in place by layouts
//! (`move_to`, `resize`) and by canvases (`set_min_size` after measuring text),
//! so their fields use `Cell`/`RefCell`. All of this happens on the thread that
//! owns the canvas.
//!
//! ```rust
//! use std::rc::Rc;
//! use tessera_core::*;
//!
//! let title = Rc::new(Text::new("Hello").with_style(TextStyle::BOLD));
//! let root = Container::new(vec![title.clone().into()]);
//!
//! root.base().resize(Size::new(120, 40));
//! root.apply_layout();
//! assert_eq!(title.base().size(), Size::new(120, 40));
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

use crate::input::Clickable;
use crate::layout::{Layout, MaxLayout};
use crate::{Color, Position, Size, theme};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

impl ObjectId {
    pub fn next() -> Self {
        ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity and box geometry shared by most nodes.
#[derive(Debug)]
pub struct Base {
    id: ObjectId,
    position: Cell<Position>,
    size: Cell<Size>,
    min_size: Cell<Size>,
}

impl Default for Base {
    fn default() -> Self {
        Self::new()
    }
}

impl Base {
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            position: Cell::new(Position::default()),
            size: Cell::new(Size::default()),
            min_size: Cell::new(Size::default()),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
    pub fn position(&self) -> Position {
        self.position.get()
    }
    pub fn size(&self) -> Size {
        self.size.get()
    }
    pub fn move_to(&self, pos: Position) {
        self.position.set(pos);
    }
    pub fn resize(&self, size: Size) {
        self.size.set(size);
    }
    pub fn min_size(&self) -> Size {
        self.min_size.get()
    }
    pub fn set_min_size(&self, size: Size) {
        self.min_size.set(size);
    }
}

/// Geometry for shapes defined by two corners.
///
/// The position is the top-left of the two corners and the size is the
/// signed delta from the first corner to the second, so a line drawn
/// right-to-left has a negative width.
#[derive(Debug)]
pub struct Corners {
    id: ObjectId,
    position1: Cell<Position>,
    position2: Cell<Position>,
}

impl Corners {
    pub fn new(position1: Position, position2: Position) -> Self {
        Self {
            id: ObjectId::next(),
            position1: Cell::new(position1),
            position2: Cell::new(position2),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }
    pub fn position1(&self) -> Position {
        self.position1.get()
    }
    pub fn position2(&self) -> Position {
        self.position2.get()
    }
    pub fn set_position1(&self, pos: Position) {
        self.position1.set(pos);
    }
    pub fn set_position2(&self, pos: Position) {
        self.position2.set(pos);
    }

    pub fn position(&self) -> Position {
        self.position1().min(self.position2())
    }

    pub fn size(&self) -> Size {
        let delta = self.position2() - self.position1();
        Size::new(delta.x, delta.y)
    }

    pub fn move_to(&self, pos: Position) {
        let delta = pos - self.position();
        self.position1.set(self.position1() + delta);
        self.position2.set(self.position2() + delta);
    }

    /// Keeps the top-left corner and lays the corners out along `size`,
    /// preserving which corner comes first on each axis via the sign.
    pub fn resize(&self, size: Size) {
        let pos = self.position();
        let (x1, x2) = if size.width >= 0 {
            (pos.x, pos.x + size.width)
        } else {
            (pos.x - size.width, pos.x)
        };
        let (y1, y2) = if size.height >= 0 {
            (pos.y, pos.y + size.height)
        } else {
            (pos.y - size.height, pos.y)
        };
        self.position1.set(Position::new(x1, y1));
        self.position2.set(Position::new(x2, y2));
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TextStyle: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
    }
}

pub struct Text {
    base: Base,
    text: RefCell<String>,
    color: Cell<Color>,
    font_size: Cell<i32>,
    style: Cell<TextStyle>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        let theme = theme::current();
        Self {
            base: Base::new(),
            text: RefCell::new(text.into()),
            color: Cell::new(theme.text),
            font_size: Cell::new(theme.text_size),
            style: Cell::new(TextStyle::empty()),
        }
    }
    pub fn with_color(self, color: Color) -> Self {
        self.color.set(color);
        self
    }
    pub fn with_font_size(self, size: i32) -> Self {
        self.font_size.set(size);
        self
    }
    pub fn with_style(self, style: TextStyle) -> Self {
        self.style.set(style);
        self
    }

    pub fn base(&self) -> &Base {
        &self.base
    }
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }
    pub fn color(&self) -> Color {
        self.color.get()
    }
    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }
    pub fn font_size(&self) -> i32 {
        self.font_size.get()
    }
    pub fn set_font_size(&self, size: i32) {
        self.font_size.set(size);
    }
    pub fn style(&self) -> TextStyle {
        self.style.get()
    }
    pub fn set_style(&self, style: TextStyle) {
        self.style.set(style);
    }
    pub fn bold(&self) -> bool {
        self.style().contains(TextStyle::BOLD)
    }
    pub fn italic(&self) -> bool {
        self.style().contains(TextStyle::ITALIC)
    }
}

pub struct Rectangle {
    base: Base,
    fill_color: Cell<Color>,
}

impl Rectangle {
    pub fn new(fill_color: Color) -> Self {
        Self {
            base: Base::new(),
            fill_color: Cell::new(fill_color),
        }
    }
    pub fn base(&self) -> &Base {
        &self.base
    }
    pub fn fill_color(&self) -> Color {
        self.fill_color.get()
    }
    pub fn set_fill_color(&self, color: Color) {
        self.fill_color.set(color);
    }
}

/// A static file-backed resource such as a theme icon.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Resource {
    pub name: String,
    pub path: PathBuf,
}

impl Resource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Per-pixel color source: `(x, y, width, height) -> Color` in physical pixels.
/// Called concurrently from render workers.
pub type PixelColorFn = Arc<dyn Fn(i32, i32, i32, i32) -> Color + Send + Sync>;

pub struct Image {
    base: Base,
    resource: RefCell<Option<Resource>>,
    pixel_color: RefCell<Option<PixelColorFn>>,
}

impl Image {
    pub fn from_resource(resource: Resource) -> Self {
        Self {
            base: Base::new(),
            resource: RefCell::new(Some(resource)),
            pixel_color: RefCell::new(None),
        }
    }

    pub fn from_fn(f: impl Fn(i32, i32, i32, i32) -> Color + Send + Sync + 'static) -> Self {
        Self {
            base: Base::new(),
            resource: RefCell::new(None),
            pixel_color: RefCell::new(Some(Arc::new(f))),
        }
    }

    pub fn base(&self) -> &Base {
        &self.base
    }
    pub fn resource(&self) -> Option<Resource> {
        self.resource.borrow().clone()
    }
    pub fn set_resource(&self, resource: Option<Resource>) {
        *self.resource.borrow_mut() = resource;
    }
    pub fn pixel_color(&self) -> Option<PixelColorFn> {
        self.pixel_color.borrow().clone()
    }
    pub fn set_pixel_color(&self, f: Option<PixelColorFn>) {
        *self.pixel_color.borrow_mut() = f;
    }
}

pub struct Line {
    corners: Corners,
    stroke_color: Cell<Color>,
    stroke_width: Cell<f32>,
}

impl Line {
    pub fn new(position1: Position, position2: Position, stroke_color: Color) -> Self {
        Self {
            corners: Corners::new(position1, position2),
            stroke_color: Cell::new(stroke_color),
            stroke_width: Cell::new(1.0),
        }
    }
    pub fn corners(&self) -> &Corners {
        &self.corners
    }
    pub fn stroke_color(&self) -> Color {
        self.stroke_color.get()
    }
    pub fn set_stroke_color(&self, color: Color) {
        self.stroke_color.set(color);
    }
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width.get()
    }
    pub fn set_stroke_width(&self, width: f32) {
        self.stroke_width.set(width);
    }
}

pub struct Circle {
    corners: Corners,
    stroke_color: Cell<Color>,
    fill_color: Cell<Color>,
    stroke_width: Cell<f32>,
}

impl Circle {
    pub fn new(position1: Position, position2: Position) -> Self {
        Self {
            corners: Corners::new(position1, position2),
            stroke_color: Cell::new(theme::current().text),
            fill_color: Cell::new(Color::TRANSPARENT),
            stroke_width: Cell::new(1.0),
        }
    }
    pub fn with_stroke(self, color: Color, width: f32) -> Self {
        self.stroke_color.set(color);
        self.stroke_width.set(width);
        self
    }
    pub fn with_fill(self, color: Color) -> Self {
        self.fill_color.set(color);
        self
    }
    pub fn corners(&self) -> &Corners {
        &self.corners
    }
    pub fn stroke_color(&self) -> Color {
        self.stroke_color.get()
    }
    pub fn fill_color(&self) -> Color {
        self.fill_color.get()
    }
    pub fn set_fill_color(&self, color: Color) {
        self.fill_color.set(color);
    }
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width.get()
    }
}

pub struct Container {
    base: Base,
    objects: RefCell<Vec<CanvasObject>>,
    layout: RefCell<Option<Rc<dyn Layout>>>,
}

impl Container {
    pub fn new(objects: Vec<CanvasObject>) -> Self {
        Self {
            base: Base::new(),
            objects: RefCell::new(objects),
            layout: RefCell::new(None),
        }
    }

    pub fn with_layout(layout: impl Layout + 'static, objects: Vec<CanvasObject>) -> Self {
        let c = Self::new(objects);
        c.set_layout(Some(Rc::new(layout)));
        c
    }

    pub fn base(&self) -> &Base {
        &self.base
    }

    /// Snapshot of the children; handles are cheap clones.
    pub fn objects(&self) -> Vec<CanvasObject> {
        self.objects.borrow().clone()
    }
    pub fn add(&self, object: impl Into<CanvasObject>) {
        self.objects.borrow_mut().push(object.into());
    }
    pub fn set_objects(&self, objects: Vec<CanvasObject>) {
        *self.objects.borrow_mut() = objects;
    }

    pub fn layout(&self) -> Option<Rc<dyn Layout>> {
        self.layout.borrow().clone()
    }
    pub fn set_layout(&self, layout: Option<Rc<dyn Layout>>) {
        *self.layout.borrow_mut() = layout;
    }

    /// Positions the children for the current size, falling back to
    /// [`MaxLayout`] when no layout is assigned.
    pub fn apply_layout(&self) {
        let objects = self.objects();
        match self.layout() {
            Some(layout) => layout.layout(&objects, self.base.size()),
            None => MaxLayout.layout(&objects, self.base.size()),
        }
    }

    pub fn min_size(&self) -> Size {
        let objects = self.objects();
        match self.layout() {
            Some(layout) => layout.min_size(&objects),
            None => MaxLayout.min_size(&objects),
        }
    }
}

/// A composite node that produces its children on demand.
///
/// `layout` positions the returned children relative to the widget for the
/// given size. Canvases call it on every refresh, so it must reflect the
/// widget's current state and should return the same child handles across
/// calls for native objects to be reused.
///
/// `layout` runs while the canvas is updating. Calling back into that canvas
/// from it does nothing: the nested refresh is skipped.
pub trait Widget {
    fn base(&self) -> &Base;
    fn layout(&self, size: Size) -> Vec<CanvasObject>;
    fn min_size(&self) -> Size;
    fn clickable(&self) -> Option<&dyn Clickable> {
        None
    }
}

/// A primitive outside the set canvases know how to draw.
pub trait CustomObject {
    fn base(&self) -> &Base;
    fn kind_name(&self) -> &str;
}

#[derive(Clone)]
pub enum CanvasObject {
    Container(Rc<Container>),
    Widget(Rc<dyn Widget>),
    Text(Rc<Text>),
    Rectangle(Rc<Rectangle>),
    Image(Rc<Image>),
    Line(Rc<Line>),
    Circle(Rc<Circle>),
    Custom(Rc<dyn CustomObject>),
}

impl CanvasObject {
    pub fn widget(w: impl Widget + 'static) -> Self {
        CanvasObject::Widget(Rc::new(w))
    }

    pub fn custom(c: impl CustomObject + 'static) -> Self {
        CanvasObject::Custom(Rc::new(c))
    }

    pub fn id(&self) -> ObjectId {
        match self {
            CanvasObject::Container(c) => c.base().id(),
            CanvasObject::Widget(w) => w.base().id(),
            CanvasObject::Text(t) => t.base().id(),
            CanvasObject::Rectangle(r) => r.base().id(),
            CanvasObject::Image(i) => i.base().id(),
            CanvasObject::Line(l) => l.corners().id(),
            CanvasObject::Circle(c) => c.corners().id(),
            CanvasObject::Custom(c) => c.base().id(),
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            CanvasObject::Container(_) => "container",
            CanvasObject::Widget(_) => "widget",
            CanvasObject::Text(_) => "text",
            CanvasObject::Rectangle(_) => "rectangle",
            CanvasObject::Image(_) => "image",
            CanvasObject::Line(_) => "line",
            CanvasObject::Circle(_) => "circle",
            CanvasObject::Custom(c) => c.kind_name(),
        }
    }

    fn base(&self) -> Option<&Base> {
        match self {
            CanvasObject::Container(c) => Some(c.base()),
            CanvasObject::Widget(w) => Some(w.base()),
            CanvasObject::Text(t) => Some(t.base()),
            CanvasObject::Rectangle(r) => Some(r.base()),
            CanvasObject::Image(i) => Some(i.base()),
            CanvasObject::Custom(c) => Some(c.base()),
            CanvasObject::Line(_) | CanvasObject::Circle(_) => None,
        }
    }

    fn corners(&self) -> Option<&Corners> {
        match self {
            CanvasObject::Line(l) => Some(l.corners()),
            CanvasObject::Circle(c) => Some(c.corners()),
            _ => None,
        }
    }

    pub fn position(&self) -> Position {
        match (self.base(), self.corners()) {
            (Some(b), _) => b.position(),
            (None, Some(c)) => c.position(),
            (None, None) => Position::default(),
        }
    }

    pub fn size(&self) -> Size {
        match (self.base(), self.corners()) {
            (Some(b), _) => b.size(),
            (None, Some(c)) => c.size(),
            (None, None) => Size::default(),
        }
    }

    pub fn move_to(&self, pos: Position) {
        if let Some(b) = self.base() {
            b.move_to(pos);
        } else if let Some(c) = self.corners() {
            c.move_to(pos);
        }
    }

    pub fn resize(&self, size: Size) {
        if let Some(b) = self.base() {
            b.resize(size);
        } else if let Some(c) = self.corners() {
            c.resize(size);
        }
    }

    pub fn min_size(&self) -> Size {
        match self {
            CanvasObject::Container(c) => c.min_size(),
            CanvasObject::Widget(w) => w.min_size(),
            CanvasObject::Line(_) | CanvasObject::Circle(_) => Size::default(),
            _ => self.base().map(Base::min_size).unwrap_or_default(),
        }
    }

    /// Only meaningful for leaves that measure themselves; composites derive
    /// their minimum from their children.
    pub fn set_min_size(&self, size: Size) {
        match self {
            CanvasObject::Container(_) | CanvasObject::Widget(_) => {}
            _ => {
                if let Some(b) = self.base() {
                    b.set_min_size(size);
                }
            }
        }
    }

    pub fn as_clickable(&self) -> Option<&dyn Clickable> {
        match self {
            CanvasObject::Widget(w) => w.clickable(),
            _ => None,
        }
    }
}

impl PartialEq for CanvasObject {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for CanvasObject {}

impl fmt::Debug for CanvasObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasObject::Text(t) => f
                .debug_struct("Text")
                .field("id", &self.id())
                .field("text", &t.text())
                .finish(),
            CanvasObject::Container(c) => f
                .debug_struct("Container")
                .field("id", &self.id())
                .field("objects", &c.objects.borrow().len())
                .finish(),
            _ => f
                .debug_struct(self.kind_name())
                .field("id", &self.id())
                .field("position", &self.position())
                .field("size", &self.size())
                .finish(),
        }
    }
}

impl From<Rc<Container>> for CanvasObject {
    fn from(c: Rc<Container>) -> Self {
        CanvasObject::Container(c)
    }
}
impl From<Rc<Text>> for CanvasObject {
    fn from(t: Rc<Text>) -> Self {
        CanvasObject::Text(t)
    }
}
impl From<Rc<Rectangle>> for CanvasObject {
    fn from(r: Rc<Rectangle>) -> Self {
        CanvasObject::Rectangle(r)
    }
}
impl From<Rc<Image>> for CanvasObject {
    fn from(i: Rc<Image>) -> Self {
        CanvasObject::Image(i)
    }
}
impl From<Rc<Line>> for CanvasObject {
    fn from(l: Rc<Line>) -> Self {
        CanvasObject::Line(l)
    }
}
impl From<Rc<Circle>> for CanvasObject {
    fn from(c: Rc<Circle>) -> Self {
        CanvasObject::Circle(c)
    }
}

impl From<Container> for CanvasObject {
    fn from(c: Container) -> Self {
        CanvasObject::Container(Rc::new(c))
    }
}
impl From<Text> for CanvasObject {
    fn from(t: Text) -> Self {
        CanvasObject::Text(Rc::new(t))
    }
}
impl From<Rectangle> for CanvasObject {
    fn from(r: Rectangle) -> Self {
        CanvasObject::Rectangle(Rc::new(r))
    }
}
impl From<Image> for CanvasObject {
    fn from(i: Image) -> Self {
        CanvasObject::Image(Rc::new(i))
    }
}
impl From<Line> for CanvasObject {
    fn from(l: Line) -> Self {
        CanvasObject::Line(Rc::new(l))
    }
}
impl From<Circle> for CanvasObject {
    fn from(c: Circle) -> Self {
        CanvasObject::Circle(Rc::new(c))
    }
}
