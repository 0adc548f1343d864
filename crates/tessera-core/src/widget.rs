use std::rc::Rc;

use crate::input::{Clickable, MouseEvent};
use crate::object::{Base, CanvasObject, Image, Rectangle, Resource, Text, Widget};
use crate::{Position, Size, theme};

pub type ClickCallback = Rc<dyn Fn(&MouseEvent)>;

/// A themed rectangle with a centred label that reports clicks.
pub struct Button {
    base: Base,
    background: Rc<Rectangle>,
    label: Rc<Text>,
    on_clicked: Option<ClickCallback>,
}

impl Button {
    pub fn new(text: impl Into<String>, on_clicked: impl Fn(&MouseEvent) + 'static) -> Self {
        Self {
            base: Base::new(),
            background: Rc::new(Rectangle::new(theme::current().button)),
            label: Rc::new(Text::new(text)),
            on_clicked: Some(Rc::new(on_clicked)),
        }
    }

    pub fn text(&self) -> String {
        self.label.text()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.label.set_text(text);
    }
}

impl Widget for Button {
    fn base(&self) -> &Base {
        &self.base
    }

    fn layout(&self, size: Size) -> Vec<CanvasObject> {
        self.background.base().move_to(Position::default());
        self.background.base().resize(size);
        // the canvas centres text inside its box
        self.label.base().move_to(Position::default());
        self.label.base().resize(size);

        vec![self.background.clone().into(), self.label.clone().into()]
    }

    fn min_size(&self) -> Size {
        self.label.base().min_size().inflate(theme::padding())
    }

    fn clickable(&self) -> Option<&dyn Clickable> {
        Some(self)
    }
}

impl Clickable for Button {
    fn on_clicked(&self, event: &MouseEvent) {
        if let Some(cb) = &self.on_clicked {
            cb(event);
        }
    }
}

pub struct Label {
    base: Base,
    text: Rc<Text>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: Base::new(),
            text: Rc::new(Text::new(text)),
        }
    }

    pub fn text(&self) -> String {
        self.text.text()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set_text(text);
    }
}

impl Widget for Label {
    fn base(&self) -> &Base {
        &self.base
    }

    fn layout(&self, size: Size) -> Vec<CanvasObject> {
        self.text.base().move_to(Position::default());
        self.text.base().resize(size);
        vec![self.text.clone().into()]
    }

    fn min_size(&self) -> Size {
        self.text.base().min_size()
    }
}

/// Shows a single themed image resource at inline icon size.
pub struct Icon {
    base: Base,
    image: Rc<Image>,
}

impl Icon {
    pub fn new(resource: Resource) -> Self {
        Self {
            base: Base::new(),
            image: Rc::new(Image::from_resource(resource)),
        }
    }

    pub fn resource(&self) -> Option<Resource> {
        self.image.resource()
    }

    pub fn set_resource(&self, resource: Resource) {
        self.image.set_resource(Some(resource));
    }
}

impl Widget for Icon {
    fn base(&self) -> &Base {
        &self.base
    }

    fn layout(&self, size: Size) -> Vec<CanvasObject> {
        self.image.base().move_to(Position::default());
        self.image.base().resize(size);
        vec![self.image.clone().into()]
    }

    fn min_size(&self) -> Size {
        let s = theme::icon_inline_size();
        Size::new(s, s)
    }
}
