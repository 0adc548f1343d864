use std::cell::Cell;
use std::rc::Rc;

use tessera_canvas::{Canvas, CanvasError, dispatch_mouse_down, is_registered};
use tessera_core::*;
use tessera_headless::HeadlessBackend;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Leaves children where they are.
struct Fixed;

impl Layout for Fixed {
    fn layout(&self, _objects: &[CanvasObject], _size: Size) {}

    fn min_size(&self, _objects: &[CanvasObject]) -> Size {
        Size::default()
    }
}

struct CountingWidget {
    base: Base,
    body: Rc<Rectangle>,
    layouts: Rc<Cell<usize>>,
}

impl Widget for CountingWidget {
    fn base(&self) -> &Base {
        &self.base
    }

    fn layout(&self, size: Size) -> Vec<CanvasObject> {
        self.layouts.set(self.layouts.get() + 1);
        self.body.base().resize(size);
        vec![self.body.clone().into()]
    }

    fn min_size(&self) -> Size {
        Size::new(10, 10)
    }
}

struct Sprite {
    base: Base,
}

impl CustomObject for Sprite {
    fn base(&self) -> &Base {
        &self.base
    }

    fn kind_name(&self) -> &str {
        "sprite"
    }
}

fn geometry(backend: &HeadlessBackend, canvas: &Canvas, o: &CanvasObject) -> PhysicalRect {
    let h = canvas.native(o).expect("node has a native object");
    backend.object(h).expect("native object exists").geometry
}

#[test]
fn test_refresh_reuses_native_objects() {
    init();
    let backend = HeadlessBackend::new(200, 120);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let leaves: Vec<CanvasObject> = vec![
        Rectangle::new(Color::from_hex("#336699")).into(),
        Text::new("label").into(),
        Line::new(Position::new(0, 0), Position::new(10, 10), Color::WHITE).into(),
        Circle::new(Position::new(0, 0), Position::new(20, 20)).into(),
    ];
    let content: CanvasObject = Container::new(leaves.clone()).into();
    canvas.set_content(content.clone());

    // container background + one per leaf
    assert_eq!(backend.object_count(), 5);
    let handles: Vec<_> = leaves.iter().map(|l| canvas.native(l)).collect();
    assert!(handles.iter().all(Option::is_some));

    for _ in 0..3 {
        canvas.refresh(&content);
    }
    assert_eq!(backend.object_count(), 5);
    let again: Vec<_> = leaves.iter().map(|l| canvas.native(l)).collect();
    assert_eq!(handles, again);
}

#[test]
fn test_widget_layout_runs_on_every_refresh() {
    init();
    let layouts = Rc::new(Cell::new(0));
    let widget = CanvasObject::widget(CountingWidget {
        base: Base::new(),
        body: Rc::new(Rectangle::new(Color::BLACK)),
        layouts: layouts.clone(),
    });
    let content: CanvasObject = Container::new(vec![widget]).into();

    let canvas = Canvas::new(HeadlessBackend::new(100, 100), 1.0);
    canvas.set_content(content.clone());
    let after_set = layouts.get();
    assert!(after_set >= 1);

    canvas.refresh(&content);
    canvas.refresh(&content);
    assert_eq!(layouts.get(), after_set + 2);
}

#[test]
fn test_text_is_centred_in_its_box() {
    init();
    // 108x48 logical at 2x, leaving a 100x40 box inside the padding
    let backend = HeadlessBackend::new(216, 96);
    let canvas = Canvas::new(backend.clone(), 2.0);

    let text = Rc::new(Text::new("Hi").with_font_size(10));
    let content = CanvasObject::from(text.clone());
    canvas.set_content(content.clone());

    // two 12x24 glyphs plus gaps at 20pt, halved back to logical units
    assert_eq!(text.base().min_size(), Size::new(14, 12));
    assert_eq!(text.base().size(), Size::new(100, 40));

    // (4 + (100 - 14) / 2, 4 + (40 - 12) / 2) = (47, 18)
    assert_eq!(
        geometry(&backend, &canvas, &content),
        PhysicalRect::new(94, 36, 200, 80)
    );

    let h = canvas.native(&content).expect("text is built");
    let native = backend.object(h).expect("native text");
    let data = native.text().expect("text data");
    assert_eq!(data.text, "Hi");
    assert_eq!(data.font, Some(("NotoSans-Regular".to_string(), 20)));
}

#[test]
fn test_fit_grows_window_to_content() {
    init();
    let backend = HeadlessBackend::new(30, 30);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let rect = Rc::new(Rectangle::new(Color::WHITE));
    rect.base().set_min_size(Size::new(50, 50));
    let content = CanvasObject::from(rect.clone());
    canvas.set_content(content.clone());

    assert_eq!(backend.window_min_size(), (58, 58));
    assert_eq!(backend.window_size(), (58, 58));
    assert_eq!(rect.base().position(), Position::new(4, 4));
    assert_eq!(rect.base().size(), Size::new(50, 50));
    assert_eq!(
        geometry(&backend, &canvas, &content),
        PhysicalRect::new(4, 4, 50, 50)
    );
}

#[test]
fn test_line_endpoints_follow_direction() {
    init();
    let cases = [
        (Position::new(10, 20), Position::new(40, 60)),
        (Position::new(10, 60), Position::new(40, 20)),
        (Position::new(40, 20), Position::new(10, 60)),
        (Position::new(40, 60), Position::new(10, 20)),
    ];

    for (p1, p2) in cases {
        let backend = HeadlessBackend::new(100, 100);
        let canvas = Canvas::new(backend.clone(), 1.0);
        let line: CanvasObject = Line::new(p1, p2, Color::WHITE).into();
        canvas.set_content(Container::with_layout(Fixed, vec![line.clone()]));

        let h = canvas.native(&line).expect("line is built");
        let got = backend.object(h).and_then(|o| o.line());
        // content sits inside the padding
        assert_eq!(
            got,
            Some([p1.x + 4, p1.y + 4, p2.x + 4, p2.y + 4]),
            "{p1:?} -> {p2:?}"
        );
    }
}

#[test]
fn test_circle_is_padded_for_stroke() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let circle: CanvasObject = Circle::new(Position::new(10, 10), Position::new(30, 40))
        .with_stroke(Color::WHITE, 2.0)
        .into();
    canvas.set_content(Container::with_layout(Fixed, vec![circle.clone()]));

    assert_eq!(
        geometry(&backend, &canvas, &circle),
        PhysicalRect::new(4, 4, 40, 50)
    );

    let h = canvas.native(&circle).expect("circle is built");
    let shape = backend
        .object(h)
        .and_then(|o| o.vector())
        .expect("circle shape");
    assert_eq!((shape.cx, shape.cy, shape.radius), (20.0, 25.0, 10.0));
    assert_eq!(shape.stroke_width, 2.0);
    assert_eq!(shape.fill, None);
}

#[test]
fn test_image_renders_only_when_resized() {
    init();
    fn shade(x: i32, y: i32, w: i32, h: i32) -> Color {
        Color::from_rgb((x * 255 / w) as u8, (y * 255 / h) as u8, 0)
    }

    let backend = HeadlessBackend::new(40, 30);
    let canvas = Canvas::new(backend.clone(), 1.0);
    let image: CanvasObject = Image::from_fn(shade).into();
    let content: CanvasObject = Container::new(vec![image.clone()]).into();
    canvas.set_content(content.clone());

    let h = canvas.native(&image).expect("image is built");
    let data = backend.object(h).and_then(|o| o.image().cloned()).expect("image");
    assert_eq!(data.uploads, 1);
    assert_eq!(data.size, (32, 22));
    assert_eq!(data.pixels.len(), 32 * 22);
    assert_eq!(data.pixels[33], shade(1, 1, 32, 22).to_argb());
    assert_eq!(data.damage.last(), Some(&PhysicalRect::new(0, 0, 32, 22)));
    assert!(!data.alpha);
    assert!(data.filled);

    canvas.refresh(&content);
    let data = backend.object(h).and_then(|o| o.image().cloned()).expect("image");
    assert_eq!(data.uploads, 1);

    let mut window = backend.clone();
    window.resize_window(60, 30);
    canvas.refresh(&content);
    let data = backend.object(h).and_then(|o| o.image().cloned()).expect("image");
    assert_eq!(data.uploads, 2);
    assert_eq!(data.size, (52, 22));
}

#[test]
fn test_unknown_objects_are_skipped() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let sprite = CanvasObject::custom(Sprite { base: Base::new() });
    let rect: CanvasObject = Rectangle::new(Color::BLACK).into();
    let content: CanvasObject = Container::new(vec![sprite.clone(), rect.clone()]).into();
    canvas.set_content(content.clone());
    canvas.refresh(&content);

    assert!(!canvas.contains(&sprite));
    assert!(canvas.contains(&rect));
    assert_eq!(backend.object_count(), 2);
}

#[test]
fn test_objects_added_later_are_built_on_refresh() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let container = Rc::new(Container::new(vec![Rectangle::new(Color::BLACK).into()]));
    let content = CanvasObject::from(container.clone());
    canvas.set_content(content.clone());
    assert_eq!(backend.object_count(), 2);

    let late: CanvasObject = Text::new("late").into();
    container.add(late.clone());
    assert!(!canvas.contains(&late));

    canvas.refresh(&content);
    assert!(canvas.contains(&late));
    assert_eq!(backend.object_count(), 3);
    canvas.refresh(&content);
    assert_eq!(backend.object_count(), 3);
}

#[test]
fn test_press_is_routed_to_button() {
    init();
    let backend = HeadlessBackend::new(200, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let clicks = Rc::new(Cell::new(None));
    let button = {
        let clicks = clicks.clone();
        Button::new("OK", move |ev: &MouseEvent| clicks.set(Some(*ev)))
    };
    canvas.set_content(Container::new(vec![CanvasObject::widget(button)]));

    // lands on the button background, left of the centred label
    let press = backend.press(50, 50, 1).expect("press hits the button");
    assert!(dispatch_mouse_down(press).expect("routed"));
    assert_eq!(
        clicks.get(),
        Some(MouseEvent {
            position: Position::new(46, 46),
            button: MouseButton::Primary,
        })
    );

    // the label routes to the button too
    let press = backend.press(100, 50, 3).expect("press hits the label");
    assert!(dispatch_mouse_down(press).expect("routed"));
    assert_eq!(clicks.get().map(|ev| ev.button), Some(MouseButton::Secondary));
}

#[test]
fn test_press_on_plain_object_is_ignored() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);
    canvas.set_content(Container::new(vec![Rectangle::new(Color::BLACK).into()]));

    let press = backend.press(10, 10, 1).expect("press hits the rectangle");
    assert!(!dispatch_mouse_down(press).expect("routed"));

    let mut stray_backend = backend.clone();
    let stray = stray_backend.add_object(NativeKind::Rectangle);
    let err = dispatch_mouse_down(NativeMouseDown { object: stray, ..press });
    assert!(matches!(err, Err(CanvasError::UnknownObject(h)) if h == stray));
}

#[test]
fn test_surface_is_unregistered_on_close_and_drop() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);
    let id = canvas.surface_id();
    assert!(!is_registered(id));

    canvas.set_content(Container::new(vec![Rectangle::new(Color::BLACK).into()]));
    assert!(is_registered(id));
    let press = backend.press(10, 10, 1).expect("press hits the rectangle");

    canvas.close().expect("canvas is idle");
    assert!(!is_registered(id));
    assert!(matches!(
        dispatch_mouse_down(press),
        Err(CanvasError::UnknownSurface(s)) if s == id
    ));

    let backend = HeadlessBackend::new(100, 100);
    let id = {
        let canvas = Canvas::new(backend.clone(), 1.0);
        canvas.set_content(Rectangle::new(Color::BLACK));
        assert!(is_registered(canvas.surface_id()));
        canvas.surface_id()
    };
    assert!(!is_registered(id));
}

#[test]
fn test_set_scale_resizes_by_ratio() {
    init();
    let backend = HeadlessBackend::new(100, 80);
    let canvas = Canvas::new(backend.clone(), 1.0);
    let rect = Rc::new(Rectangle::new(Color::BLACK));
    canvas.set_content(CanvasObject::from(rect.clone()));

    canvas.set_scale(2.0).expect("valid scale");
    assert_eq!(canvas.scale(), 2.0);
    assert_eq!(backend.window_size(), (200, 160));
    assert_eq!(canvas.size(), Size::new(100, 80));
    assert_eq!(rect.base().position(), Position::new(4, 4));
    assert_eq!(rect.base().size(), Size::new(92, 72));

    assert!(matches!(
        canvas.set_scale(0.0),
        Err(CanvasError::InvalidScale(_))
    ));
    assert!(canvas.set_scale(f32::NAN).is_err());
    assert_eq!(canvas.scale(), 2.0);
}

#[test]
fn test_new_content_replaces_registry() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let first: CanvasObject = Rectangle::new(Color::BLACK).into();
    canvas.set_content(first.clone());
    assert!(canvas.contains(&first));

    let second: CanvasObject = Text::new("next").into();
    canvas.set_content(second.clone());
    assert!(!canvas.contains(&first));
    assert!(canvas.contains(&second));
    assert_eq!(canvas.content(), Some(second));
}

#[test]
fn test_refresh_without_content_does_nothing() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let rect: CanvasObject = Rectangle::new(Color::BLACK).into();
    canvas.refresh(&rect);
    assert!(!canvas.contains(&rect));
    assert_eq!(backend.object_count(), 0);
}

#[test]
fn test_press_is_unscaled_relative_to_object() {
    init();
    // 200x100 logical at 2x
    let backend = HeadlessBackend::new(400, 200);
    let canvas = Canvas::new(backend.clone(), 2.0);

    let clicks = Rc::new(Cell::new(None));
    let button = {
        let clicks = clicks.clone();
        Button::new("OK", move |ev: &MouseEvent| clicks.set(Some(ev.position)))
    };
    canvas.set_content(Container::new(vec![CanvasObject::widget(button)]));

    // the button background starts at physical (8, 8)
    let press = backend.press(50, 50, 1).expect("press hits the button");
    assert_eq!(backend.object(press.object).map(|o| o.geometry.x), Some(8));
    assert!(dispatch_mouse_down(press).expect("routed"));
    assert_eq!(clicks.get(), Some(Position::new(21, 21)));
}

#[test]
fn test_text_style_picks_font_family() {
    init();
    let backend = HeadlessBackend::new(200, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let bold = Rc::new(Text::new("Hi").with_style(TextStyle::BOLD));
    let both = Rc::new(Text::new("Hi").with_style(TextStyle::BOLD | TextStyle::ITALIC));
    let italic = Rc::new(Text::new("Hi").with_style(TextStyle::ITALIC));
    let nodes: Vec<CanvasObject> = vec![bold.clone().into(), both.clone().into(), italic.into()];
    canvas.set_content(Container::with_layout(Fixed, nodes.clone()));

    let fonts: Vec<_> = nodes
        .iter()
        .map(|n| {
            let h = canvas.native(n).expect("text is built");
            backend.object(h).and_then(|o| o.text().and_then(|t| t.font.clone()))
        })
        .collect();
    assert_eq!(
        fonts,
        vec![
            Some(("NotoSans-Bold".to_string(), 14)),
            Some(("NotoSans-BoldItalic".to_string(), 14)),
            Some(("NotoSans-Italic".to_string(), 14)),
        ]
    );

    // bold glyphs advance one pixel further: 2 x (9 + 2)
    assert_eq!(bold.base().min_size(), Size::new(22, 16));
    assert_eq!(both.base().min_size(), Size::new(22, 16));
}

#[test]
fn test_circle_fill_needs_alpha() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let filled: CanvasObject = Circle::new(Position::new(0, 0), Position::new(20, 20))
        .with_fill(Color::WHITE)
        .into();
    let clear: CanvasObject = Circle::new(Position::new(0, 0), Position::new(20, 20))
        .with_fill(Color::WHITE.with_alpha(0))
        .into();
    canvas.set_content(Container::with_layout(
        Fixed,
        vec![filled.clone(), clear.clone()],
    ));

    let fill = |o: &CanvasObject| {
        let h = canvas.native(o).expect("circle is built");
        backend.object(h).and_then(|n| n.vector()).map(|c| c.fill)
    };
    assert_eq!(fill(&filled), Some(Some(Color::WHITE)));
    assert_eq!(fill(&clear), Some(None));
}

#[test]
fn test_icon_image_is_loaded_from_its_file() {
    init();
    let backend = HeadlessBackend::new(100, 100);
    let canvas = Canvas::new(backend.clone(), 1.0);

    let resource = Resource::new("check", "/nonexistent/tessera/icons/check.png");
    let icon = Rc::new(Icon::new(resource.clone()));
    canvas.set_content(Container::new(vec![CanvasObject::Widget(icon.clone())]));

    // layout hands back the same image every time
    let image = icon.layout(icon.base().size()).remove(0);
    let h = canvas.native(&image).expect("icon image is built");
    let data = backend.object(h).and_then(|o| o.image().cloned()).expect("image");
    assert_eq!(data.file, Some(resource.path));
    assert!(data.filled);
    assert!(!data.alpha);
    assert!(data.pixels.is_empty());
}

/// Asks its canvas to refresh from inside its own layout.
struct Reentrant {
    base: Base,
    body: Rc<Rectangle>,
    canvas: Rc<std::cell::RefCell<Option<Rc<Canvas>>>>,
    content: Rc<std::cell::RefCell<Option<CanvasObject>>>,
    layouts: Rc<Cell<usize>>,
}

impl Widget for Reentrant {
    fn base(&self) -> &Base {
        &self.base
    }

    fn layout(&self, size: Size) -> Vec<CanvasObject> {
        self.layouts.set(self.layouts.get() + 1);
        let canvas = self.canvas.borrow().clone();
        let content = self.content.borrow().clone();
        if let (Some(canvas), Some(content)) = (canvas, content) {
            canvas.refresh(&content);
            assert!(canvas.set_scale(1.0).is_err());
        }
        self.body.base().resize(size);
        vec![self.body.clone().into()]
    }

    fn min_size(&self) -> Size {
        Size::default()
    }
}

#[test]
fn test_refresh_from_layout_is_skipped() {
    init();
    let slot = Rc::new(std::cell::RefCell::new(None));
    let content_slot = Rc::new(std::cell::RefCell::new(None));
    let layouts = Rc::new(Cell::new(0));
    let widget = CanvasObject::widget(Reentrant {
        base: Base::new(),
        body: Rc::new(Rectangle::new(Color::BLACK)),
        canvas: slot.clone(),
        content: content_slot.clone(),
        layouts: layouts.clone(),
    });
    let content: CanvasObject = Container::new(vec![widget]).into();

    let canvas = Rc::new(Canvas::new(HeadlessBackend::new(100, 100), 1.0));
    canvas.set_content(content.clone());
    *slot.borrow_mut() = Some(canvas.clone());
    *content_slot.borrow_mut() = Some(content.clone());

    let before = layouts.get();
    canvas.refresh(&content);
    // only the outer refresh ran the layout
    assert_eq!(layouts.get(), before + 1);
    assert_eq!(canvas.scale(), 1.0);

    // break the cycle
    slot.borrow_mut().take();
}
