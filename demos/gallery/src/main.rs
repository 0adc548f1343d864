use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use tessera_canvas::{Canvas, dispatch_mouse_down};
use tessera_core::*;
use tessera_headless::HeadlessBackend;

/// Stacks children top to bottom at their minimum height, full width.
struct Column;

impl Layout for Column {
    fn layout(&self, objects: &[CanvasObject], size: Size) {
        let pad = theme::padding();
        let mut y = 0;
        for o in objects {
            let h = o.min_size().height;
            o.move_to(Position::new(0, y));
            o.resize(Size::new(size.width, h));
            y += h + pad;
        }
    }

    fn min_size(&self, objects: &[CanvasObject]) -> Size {
        let pad = theme::padding();
        let mut min = Size::default();
        for (i, o) in objects.iter().enumerate() {
            let m = o.min_size();
            min.width = min.width.max(m.width);
            min.height += m.height + if i > 0 { pad } else { 0 };
        }
        min
    }
}

fn gradient(x: i32, y: i32, w: i32, h: i32) -> Color {
    Color::from_rgb(
        (x * 255 / w.max(1)) as u8,
        (y * 255 / h.max(1)) as u8,
        ((x + y) * 255 / (w + h).max(1)) as u8,
    )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load().context("loading settings")?;
    settings.install();

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gallery.png"));

    let count = Rc::new(Cell::new(0));
    let counter = Rc::new(Text::new("Clicked 0 times").with_style(TextStyle::BOLD));
    let button = CanvasObject::widget({
        let count = count.clone();
        Button::new("Increment", move |ev: &MouseEvent| {
            count.set(count.get() + 1);
            log::info!("button pressed at {:?}", ev.position);
        })
    });

    let picture = Rc::new(Image::from_fn(gradient));
    picture.base().set_min_size(Size::new(160, 90));
    let picture = CanvasObject::from(picture);

    let content: CanvasObject = Container::with_layout(
        Column,
        vec![
            CanvasObject::widget(Label::new("Tessera gallery")),
            counter.clone().into(),
            button.clone(),
            Line::new(Position::new(0, 0), Position::new(160, 0), Color::WHITE).into(),
            picture.clone(),
            CanvasObject::widget(Icon::new(theme::confirm_icon())),
        ],
    )
    .into();

    let backend = HeadlessBackend::new(320, 240);
    let canvas = Canvas::new(backend.clone(), settings.scale);
    canvas.set_content(content.clone());
    log::info!("window is {:?} logical", canvas.size());

    let bg = canvas
        .native(&button)
        .and_then(|h| backend.object(h))
        .context("button was not built")?
        .geometry;
    if let Some(press) = backend.press(bg.x + bg.w / 2, bg.y + bg.h / 2, 1) {
        dispatch_mouse_down(press)?;
    }
    counter.set_text(format!("Clicked {} times", count.get()));
    canvas.refresh(&content);

    let data = canvas
        .native(&picture)
        .and_then(|h| backend.object(h))
        .and_then(|o| o.image().cloned())
        .context("picture was not rendered")?;
    let (w, h) = data.size;
    let mut img = image::RgbaImage::new(w.max(0) as u32, h.max(0) as u32);
    for (px, argb) in img.pixels_mut().zip(&data.pixels) {
        let c = Color::from_argb(*argb);
        *px = image::Rgba([c.r(), c.g(), c.b(), c.a()]);
    }
    img.save(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("wrote {}x{} gradient to {}", w, h, out.display());
    Ok(())
}
