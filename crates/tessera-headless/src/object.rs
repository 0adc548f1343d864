use std::path::{Path, PathBuf};

use tessera_core::{Color, NativeKind, PhysicalRect, VectorCircle};

#[derive(Clone, Debug)]
pub struct NativeObject {
    pub kind: NativeKind,
    pub geometry: PhysicalRect,
    pub color: Color,
    pub visible: bool,
    pub mouse_down: bool,
    pub data: ObjectData,
}

#[derive(Clone, Debug)]
pub enum ObjectData {
    Text(TextData),
    Rectangle,
    Image(ImageData),
    Line(Option<[i32; 4]>),
    Vector(Option<VectorCircle>),
}

#[derive(Clone, Debug, Default)]
pub struct TextData {
    pub text: String,
    pub font: Option<(String, i32)>,
}

#[derive(Clone, Debug, Default)]
pub struct ImageData {
    pub alpha: bool,
    pub filled: bool,
    pub file: Option<PathBuf>,
    /// Buffer size as set by `set_image_size` or by decoding `file`.
    pub size: (i32, i32),
    pub pixels: Vec<u32>,
    pub damage: Vec<PhysicalRect>,
    pub uploads: usize,
}

impl NativeObject {
    pub(crate) fn new(kind: NativeKind) -> Self {
        let data = match kind {
            NativeKind::Text => ObjectData::Text(TextData::default()),
            NativeKind::Rectangle => ObjectData::Rectangle,
            NativeKind::Image => ObjectData::Image(ImageData {
                alpha: true,
                ..ImageData::default()
            }),
            NativeKind::Line => ObjectData::Line(None),
            NativeKind::Vector => ObjectData::Vector(None),
        };
        Self {
            kind,
            geometry: PhysicalRect::default(),
            color: Color::WHITE,
            visible: false,
            mouse_down: false,
            data,
        }
    }

    pub fn text(&self) -> Option<&TextData> {
        match &self.data {
            ObjectData::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageData> {
        match &self.data {
            ObjectData::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn line(&self) -> Option<[i32; 4]> {
        match &self.data {
            ObjectData::Line(points) => *points,
            _ => None,
        }
    }

    pub fn vector(&self) -> Option<VectorCircle> {
        match &self.data {
            ObjectData::Vector(c) => *c,
            _ => None,
        }
    }
}

/// Fixed-pitch glyph metrics: every character advances three fifths of the
/// point size (one pixel wider for bold families) and stands 1.2x as tall.
pub fn glyph_extents(family: &str, size: i32) -> (i32, i32) {
    let bold = family.contains("Bold");
    let advance = size * 3 / 5 + i32::from(bold && size > 0);
    (advance, size * 6 / 5)
}

/// Decodes an image file into 0xAARRGGBB pixels.
pub(crate) fn decode_file(path: &Path) -> Result<((i32, i32), Vec<u32>), image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let (w, h) = rgba.dimensions();
    let pixels = rgba
        .pixels()
        .map(|p| Color(p[0], p[1], p[2], p[3]).to_argb())
        .collect();
    Ok(((w as i32, h as i32), pixels))
}
