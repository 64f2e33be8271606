use std::io::Write;

use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::core::title::{FontSpec, TextMeasurer};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ClipRect, Color, DrawSurface, FillStyle, LineCap, LineJoin, PathOp, PathPrimitive,
    RectPrimitive, Shadow, StrokeStyle, TextHAlign, TextPrimitive,
};

/// Cairo + Pango + PangoCairo drawing surface.
///
/// Draws either into an owned offscreen image surface or into an external
/// Cairo context (for example a GTK `DrawingArea` callback). Shadows are drawn
/// as an offset copy without blur.
#[derive(Debug)]
pub struct CairoSurface {
    context: Context,
    image: Option<ImageSurface>,
}

impl CairoSurface {
    /// Wraps an external context.
    #[must_use]
    pub fn from_context(context: Context) -> Self {
        Self {
            context,
            image: None,
        }
    }

    /// Creates an offscreen ARGB surface of `width` x `height` device pixels.
    pub fn image(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidViewport {
                width: u32::try_from(width).unwrap_or(0),
                height: u32::try_from(height).unwrap_or(0),
            });
        }

        let image = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&image)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            context,
            image: Some(image),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn image_surface(&self) -> Option<&ImageSurface> {
        self.image.as_ref()
    }

    /// Encodes the offscreen surface as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        let image = self.image.as_ref().ok_or_else(|| {
            ChartError::Backend("surface wraps an external context, not an image".to_owned())
        })?;
        image
            .write_to_png(writer)
            .map_err(|err| ChartError::Backend(format!("failed to encode png: {err}")))
    }

    fn with_shadow<F>(&self, shadow: Option<Shadow>, draw: F) -> ChartResult<()>
    where
        F: Fn(&Context, Color) -> Result<(), cairo::Error>,
    {
        let Some(shadow) = shadow else {
            return Ok(());
        };
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save before shadow", err))?;
        self.context.translate(shadow.offset_x, shadow.offset_y);
        let drawn = draw(&self.context, shadow.color);
        self.context
            .restore()
            .map_err(|err| map_backend_error("failed to restore after shadow", err))?;
        drawn.map_err(|err| map_backend_error("failed to draw shadow", err))
    }

    fn text_layout(&self, text: &str, font: &FontSpec) -> pango::Layout {
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&font_description(font)));
        layout.set_text(text);
        layout
    }
}

impl TextMeasurer for CairoSurface {
    fn measure_text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let (width, _height) = self.text_layout(text, font).pixel_size();
        f64::from(width)
    }
}

impl DrawSurface for CairoSurface {
    fn reset_transform(&mut self) -> ChartResult<()> {
        self.context.identity_matrix();
        self.context.reset_clip();
        Ok(())
    }

    fn save(&mut self) -> ChartResult<()> {
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save context", err))
    }

    fn restore(&mut self) -> ChartResult<()> {
        self.context
            .restore()
            .map_err(|err| map_backend_error("failed to restore context", err))
    }

    fn clip_rect(&mut self, clip: ClipRect) -> ChartResult<()> {
        self.context.new_path();
        self.context.rectangle(clip.x, clip.y, clip.width, clip.height);
        self.context.clip();
        Ok(())
    }

    fn fill_rect(&mut self, rect: RectPrimitive) -> ChartResult<()> {
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        apply_color(&self.context, rect.fill_color);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))
    }

    fn stroke_path(&mut self, path: &PathPrimitive, style: StrokeStyle) -> ChartResult<()> {
        let prepare = |context: &Context, color: Color| {
            append_path(context, path);
            apply_color(context, color);
            context.set_line_width(style.width);
            context.set_line_cap(match style.cap {
                LineCap::Butt => cairo::LineCap::Butt,
                LineCap::Round => cairo::LineCap::Round,
            });
            context.set_line_join(match style.join {
                LineJoin::Miter => cairo::LineJoin::Miter,
                LineJoin::Round => cairo::LineJoin::Round,
            });
            context.stroke()
        };
        self.with_shadow(style.shadow, &prepare)?;
        prepare(&self.context, style.color)
            .map_err(|err| map_backend_error("failed to stroke path", err))
    }

    fn fill_path(&mut self, path: &PathPrimitive, style: FillStyle) -> ChartResult<()> {
        let prepare = |context: &Context, color: Color| {
            append_path(context, path);
            apply_color(context, color);
            context.fill()
        };
        self.with_shadow(style.shadow, &prepare)?;
        prepare(&self.context, style.color)
            .map_err(|err| map_backend_error("failed to fill path", err))
    }

    fn fill_text(&mut self, text: &TextPrimitive) -> ChartResult<()> {
        let layout = self.text_layout(&text.text, &text.font);
        let (text_width, _text_height) = layout.pixel_size();
        let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);
        let dx = match text.h_align {
            TextHAlign::Left => 0.0,
            TextHAlign::Center => -f64::from(text_width) / 2.0,
            TextHAlign::Right => -f64::from(text_width),
        };

        let show = |context: &Context, color: Color| {
            context.save()?;
            context.translate(text.x, text.y);
            context.rotate(-text.rotation);
            context.move_to(dx, -baseline);
            apply_color(context, color);
            pangocairo::functions::show_layout(context, &layout);
            context.restore()
        };
        self.with_shadow(text.shadow, &show)?;
        show(&self.context, text.color).map_err(|err| map_backend_error("failed to draw text", err))
    }
}

fn font_description(font: &FontSpec) -> FontDescription {
    let family = font.face.replace(['\'', '"'], "");
    let mut description = FontDescription::new();
    description.set_family(&family);
    description.set_absolute_size(font.size_px * f64::from(pango::SCALE));
    if font.bold {
        description.set_weight(pango::Weight::Bold);
    }
    description
}

fn append_path(context: &Context, path: &PathPrimitive) {
    context.new_path();
    for op in &path.ops {
        match *op {
            PathOp::MoveTo { x, y } => context.move_to(x, y),
            PathOp::LineTo { x, y } => context.line_to(x, y),
            PathOp::Arc {
                center_x,
                center_y,
                radius,
                start_angle,
                end_angle,
            } => context.arc(center_x, center_y, radius, start_angle, end_angle),
        }
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
