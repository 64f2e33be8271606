use crate::core::types::DeviceViewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ClipRect, DrawSurface, FillStyle, PathPrimitive, RectPrimitive, StrokeStyle, TextPrimitive,
};

/// Z-ordered layers of one chart frame, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderLayer {
    Background,
    Series,
    Axes,
    Notation,
    Labels,
    Title,
}

impl RenderLayer {
    pub const ORDERED: [Self; 6] = [
        Self::Background,
        Self::Series,
        Self::Axes,
        Self::Notation,
        Self::Labels,
        Self::Title,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    Clip(ClipRect),
    FillRect(RectPrimitive),
    StrokePath {
        path: PathPrimitive,
        style: StrokeStyle,
    },
    FillPath {
        path: PathPrimitive,
        style: FillStyle,
    },
    FillText(TextPrimitive),
}

impl DrawCommand {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Save | Self::Restore => Ok(()),
            Self::Clip(clip) => clip.validate(),
            Self::FillRect(rect) => rect.validate(),
            Self::StrokePath { path, style } => {
                path.validate()?;
                style.validate()
            }
            Self::FillPath { path, style } => {
                path.validate()?;
                style.validate()
            }
            Self::FillText(text) => text.validate(),
        }
    }
}

/// Per-pass counters reported after a frame is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub rects_drawn: usize,
    pub paths_stroked: usize,
    pub paths_filled: usize,
    pub texts_drawn: usize,
}

impl RenderStats {
    #[must_use]
    pub fn total(&self) -> usize {
        self.rects_drawn + self.paths_stroked + self.paths_filled + self.texts_drawn
    }
}

/// Backend-agnostic scene for one chart draw pass.
///
/// Commands are bucketed by layer, so replay order follows the layer z-order
/// whatever order they were pushed in.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: DeviceViewport,
    layers: [Vec<DrawCommand>; 6],
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: DeviceViewport) -> Self {
        Self {
            viewport,
            layers: Default::default(),
        }
    }

    pub fn push(&mut self, layer: RenderLayer, command: DrawCommand) {
        self.layers[layer.index()].push(command);
    }

    #[must_use]
    pub fn layer(&self, layer: RenderLayer) -> &[DrawCommand] {
        &self.layers[layer.index()]
    }

    /// Every command in replay order, tagged with its layer.
    pub fn commands(&self) -> impl Iterator<Item = (RenderLayer, &DrawCommand)> + '_ {
        RenderLayer::ORDERED
            .into_iter()
            .flat_map(move |layer| self.layer(layer).iter().map(move |cmd| (layer, cmd)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::DegenerateViewport {
                extent_px: self.viewport.width.min(self.viewport.height),
            });
        }

        let mut depth = 0usize;
        for (layer, command) in self.commands() {
            command.validate()?;
            match command {
                DrawCommand::Save => depth += 1,
                DrawCommand::Restore => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        ChartError::InvalidData(format!("unbalanced restore in {layer:?} layer"))
                    })?;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(ChartError::InvalidData(format!(
                "{depth} unrestored save command(s) in frame"
            )));
        }
        Ok(())
    }

    /// Validates the frame, then draws it on `surface`.
    ///
    /// The surface transform is reset before the first command so state left by
    /// a previous pass never compounds.
    pub fn replay<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> ChartResult<RenderStats> {
        self.validate()?;
        surface.reset_transform()?;

        let mut stats = RenderStats::default();
        for (_, command) in self.commands() {
            match command {
                DrawCommand::Save => surface.save()?,
                DrawCommand::Restore => surface.restore()?,
                DrawCommand::Clip(clip) => surface.clip_rect(*clip)?,
                DrawCommand::FillRect(rect) => {
                    surface.fill_rect(*rect)?;
                    stats.rects_drawn += 1;
                }
                DrawCommand::StrokePath { path, style } => {
                    surface.stroke_path(path, *style)?;
                    stats.paths_stroked += 1;
                }
                DrawCommand::FillPath { path, style } => {
                    surface.fill_path(path, *style)?;
                    stats.paths_filled += 1;
                }
                DrawCommand::FillText(text) => {
                    surface.fill_text(text)?;
                    stats.texts_drawn += 1;
                }
            }
        }
        Ok(stats)
    }
}
