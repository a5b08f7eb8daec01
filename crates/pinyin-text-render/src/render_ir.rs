use core::convert::Infallible;
use pinyin_text::{AnnotatedItem, Argb, Padding, PinyinTextStyle, Rect};
use serde::{Deserialize, Serialize};

use crate::render_layout::{LayoutResult, PlainTextLayout};

/// Drawing backend consumed by the render replay.
///
/// Every call carries its full style; implementations should not rely on
/// state left behind by earlier calls other than the translated origin.
pub trait DrawSurface {
    type Error;

    /// Draw `text` with its left edge at `baseline_x` and baseline at `baseline_y`.
    fn draw_glyph_run(
        &mut self,
        text: &str,
        baseline_x: i32,
        baseline_y: i32,
        color: Argb,
        font_size_px: i32,
    ) -> Result<(), Self::Error>;

    /// Stroke a one pixel outline around `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: Argb) -> Result<(), Self::Error>;

    /// Shift the origin of all subsequent calls by `(dx, dy)`.
    fn translate_origin(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error>;
}

impl<S> DrawSurface for &mut S
where
    S: DrawSurface + ?Sized,
{
    type Error = S::Error;

    fn draw_glyph_run(
        &mut self,
        text: &str,
        baseline_x: i32,
        baseline_y: i32,
        color: Argb,
        font_size_px: i32,
    ) -> Result<(), Self::Error> {
        (**self).draw_glyph_run(text, baseline_x, baseline_y, color, font_size_px)
    }

    fn stroke_rect(&mut self, rect: Rect, color: Argb) -> Result<(), Self::Error> {
        (**self).stroke_rect(rect, color)
    }

    fn translate_origin(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error> {
        (**self).translate_origin(dx, dy)
    }
}

/// Glyph run draw command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphRunCommand {
    /// Content.
    pub text: String,
    /// Left x.
    pub baseline_x: i32,
    /// Baseline y.
    pub baseline_y: i32,
    pub color: Argb,
    pub font_size_px: i32,
}

/// Outline rectangle draw command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeRectCommand {
    pub rect: Rect,
    pub color: Argb,
}

/// Backend-agnostic draw command, recorded in call order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw a glyph run.
    GlyphRun(GlyphRunCommand),
    /// Stroke a rectangle outline.
    StrokeRect(StrokeRectCommand),
    /// Shift the drawing origin.
    Translate { dx: i32, dy: i32 },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    origin: (i32, i32),
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Accumulated origin offset from all translate calls.
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Recorded glyph runs, skipping outlines and translations.
    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRunCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::GlyphRun(run) => Some(run),
            _ => None,
        })
    }

    /// Recorded rectangle outlines.
    pub fn stroked_rects(&self) -> impl Iterator<Item = &StrokeRectCommand> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::StrokeRect(rect) => Some(rect),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.origin = (0, 0);
    }

    /// Replay recorded commands onto another surface.
    pub fn replay<S>(&self, surface: &mut S) -> Result<(), S::Error>
    where
        S: DrawSurface + ?Sized,
    {
        for cmd in &self.commands {
            match cmd {
                DrawCommand::GlyphRun(run) => surface.draw_glyph_run(
                    &run.text,
                    run.baseline_x,
                    run.baseline_y,
                    run.color,
                    run.font_size_px,
                )?,
                DrawCommand::StrokeRect(rect) => surface.stroke_rect(rect.rect, rect.color)?,
                DrawCommand::Translate { dx, dy } => surface.translate_origin(*dx, *dy)?,
            }
        }
        Ok(())
    }
}

impl DrawSurface for CommandRecorder {
    type Error = Infallible;

    fn draw_glyph_run(
        &mut self,
        text: &str,
        baseline_x: i32,
        baseline_y: i32,
        color: Argb,
        font_size_px: i32,
    ) -> Result<(), Self::Error> {
        self.commands.push(DrawCommand::GlyphRun(GlyphRunCommand {
            text: text.to_string(),
            baseline_x,
            baseline_y,
            color,
            font_size_px,
        }));
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Argb) -> Result<(), Self::Error> {
        self.commands
            .push(DrawCommand::StrokeRect(StrokeRectCommand { rect, color }));
        Ok(())
    }

    fn translate_origin(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error> {
        self.origin = (self.origin.0 + dx, self.origin.1 + dy);
        self.commands.push(DrawCommand::Translate { dx, dy });
        Ok(())
    }
}

/// Replay an annotated layout onto `surface`.
///
/// Each item draws its base run, then its annotation run, both anchored at
/// the bottom-left of their boxes shifted by the padding. `layout` is read
/// only, so the same result can be drawn any number of times.
pub fn render_annotated<S>(
    surface: &mut S,
    layout: &LayoutResult,
    items: &[AnnotatedItem],
    padding: Padding,
    style: &PinyinTextStyle,
    debug_outline: bool,
) -> Result<(), S::Error>
where
    S: DrawSurface + ?Sized,
{
    if layout.boxes.len() != items.len() {
        log::warn!(
            "layout has {} boxes for {} items; drawing the common prefix",
            layout.boxes.len(),
            items.len()
        );
    }
    for (item, item_box) in items.iter().zip(&layout.boxes) {
        let base_rect = item_box.base_rect.offset(padding.left, padding.top);
        surface.draw_glyph_run(
            &item.base,
            base_rect.left,
            base_rect.bottom,
            style.text_color,
            style.text_size_px(),
        )?;
        if debug_outline {
            surface.stroke_rect(base_rect, style.text_color)?;
        }

        let annotation_rect = item_box.annotation_rect.offset(padding.left, padding.top);
        surface.draw_glyph_run(
            &item.annotation,
            annotation_rect.left,
            annotation_rect.bottom,
            style.pinyin_text_color,
            style.pinyin_text_size_px(),
        )?;
        if debug_outline {
            surface.stroke_rect(annotation_rect, style.pinyin_text_color)?;
        }
    }
    Ok(())
}

/// Replay a plain paragraph flow onto `surface` in a single color.
pub fn render_plain<S>(
    surface: &mut S,
    flow: &PlainTextLayout,
    padding: Padding,
    color: Argb,
) -> Result<(), S::Error>
where
    S: DrawSurface + ?Sized,
{
    surface.translate_origin(padding.left, padding.top)?;
    for (idx, line) in flow.lines.iter().enumerate() {
        if line.text.is_empty() {
            continue;
        }
        surface.draw_glyph_run(&line.text, 0, flow.baseline(idx), color, flow.font_size_px)?;
    }
    surface.translate_origin(-padding.left, -padding.top)
}
