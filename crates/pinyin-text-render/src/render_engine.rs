use pinyin_text::{
    AnnotatedItem, Argb, DrawMode, Padding, PinyinTextError, PinyinTextStyle, TextContent,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::render_ir::{render_annotated, render_plain, DrawSurface};
use crate::render_layout::{
    AnnotatedRunLayout, HeuristicMeasurer, LayoutMetrics, LayoutResult, PlainTextLayout,
    TextMeasurer,
};

/// How a parent constrains one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureMode {
    /// The final size is `size`, whatever the content needs.
    Exactly,
    /// Report the content size, capped at `size`.
    AtMost,
    /// No constraint; report the content size.
    Unspecified,
}

/// One axis of a size negotiation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasureSpec {
    pub size: i32,
    pub mode: MeasureMode,
}

impl MeasureSpec {
    pub const fn exactly(size: i32) -> Self {
        Self {
            size,
            mode: MeasureMode::Exactly,
        }
    }

    pub const fn at_most(size: i32) -> Self {
        Self {
            size,
            mode: MeasureMode::AtMost,
        }
    }

    pub const fn unspecified() -> Self {
        Self {
            size: 0,
            mode: MeasureMode::Unspecified,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.mode == MeasureMode::Exactly
    }

    /// Space left for content once `padding_px` is taken out.
    fn content_size(&self, padding_px: i32) -> Option<i32> {
        match self.mode {
            MeasureMode::Unspecified => None,
            MeasureMode::Exactly | MeasureMode::AtMost => {
                Some(self.size.saturating_sub(padding_px).max(0))
            }
        }
    }
}

/// Size reported back to the parent, padding included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasuredSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ViewLayout {
    Annotated(LayoutResult),
    Plain(PlainTextLayout),
}

/// Pinyin text widget: content, style, and the last measured layout.
///
/// The host drives it the way a view hierarchy would: change content or
/// style, call [`measure`](Self::measure) with the parent's constraints,
/// then [`draw`](Self::draw) onto a surface. Geometry is rebuilt from
/// scratch on every measure.
#[derive(Clone)]
pub struct PinyinTextView {
    style: PinyinTextStyle,
    padding: Padding,
    content: TextContent,
    text_measurer: Arc<dyn TextMeasurer>,
    layout: Option<ViewLayout>,
    measured: MeasuredSize,
    needs_layout: bool,
    needs_redraw: bool,
}

impl core::fmt::Debug for PinyinTextView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PinyinTextView")
            .field("style", &self.style)
            .field("padding", &self.padding)
            .field("content", &self.content)
            .field("measured", &self.measured)
            .field("needs_layout", &self.needs_layout)
            .finish_non_exhaustive()
    }
}

impl Default for PinyinTextView {
    fn default() -> Self {
        Self::with_style(PinyinTextStyle::default())
    }
}

impl PinyinTextView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: PinyinTextStyle) -> Self {
        Self {
            style,
            padding: Padding::default(),
            content: TextContent::default(),
            text_measurer: HeuristicMeasurer::shared(),
            layout: None,
            measured: MeasuredSize::default(),
            needs_layout: true,
            needs_redraw: true,
        }
    }

    /// Install the measurer matching the surface this view will draw on.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.set_text_measurer(measurer);
        self
    }

    pub fn set_text_measurer(&mut self, measurer: Arc<dyn TextMeasurer>) {
        self.text_measurer = measurer;
        self.request_layout();
    }

    pub fn style(&self) -> &PinyinTextStyle {
        &self.style
    }

    /// Replace the whole style at once; an invalid style is rejected and
    /// the current one kept.
    pub fn set_style(&mut self, style: PinyinTextStyle) -> Result<(), PinyinTextError> {
        style.validate()?;
        self.style = style;
        self.request_layout();
        Ok(())
    }

    pub fn text_size(&self) -> i32 {
        self.style.text_size_px()
    }

    /// Set the base text size; fails for sizes below 2px.
    pub fn set_text_size(&mut self, px: i32) -> Result<(), PinyinTextError> {
        self.style.set_text_size(px)?;
        self.request_layout();
        Ok(())
    }

    pub fn pinyin_text_size(&self) -> i32 {
        self.style.pinyin_text_size_px()
    }

    /// Set the annotation size; fails for sizes below 1px. Later base size
    /// changes keep this value.
    pub fn set_pinyin_text_size(&mut self, px: i32) -> Result<(), PinyinTextError> {
        self.style.set_pinyin_text_size(px)?;
        self.request_layout();
        Ok(())
    }

    pub fn set_text_color(&mut self, color: Argb) {
        self.style.text_color = color;
        self.invalidate();
    }

    pub fn set_pinyin_text_color(&mut self, color: Argb) {
        self.style.pinyin_text_color = color;
        self.invalidate();
    }

    /// Spacing between lines; half of it separates each annotation row from
    /// its base row.
    pub fn set_line_spacing(&mut self, px: i32) {
        self.style.line_spacing_px = px;
        self.request_layout();
    }

    /// Alias of [`set_line_spacing`](Self::set_line_spacing).
    pub fn set_horizontal_spacing(&mut self, px: i32) {
        self.set_line_spacing(px);
    }

    /// Spacing between adjacent items on a line.
    pub fn set_item_spacing(&mut self, px: i32) {
        self.style.item_spacing_px = px;
        self.request_layout();
    }

    /// Alias of [`set_item_spacing`](Self::set_item_spacing).
    pub fn set_vertical_spacing(&mut self, px: i32) {
        self.set_item_spacing(px);
    }

    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.style.debug_draw = enabled;
        self.invalidate();
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: Padding) {
        self.padding = padding;
        self.request_layout();
    }

    pub fn content(&self) -> &TextContent {
        &self.content
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.content.mode()
    }

    /// Show annotated pairs, replacing any previous content.
    pub fn set_annotated_content<I, T>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<AnnotatedItem>,
    {
        self.content = TextContent::annotated(pairs);
        self.layout = None;
        self.request_layout();
    }

    /// Show plain text, replacing any previous content.
    pub fn set_plain_content(&mut self, text: impl Into<String>) {
        self.content = TextContent::plain(text);
        self.layout = None;
        self.request_layout();
    }

    /// Drop content and geometry, keeping the current mode and style.
    pub fn clear(&mut self) {
        self.content.clear();
        self.layout = None;
        self.request_layout();
    }

    /// Layout from the last annotated measure pass.
    pub fn layout_result(&self) -> Option<&LayoutResult> {
        match &self.layout {
            Some(ViewLayout::Annotated(result)) => Some(result),
            _ => None,
        }
    }

    /// Flow from the last plain-text measure pass.
    pub fn plain_layout(&self) -> Option<&PlainTextLayout> {
        match &self.layout {
            Some(ViewLayout::Plain(flow)) => Some(flow),
            _ => None,
        }
    }

    pub fn measured_size(&self) -> MeasuredSize {
        self.measured
    }

    /// Content or layout-affecting style changed since the last measure.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Something visible changed since the last draw.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    fn request_layout(&mut self) {
        self.needs_layout = true;
        self.needs_redraw = true;
    }

    fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    /// Negotiate a size with the parent and rebuild geometry.
    pub fn measure(
        &mut self,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> Result<MeasuredSize, PinyinTextError> {
        let measured = match &self.content {
            TextContent::Annotated(items) if !items.is_empty() => {
                let result = match self.measure_annotated(items, width_spec, height_spec) {
                    Ok(result) => result,
                    Err(err) => {
                        self.layout = None;
                        return Err(err);
                    }
                };
                let size = self.padded(result.measured_width, result.measured_height);
                self.layout = Some(ViewLayout::Annotated(result));
                size
            }
            TextContent::Plain(text) if !text.is_empty() => {
                let (flow, size) = self.measure_plain(text, width_spec, height_spec);
                self.layout = Some(ViewLayout::Plain(flow));
                size
            }
            _ => {
                self.layout = None;
                self.measure_default(width_spec, height_spec)
            }
        };
        self.measured = measured;
        self.needs_layout = false;
        Ok(measured)
    }

    fn padded(&self, width: i32, height: i32) -> MeasuredSize {
        MeasuredSize {
            width: width.saturating_add(self.padding.horizontal()),
            height: height.saturating_add(self.padding.vertical()),
        }
    }

    fn measure_default(&self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> MeasuredSize {
        MeasuredSize {
            width: if width_spec.is_exact() {
                width_spec.size
            } else {
                self.padding.horizontal()
            },
            height: if height_spec.is_exact() {
                height_spec.size
            } else {
                self.padding.vertical()
            },
        }
    }

    fn measure_annotated(
        &self,
        items: &[AnnotatedItem],
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> Result<LayoutResult, PinyinTextError> {
        let mut metrics = LayoutMetrics::from_style(&self.style);
        if let Some(width) = width_spec.content_size(self.padding.horizontal()) {
            metrics = metrics.with_width(width, width_spec.is_exact());
        }
        if let Some(height) = height_spec.content_size(self.padding.vertical()) {
            metrics = metrics.with_height(height, height_spec.is_exact());
        }
        AnnotatedRunLayout::new(metrics)
            .with_text_measurer(Arc::clone(&self.text_measurer))
            .measure(items)
    }

    fn measure_plain(
        &self,
        text: &str,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> (PlainTextLayout, MeasuredSize) {
        let available = width_spec.content_size(self.padding.horizontal());
        let flow = PlainTextLayout::layout(
            text,
            self.style.text_size_px(),
            available.unwrap_or(i32::MAX),
            self.text_measurer.as_ref(),
        );
        let width = match available {
            Some(width) if width_spec.is_exact() => width,
            Some(width) => width.min(flow.desired_width),
            None => flow.desired_width,
        };
        let height = match height_spec.content_size(self.padding.vertical()) {
            Some(height) if height_spec.is_exact() => height,
            _ => flow.height(),
        };
        let size = self.padded(width, height);
        (flow, size)
    }

    /// Draw the last measured layout. Nothing is drawn before the first
    /// measure, or after a content or size change until the next one; the
    /// redraw request stays pending in that case.
    pub fn draw<S>(&mut self, surface: &mut S) -> Result<(), S::Error>
    where
        S: DrawSurface + ?Sized,
    {
        if self.needs_layout {
            if self.layout.is_some() {
                log::warn!("skipping draw: layout is stale until the next measure");
            }
            return Ok(());
        }
        match &self.layout {
            Some(ViewLayout::Annotated(result)) => render_annotated(
                surface,
                result,
                self.content.items(),
                self.padding,
                &self.style,
                self.style.debug_draw,
            )?,
            Some(ViewLayout::Plain(flow)) => {
                render_plain(surface, flow, self.padding, self.style.text_color)?
            }
            None => {}
        }
        self.needs_redraw = false;
        Ok(())
    }
}
