//! embedded-graphics backend for `pinyin-text-render`.
//!
//! Glyph runs are drawn with the built-in ASCII mono fonts. Tone-marked
//! pinyin vowels fold to their base letters, and full-width glyphs (which the
//! mono fonts cannot show) are drawn as outlined placeholder cells two
//! columns wide. [`EgTextMeasurer`] reports the same advances so layout and
//! drawing agree pixel for pixel.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_5X8, FONT_6X10, FONT_7X14, FONT_9X18},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use pinyin_text::{Argb, Rect};
use pinyin_text_render::{is_full_width, DrawSurface, TextMeasurer};
use std::borrow::Cow;
use std::sync::Arc;

/// Backend-local font identifier.
pub type FontId = u8;

/// Extra pixels between lines on top of the font's character height.
pub const LINE_LEADING_PX: i32 = 2;

/// Backend-provided metrics for one font size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    /// Advance of one half-width glyph.
    pub char_width: i32,
    pub char_height: i32,
    /// Distance from the top of a glyph cell to its baseline.
    pub baseline: i32,
}

impl FontMetrics {
    /// Advance of `text` once normalized; full-width glyphs take two columns.
    pub fn run_width(&self, text: &str) -> i32 {
        normalize_text_for_mono(text)
            .chars()
            .map(|ch| {
                if is_full_width(ch) {
                    2 * self.char_width
                } else {
                    self.char_width
                }
            })
            .sum()
    }
}

/// Font abstraction used by [`EgSurface`] and [`EgTextMeasurer`].
pub trait FontBackend {
    fn metrics(&self, font_size_px: i32) -> FontMetrics;

    /// Draw `text` with its left edge at `origin.x` and baseline at
    /// `origin.y`, returning the advance in pixels.
    fn draw_text_run<D>(
        &self,
        display: &mut D,
        font_size_px: i32,
        text: &str,
        origin: Point,
        color: Rgb888,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>;
}

/// `TextMeasurer` adapter backed by this crate's `FontBackend` metrics.
#[derive(Clone, Debug)]
pub struct EgTextMeasurer<B = MonoFontBackend> {
    backend: B,
}

impl EgTextMeasurer<MonoFontBackend> {
    /// Create a default measurer using the mono backend.
    pub fn new() -> Self {
        Self {
            backend: MonoFontBackend,
        }
    }

    /// Create a shared measurer trait object for view wiring.
    pub fn shared() -> Arc<dyn TextMeasurer> {
        Arc::new(Self::new())
    }
}

impl Default for EgTextMeasurer<MonoFontBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> EgTextMeasurer<B>
where
    B: FontBackend,
{
    /// Create a measurer using an explicit backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }
}

impl<B> TextMeasurer for EgTextMeasurer<B>
where
    B: FontBackend + Send + Sync,
{
    fn text_width_px(&self, text: &str, font_size_px: i32) -> i32 {
        self.backend.metrics(font_size_px).run_width(text)
    }

    fn text_height_px(&self, text: &str, font_size_px: i32) -> i32 {
        if text.is_empty() {
            0
        } else {
            self.backend.metrics(font_size_px).char_height
        }
    }

    fn line_height_px(&self, font_size_px: i32) -> i32 {
        self.backend.metrics(font_size_px).char_height + LINE_LEADING_PX
    }
}

/// Mono-font backend picking the closest built-in font by pixel size.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoFontBackend;

impl MonoFontBackend {
    const SIZE_TINY: FontId = 0;
    const SIZE_SMALL: FontId = 1;
    const SIZE_MEDIUM: FontId = 2;
    const SIZE_LARGE: FontId = 3;
    const SIZE_XL: FontId = 4;

    fn size_bucket_for(font_size_px: i32) -> FontId {
        if font_size_px >= 20 {
            Self::SIZE_XL
        } else if font_size_px >= 18 {
            Self::SIZE_LARGE
        } else if font_size_px >= 14 {
            Self::SIZE_MEDIUM
        } else if font_size_px >= 10 {
            Self::SIZE_SMALL
        } else {
            Self::SIZE_TINY
        }
    }

    fn font_for(size_bucket: FontId) -> &'static MonoFont<'static> {
        match size_bucket {
            Self::SIZE_TINY => &FONT_5X8,
            Self::SIZE_SMALL => &FONT_6X10,
            Self::SIZE_MEDIUM => &FONT_7X14,
            Self::SIZE_LARGE => &FONT_9X18,
            Self::SIZE_XL => &FONT_10X20,
            _ => &FONT_7X14,
        }
    }

    /// Built-in font used for `font_size_px`.
    pub fn font_for_size(font_size_px: i32) -> &'static MonoFont<'static> {
        Self::font_for(Self::size_bucket_for(font_size_px))
    }
}

impl FontBackend for MonoFontBackend {
    fn metrics(&self, font_size_px: i32) -> FontMetrics {
        let font = Self::font_for_size(font_size_px);
        FontMetrics {
            char_width: (font.character_size.width + font.character_spacing) as i32,
            char_height: font.character_size.height as i32,
            baseline: font.baseline as i32,
        }
    }

    fn draw_text_run<D>(
        &self,
        display: &mut D,
        font_size_px: i32,
        text: &str,
        origin: Point,
        color: Rgb888,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let metrics = self.metrics(font_size_px);
        let style = MonoTextStyle::new(Self::font_for_size(font_size_px), color);
        let normalized = normalize_text_for_mono(text);

        let mut x = origin.x;
        let mut run_start = 0usize;
        for (idx, ch) in normalized.char_indices() {
            if !is_full_width(ch) {
                continue;
            }
            if run_start < idx {
                let run = &normalized[run_start..idx];
                Text::with_baseline(run, Point::new(x, origin.y), style, Baseline::Alphabetic)
                    .draw(display)?;
                x += metrics.run_width(run);
            }
            log::trace!(
                "no mono glyph for {:?} at {}px; drawing placeholder cell",
                ch,
                font_size_px
            );
            draw_placeholder_cell(display, &metrics, Point::new(x, origin.y), color)?;
            x += 2 * metrics.char_width;
            run_start = idx + ch.len_utf8();
        }
        if run_start < normalized.len() {
            let run = &normalized[run_start..];
            Text::with_baseline(run, Point::new(x, origin.y), style, Baseline::Alphabetic)
                .draw(display)?;
            x += metrics.run_width(run);
        }
        Ok(x - origin.x)
    }
}

/// Outline standing in for a glyph the mono fonts cannot draw.
fn draw_placeholder_cell<D>(
    display: &mut D,
    metrics: &FontMetrics,
    origin: Point,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let width = (2 * metrics.char_width - 2).max(1) as u32;
    let height = metrics.char_height.max(1) as u32;
    Rectangle::new(
        Point::new(origin.x + 1, origin.y - metrics.baseline),
        Size::new(width, height),
    )
    .into_styled(PrimitiveStyle::with_stroke(color, 1))
    .draw(display)
}

/// Replace characters the ASCII mono fonts lack with close ASCII forms.
pub fn normalize_text_for_mono(text: &str) -> Cow<'_, str> {
    if text.chars().all(|ch| mono_replacement(ch).is_none()) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match mono_replacement(ch) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

fn mono_replacement(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'ā' | 'á' | 'ǎ' | 'à' => "a",
        'Ā' | 'Á' | 'Ǎ' | 'À' => "A",
        'ē' | 'é' | 'ě' | 'è' | 'ê' => "e",
        'Ē' | 'É' | 'Ě' | 'È' | 'Ê' => "E",
        'ī' | 'í' | 'ǐ' | 'ì' => "i",
        'Ī' | 'Í' | 'Ǐ' | 'Ì' => "I",
        'ō' | 'ó' | 'ǒ' | 'ò' => "o",
        'Ō' | 'Ó' | 'Ǒ' | 'Ò' => "O",
        'ū' | 'ú' | 'ǔ' | 'ù' | 'ü' | 'ǖ' | 'ǘ' | 'ǚ' | 'ǜ' => "u",
        'Ū' | 'Ú' | 'Ǔ' | 'Ù' | 'Ü' | 'Ǖ' | 'Ǘ' | 'Ǚ' | 'Ǜ' => "U",
        'ń' | 'ň' | 'ǹ' => "n",
        'ḿ' => "m",
        '\u{00A0}' => " ",
        '\u{2013}' | '\u{2014}' => "-",
        '\u{2018}' | '\u{2019}' => "'",
        '\u{201C}' | '\u{201D}' => "\"",
        '\u{2026}' => "...",
        _ => return None,
    };
    Some(folded)
}

/// Drop the alpha channel; the mono fonts draw opaque pixels only.
pub fn argb_to_rgb888(color: Argb) -> Rgb888 {
    Rgb888::new(color.red(), color.green(), color.blue())
}

/// [`DrawSurface`] over an embedded-graphics display.
pub struct EgSurface<'a, D, B = MonoFontBackend> {
    display: &'a mut D,
    backend: B,
    origin: Point,
}

impl<'a, D> EgSurface<'a, D, MonoFontBackend>
where
    D: DrawTarget<Color = Rgb888>,
{
    pub fn new(display: &'a mut D) -> Self {
        Self::with_backend(display, MonoFontBackend)
    }
}

impl<'a, D, B> EgSurface<'a, D, B>
where
    D: DrawTarget<Color = Rgb888>,
    B: FontBackend,
{
    pub fn with_backend(display: &'a mut D, backend: B) -> Self {
        Self {
            display,
            backend,
            origin: Point::zero(),
        }
    }

    /// Offset applied to every call after translations.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn display(&self) -> &D {
        &*self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut *self.display
    }

    /// Fill the whole display with `color`.
    pub fn clear(&mut self, color: Argb) -> Result<(), D::Error> {
        self.display.clear(argb_to_rgb888(color))
    }
}

impl<D, B> DrawSurface for EgSurface<'_, D, B>
where
    D: DrawTarget<Color = Rgb888>,
    B: FontBackend,
{
    type Error = D::Error;

    fn draw_glyph_run(
        &mut self,
        text: &str,
        baseline_x: i32,
        baseline_y: i32,
        color: Argb,
        font_size_px: i32,
    ) -> Result<(), Self::Error> {
        if text.is_empty() {
            return Ok(());
        }
        let origin = self.origin + Point::new(baseline_x, baseline_y);
        self.backend.draw_text_run(
            &mut *self.display,
            font_size_px,
            text,
            origin,
            argb_to_rgb888(color),
        )?;
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Argb) -> Result<(), Self::Error> {
        if rect.is_empty() {
            return Ok(());
        }
        let shifted = rect.offset(self.origin.x, self.origin.y);
        Rectangle::new(
            Point::new(shifted.left, shifted.top),
            Size::new(shifted.width() as u32, shifted.height() as u32),
        )
        .into_styled(PrimitiveStyle::with_stroke(argb_to_rgb888(color), 1))
        .draw(&mut *self.display)
    }

    fn translate_origin(&mut self, dx: i32, dy: i32) -> Result<(), Self::Error> {
        self.origin += Point::new(dx, dy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_graphics::mock_display::MockDisplay;
    use pinyin_text::{Padding, PinyinTextStyle};
    use pinyin_text_render::{MeasureSpec, PinyinTextView};

    #[derive(Default)]
    struct PixelCaptureDisplay {
        size: Size,
        pixels: Vec<(Point, Rgb888)>,
    }

    impl PixelCaptureDisplay {
        fn with_size(width: u32, height: u32) -> Self {
            Self {
                size: Size::new(width, height),
                pixels: Vec::new(),
            }
        }

        fn contains(&self, point: Point) -> bool {
            self.pixels.iter().any(|(p, _)| *p == point)
        }
    }

    impl OriginDimensions for PixelCaptureDisplay {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for PixelCaptureDisplay {
        type Color = Rgb888;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                self.pixels.push((point, color));
            }
            Ok(())
        }
    }

    #[test]
    fn size_buckets_pick_expected_fonts() {
        let backend = MonoFontBackend;
        let cell = |px| {
            let m = backend.metrics(px);
            (m.char_width, m.char_height)
        };
        assert_eq!(cell(8), (5, 8));
        assert_eq!(cell(11), (6, 10));
        assert_eq!(cell(14), (7, 14));
        assert_eq!(cell(16), (7, 14));
        assert_eq!(cell(18), (9, 18));
        assert_eq!(cell(20), (10, 20));
        assert_eq!(cell(64), (10, 20));
    }

    #[test]
    fn measurer_counts_full_width_glyphs_as_two_columns() {
        let measurer = EgTextMeasurer::new();
        assert_eq!(measurer.text_width_px("nǐ", 20), 20);
        assert_eq!(measurer.text_width_px("你", 20), 20);
        assert_eq!(measurer.text_width_px("你好 ni", 20), 2 * 20 + 3 * 10);
        assert_eq!(measurer.text_width_px("…", 14), 3 * 7);
        assert_eq!(measurer.text_height_px("", 20), 0);
        assert_eq!(measurer.text_height_px("zài", 11), 10);
        assert_eq!(measurer.line_height_px(14), 16);
    }

    #[test]
    fn tone_marks_fold_to_base_letters() {
        assert_eq!(normalize_text_for_mono("lǜ nǚ hǎo"), "lu nu hao");
        assert_eq!(normalize_text_for_mono("ń ňg ḿ"), "n ng m");
        assert!(matches!(normalize_text_for_mono("shi"), Cow::Borrowed(_)));
        assert_eq!(normalize_text_for_mono("a\u{2014}b"), "a-b");
    }

    #[test]
    fn argb_drops_alpha() {
        assert_eq!(argb_to_rgb888(Argb(0x80FF_8000)), Rgb888::new(0xFF, 0x80, 0x00));
    }

    #[test]
    fn glyph_run_draws_in_run_color_right_of_origin() {
        let mut display = PixelCaptureDisplay::with_size(64, 48);
        let mut surface = EgSurface::new(&mut display);
        surface
            .draw_glyph_run("Hi", 2, 30, Argb(0xFFFF_0000), 20)
            .unwrap();

        assert!(!display.pixels.is_empty());
        for (point, color) in &display.pixels {
            assert_eq!(*color, Rgb888::new(0xFF, 0, 0));
            assert!((2..22).contains(&point.x), "{:?}", point);
            assert!((10..40).contains(&point.y), "{:?}", point);
        }
    }

    #[test]
    fn full_width_glyph_draws_placeholder_outline() {
        let metrics = MonoFontBackend.metrics(20);
        let mut display = PixelCaptureDisplay::with_size(64, 48);
        let mut surface = EgSurface::new(&mut display);
        surface.draw_glyph_run("你", 0, 30, Argb::BLACK, 20).unwrap();

        let top = 30 - metrics.baseline;
        let right = 2 * metrics.char_width - 2;
        assert!(display.contains(Point::new(1, top)));
        assert!(display.contains(Point::new(right, top + metrics.char_height - 1)));
        assert!(!display.contains(Point::new(metrics.char_width, top + metrics.char_height / 2)));
    }

    struct RecordingLogger(std::sync::Mutex<Vec<String>>);

    impl log::Log for RecordingLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            self.0.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    static LOGGER: RecordingLogger = RecordingLogger(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn placeholder_cells_are_traced() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let mut display = PixelCaptureDisplay::with_size(64, 48);
        let mut surface = EgSurface::new(&mut display);
        surface.draw_glyph_run("a好", 0, 30, Argb::BLACK, 20).unwrap();

        let messages = LOGGER.0.lock().unwrap();
        assert!(messages
            .iter()
            .any(|m| m.contains("placeholder") && m.contains("'好'")));
    }

    #[test]
    fn translate_shifts_later_calls() {
        let mut display = PixelCaptureDisplay::with_size(32, 32);
        let mut surface = EgSurface::new(&mut display);
        surface.translate_origin(5, 7).unwrap();
        assert_eq!(surface.origin(), Point::new(5, 7));
        surface
            .stroke_rect(Rect::new(0, 0, 4, 4), Argb::BLACK)
            .unwrap();
        surface.translate_origin(-5, -7).unwrap();
        surface
            .stroke_rect(Rect::new(0, 0, 0, 9), Argb::BLACK)
            .unwrap();

        assert!(display.contains(Point::new(5, 7)));
        assert!(display.contains(Point::new(8, 10)));
        assert!(!display.contains(Point::new(6, 8)));
        assert!(!display.contains(Point::new(0, 0)));
    }

    #[test]
    fn view_renders_onto_mock_display() {
        let mut display = MockDisplay::<Rgb888>::new();
        display.set_allow_overdraw(true);

        let style = PinyinTextStyle::default().with_debug_draw(true);
        let mut view =
            PinyinTextView::with_style(style).with_text_measurer(EgTextMeasurer::shared());
        view.set_padding(Padding::uniform(1));
        view.set_annotated_content([("你", "nǐ")]);
        let size = view
            .measure(MeasureSpec::at_most(64), MeasureSpec::at_most(64))
            .unwrap();
        assert!(size.width <= 64 && size.height <= 64);

        let mut surface = EgSurface::new(&mut display);
        let result = view.draw(&mut surface);
        assert!(result.is_ok());
    }
}
