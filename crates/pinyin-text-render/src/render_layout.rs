use pinyin_text::{
    AnnotatedItem, PinyinTextError, PinyinTextStyle, Rect, MIN_PINYIN_TEXT_SIZE_PX,
    MIN_TEXT_SIZE_PX,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Glyph measurement hook used by every layout pass.
pub trait TextMeasurer: Send + Sync {
    /// Advance width of `text` at `font_size_px`, rounded up to whole pixels.
    fn text_width_px(&self, text: &str, font_size_px: i32) -> i32;

    /// Height of the tight bounding box around the glyphs of `text`.
    fn text_height_px(&self, text: &str, font_size_px: i32) -> i32;

    /// Baseline-to-baseline distance for paragraph flow.
    fn line_height_px(&self, font_size_px: i32) -> i32 {
        (font_size_px as f32 * 1.2).ceil() as i32
    }
}

/// True for glyphs that occupy a full em cell (CJK ideographs, kana, hangul,
/// CJK punctuation, full-width forms).
pub fn is_full_width(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA000..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x2FFFD
            | 0x30000..=0x3FFFD
    )
}

/// Font-free measurer built on per-glyph em estimates.
///
/// Used when no backend measurer is installed so layout stays deterministic.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicMeasurer;

impl HeuristicMeasurer {
    pub fn shared() -> Arc<dyn TextMeasurer> {
        Arc::new(Self)
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn text_width_px(&self, text: &str, font_size_px: i32) -> i32 {
        let em_sum: f32 = text.chars().map(glyph_em_width).sum();
        (em_sum * font_size_px as f32).ceil() as i32
    }

    fn text_height_px(&self, text: &str, font_size_px: i32) -> i32 {
        let (ascent, descent) = text
            .chars()
            .map(glyph_em_extent)
            .fold((0.0f32, 0.0f32), |(a, d), (ga, gd)| (a.max(ga), d.max(gd)));
        ((ascent + descent) * font_size_px as f32).ceil() as i32
    }
}

fn glyph_em_width(ch: char) -> f32 {
    match ch {
        c if is_full_width(c) => 1.0,
        ' ' | '\u{00A0}' => 0.32,
        '\t' => 1.28,
        'i' | 'l' | 'I' | '|' | '!' => 0.24,
        '.' | ',' | ':' | ';' | '\'' | '"' | '`' => 0.23,
        '-' => 0.34,
        '(' | ')' | '[' | ']' | '{' | '}' => 0.30,
        'f' | 't' | 'j' | 'r' => 0.34,
        'm' | 'w' | 'M' | 'W' | '@' | '%' | '&' | '#' => 0.74,
        c if c.is_ascii_digit() => 0.52,
        c if c.is_ascii_uppercase() => 0.64,
        c if c.is_ascii_lowercase() => 0.52,
        c if c.is_whitespace() => 0.32,
        c if c.is_ascii_punctuation() => 0.42,
        _ => 0.56,
    }
}

/// (ascent, descent) in em above and below the baseline.
fn glyph_em_extent(ch: char) -> (f32, f32) {
    match ch {
        c if c.is_whitespace() => (0.0, 0.0),
        c if is_full_width(c) => (0.84, 0.08),
        'g' | 'j' | 'p' | 'q' | 'y' => (0.52, 0.22),
        'b' | 'd' | 'f' | 'h' | 'k' | 'l' | 't' | 'i' => (0.72, 0.0),
        c if c.is_ascii_lowercase() => (0.52, 0.0),
        c if c.is_ascii_alphanumeric() || c.is_ascii_punctuation() => (0.72, 0.0),
        // Tone-marked vowels and other accented letters.
        _ => (0.74, 0.0),
    }
}

/// Metrics snapshot for one annotated layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Base row font size.
    pub base_font_size_px: i32,
    /// Annotation row font size.
    pub annotation_font_size_px: i32,
    /// Gap between an annotation row and its base row.
    pub row_gap_px: i32,
    /// Gap between adjacent items on a line.
    pub item_gap_px: i32,
    /// Extra gap between consecutive lines.
    pub line_gap_px: i32,
    /// Width available for content.
    pub available_width: i32,
    /// Report `available_width` as the measured width regardless of content.
    pub width_is_exact: bool,
    /// Height available for content; `None` when unbounded.
    pub available_height: Option<i32>,
    /// Report `available_height` as the measured height regardless of content.
    pub height_is_exact: bool,
}

impl LayoutMetrics {
    /// Metrics for a style with unbounded, content-sized axes.
    pub fn from_style(style: &PinyinTextStyle) -> Self {
        Self {
            base_font_size_px: style.text_size_px(),
            annotation_font_size_px: style.pinyin_text_size_px(),
            row_gap_px: style.row_gap_px(),
            item_gap_px: style.item_gap_px(),
            line_gap_px: style.line_gap_px(),
            available_width: i32::MAX,
            width_is_exact: false,
            available_height: None,
            height_is_exact: false,
        }
    }

    /// Constrain the width; `exact` fixes the measured width to `width`.
    pub fn with_width(mut self, width: i32, exact: bool) -> Self {
        self.available_width = width.max(0);
        self.width_is_exact = exact;
        self
    }

    /// Constrain the height; `exact` fixes the measured height to `height`.
    pub fn with_height(mut self, height: i32, exact: bool) -> Self {
        self.available_height = Some(height.max(0));
        self.height_is_exact = exact;
        self
    }

    /// Reject font sizes the widget would refuse at configuration time.
    pub fn validate(&self) -> Result<(), PinyinTextError> {
        if self.base_font_size_px < MIN_TEXT_SIZE_PX {
            return Err(PinyinTextError::InvalidMetric {
                metric: "text_size",
                value: self.base_font_size_px,
                min: MIN_TEXT_SIZE_PX,
            });
        }
        if self.annotation_font_size_px < MIN_PINYIN_TEXT_SIZE_PX {
            return Err(PinyinTextError::InvalidMetric {
                metric: "pinyin_text_size",
                value: self.annotation_font_size_px,
                min: MIN_PINYIN_TEXT_SIZE_PX,
            });
        }
        Ok(())
    }

    fn exact_height(&self) -> Option<i32> {
        self.available_height.filter(|_| self.height_is_exact)
    }
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self::from_style(&PinyinTextStyle::default())
    }
}

/// Computed geometry for one [`AnnotatedItem`], in local content coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBox {
    /// Annotation run box; `bottom` is the annotation baseline.
    pub annotation_rect: Rect,
    /// Base run box; `bottom` is the base baseline.
    pub base_rect: Rect,
    /// Zero-based line index.
    pub line: usize,
}

/// Output of one annotated layout pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// One box per input item, in input order.
    pub boxes: Vec<ItemBox>,
    /// Content width (padding excluded).
    pub measured_width: i32,
    /// Content height (padding excluded).
    pub measured_height: i32,
    /// Shared height of every base row.
    pub base_row_height: i32,
    /// Shared height of every annotation row.
    pub annotation_row_height: i32,
    /// Number of lines used.
    pub line_count: usize,
}

impl LayoutResult {
    /// Vertical distance from one line's annotation top to the next line's.
    pub fn line_advance(&self, metrics: &LayoutMetrics) -> i32 {
        self.base_row_height
            .saturating_add(self.annotation_row_height)
            .saturating_add(metrics.row_gap_px)
            .saturating_add(metrics.line_gap_px)
    }
}

/// Greedy line-wrap layout for (base, annotation) pairs.
///
/// Items flow left to right. Each item is as wide as the wider of its two
/// runs; a new line starts only when the next item would overflow the
/// available width on a non-empty line, so an oversized item sits alone on
/// its own line instead of being split.
#[derive(Clone)]
pub struct AnnotatedRunLayout {
    metrics: LayoutMetrics,
    text_measurer: Arc<dyn TextMeasurer>,
}

impl core::fmt::Debug for AnnotatedRunLayout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnnotatedRunLayout")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl AnnotatedRunLayout {
    /// Create a layout using the heuristic measurer.
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self {
            metrics,
            text_measurer: HeuristicMeasurer::shared(),
        }
    }

    /// Install a backend measurer so widths match what will be drawn.
    pub fn with_text_measurer(mut self, measurer: Arc<dyn TextMeasurer>) -> Self {
        self.text_measurer = measurer;
        self
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    /// Lay out `items` into wrapped lines.
    pub fn measure(&self, items: &[AnnotatedItem]) -> Result<LayoutResult, PinyinTextError> {
        let m = &self.metrics;
        m.validate()?;

        if items.is_empty() {
            return Ok(LayoutResult {
                measured_width: if m.width_is_exact {
                    m.available_width
                } else {
                    0
                },
                measured_height: m.exact_height().unwrap_or(0),
                ..LayoutResult::default()
            });
        }

        let measurer = self.text_measurer.as_ref();
        let (base_row_height, annotation_row_height) = self.row_heights(items);
        let line_advance = base_row_height
            .saturating_add(annotation_row_height)
            .saturating_add(m.row_gap_px)
            .saturating_add(m.line_gap_px);

        let mut boxes = Vec::with_capacity(items.len());
        let mut line_width = 0i32;
        let mut max_line_width = 0i32;
        let mut line = 0usize;
        let mut baseline_offset = 0i32;
        let mut line_is_empty = true;

        for (idx, item) in items.iter().enumerate() {
            let base_width = measurer.text_width_px(&item.base, m.base_font_size_px);
            let annotation_width =
                measurer.text_width_px(&item.annotation, m.annotation_font_size_px);
            let item_width = base_width.max(annotation_width);

            let gap = if line_is_empty { 0 } else { m.item_gap_px };
            let needed = line_width.saturating_add(gap).saturating_add(item_width);
            if !line_is_empty && needed > m.available_width {
                line += 1;
                line_width = item_width;
                baseline_offset = baseline_offset.saturating_add(line_advance);
                log::trace!(
                    "item {} wraps to line {} (needed {}px of {}px)",
                    idx,
                    line,
                    needed,
                    m.available_width
                );
            } else {
                line_width = needed;
            }
            line_is_empty = false;

            if item_width > m.available_width {
                log::warn!(
                    "item {} is {}px wide but only {}px are available; placing it alone",
                    idx,
                    item_width,
                    m.available_width
                );
            }
            max_line_width = max_line_width.max(line_width);

            let left = line_width - item_width;
            let annotation_rect = Rect::from_origin_size(
                left,
                baseline_offset,
                annotation_width,
                annotation_row_height,
            );
            let base_rect = Rect::from_origin_size(
                left,
                annotation_rect.bottom.saturating_add(m.row_gap_px),
                base_width,
                base_row_height,
            );
            boxes.push(ItemBox {
                annotation_rect,
                base_rect,
                line,
            });
        }

        let measured_width = if m.width_is_exact {
            m.available_width
        } else {
            max_line_width.min(m.available_width)
        };
        let measured_height = match m.exact_height() {
            Some(height) => height,
            None => {
                // Quarter base row of bottom slack so descenders are not clipped.
                let content = baseline_offset
                    .saturating_add(annotation_row_height)
                    .saturating_add(m.row_gap_px)
                    .saturating_add(base_row_height)
                    .saturating_add(base_row_height / 4);
                m.available_height
                    .map_or(content, |limit| content.min(limit))
            }
        };

        let result = LayoutResult {
            boxes,
            measured_width,
            measured_height,
            base_row_height,
            annotation_row_height,
            line_count: line + 1,
        };
        log::debug!(
            "annotated layout: {} items on {} lines, {}x{}px",
            items.len(),
            result.line_count,
            result.measured_width,
            result.measured_height
        );
        Ok(result)
    }

    /// Row heights come from the whole content at once so every line gets
    /// the same rows regardless of which glyphs it holds.
    fn row_heights(&self, items: &[AnnotatedItem]) -> (i32, i32) {
        let mut base_text = String::new();
        let mut annotation_text = String::new();
        for item in items {
            base_text.push_str(&item.base);
            annotation_text.push_str(&item.annotation);
        }
        let measurer = self.text_measurer.as_ref();
        let row_height = |text: &str, size: i32| {
            if text.is_empty() {
                0
            } else {
                measurer.text_height_px(text, size)
            }
        };
        (
            row_height(&base_text, self.metrics.base_font_size_px),
            row_height(&annotation_text, self.metrics.annotation_font_size_px),
        )
    }
}

/// One wrapped line of plain text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainLine {
    pub text: String,
    pub width: i32,
}

/// Paragraph flow for plain (unannotated) text at a single size.
///
/// Lines break after whitespace and around full-width glyphs; `\n` forces a
/// break. A token wider than the line is placed alone rather than split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainTextLayout {
    pub lines: Vec<PlainLine>,
    pub font_size_px: i32,
    pub line_height: i32,
    /// Width the text would take without soft wrapping.
    pub desired_width: i32,
}

impl PlainTextLayout {
    pub fn layout(
        text: &str,
        font_size_px: i32,
        max_width: i32,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let mut lines = Vec::new();
        let mut desired_width = 0;
        for paragraph in text.split('\n') {
            desired_width = desired_width.max(measurer.text_width_px(paragraph, font_size_px));
            wrap_paragraph(paragraph, font_size_px, max_width, measurer, &mut lines);
        }
        let layout = Self {
            lines,
            font_size_px,
            line_height: measurer.line_height_px(font_size_px),
            desired_width,
        };
        log::debug!(
            "plain layout: {} lines, desired width {}px, wrap width {}px",
            layout.lines.len(),
            layout.desired_width,
            max_width
        );
        layout
    }

    pub fn height(&self) -> i32 {
        self.lines.len() as i32 * self.line_height
    }

    /// Widest wrapped line.
    pub fn max_line_width(&self) -> i32 {
        self.lines.iter().map(|l| l.width).max().unwrap_or(0)
    }

    /// Baseline of line `index` relative to the top of the flow.
    pub fn baseline(&self, index: usize) -> i32 {
        (index as i32 + 1) * self.line_height - self.line_height / 5
    }
}

fn wrap_paragraph(
    paragraph: &str,
    font_size_px: i32,
    max_width: i32,
    measurer: &dyn TextMeasurer,
    lines: &mut Vec<PlainLine>,
) {
    let mut current = String::new();
    for token in break_tokens(paragraph) {
        let mut candidate = current.clone();
        candidate.push_str(token);
        let fits = measurer.text_width_px(candidate.trim_end(), font_size_px) <= max_width;
        if fits || current.trim().is_empty() {
            current = candidate;
            continue;
        }
        push_line(&current, font_size_px, measurer, lines);
        current = token.trim_start().to_string();
    }
    push_line(&current, font_size_px, measurer, lines);
}

fn push_line(
    text: &str,
    font_size_px: i32,
    measurer: &dyn TextMeasurer,
    lines: &mut Vec<PlainLine>,
) {
    let text = text.trim_end();
    lines.push(PlainLine {
        text: text.to_string(),
        width: measurer.text_width_px(text, font_size_px),
    });
}

/// Closing CJK punctuation that must not begin a line.
fn is_closing_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '、' | '。'
            | '，'
            | '．'
            | '！'
            | '？'
            | '；'
            | '：'
            | '）'
            | '］'
            | '｝'
            | '」'
            | '』'
            | '】'
            | '〕'
            | '〗'
            | '〉'
            | '》'
            | '｣'
    )
}

/// Split a paragraph at break opportunities, keeping trailing whitespace on
/// each token. Closing punctuation stays with the token before it.
fn break_tokens(paragraph: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0usize;
    let mut in_trailing_space = false;
    for (idx, ch) in paragraph.char_indices() {
        let breaks_before = idx > start
            && !is_closing_punctuation(ch)
            && ((in_trailing_space && !ch.is_whitespace()) || is_full_width(ch));
        if breaks_before {
            tokens.push(&paragraph[start..idx]);
            start = idx;
            in_trailing_space = false;
        }
        // A full-width glyph ends its token like whitespace does.
        if ch.is_whitespace() || is_full_width(ch) {
            in_trailing_space = true;
        }
    }
    if start < paragraph.len() {
        tokens.push(&paragraph[start..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every glyph is `size` wide; half-width glyphs are half of that.
    struct CellMeasurer;

    impl TextMeasurer for CellMeasurer {
        fn text_width_px(&self, text: &str, font_size_px: i32) -> i32 {
            text.chars()
                .map(|ch| {
                    if is_full_width(ch) {
                        font_size_px
                    } else {
                        font_size_px / 2
                    }
                })
                .sum()
        }

        fn text_height_px(&self, text: &str, font_size_px: i32) -> i32 {
            if text.trim().is_empty() {
                0
            } else {
                font_size_px
            }
        }

        fn line_height_px(&self, font_size_px: i32) -> i32 {
            font_size_px + 4
        }
    }

    fn layout(metrics: LayoutMetrics) -> AnnotatedRunLayout {
        AnnotatedRunLayout::new(metrics).with_text_measurer(Arc::new(CellMeasurer))
    }

    fn metrics(width: i32) -> LayoutMetrics {
        LayoutMetrics {
            base_font_size_px: 20,
            annotation_font_size_px: 16,
            row_gap_px: 5,
            item_gap_px: 10,
            line_gap_px: 0,
            ..LayoutMetrics::default()
        }
        .with_width(width, false)
    }

    fn items(pairs: &[(&str, &str)]) -> Vec<AnnotatedItem> {
        pairs.iter().map(|&p| AnnotatedItem::from(p)).collect()
    }

    #[test]
    fn full_width_ranges_cover_cjk_and_fullwidth_punctuation() {
        for ch in ['你', '？', '，', '！', '。', 'あ', '한'] {
            assert!(is_full_width(ch), "{:?}", ch);
        }
        for ch in ['a', 'ǐ', '?', ' ', '1'] {
            assert!(!is_full_width(ch), "{:?}", ch);
        }
    }

    #[test]
    fn heuristic_measurer_is_wider_for_ideographs() {
        let m = HeuristicMeasurer;
        assert_eq!(m.text_width_px("你", 20), 20);
        assert!(m.text_width_px("ni", 20) < m.text_width_px("你好", 20));
        assert_eq!(m.text_width_px("", 20), 0);
        assert_eq!(m.text_height_px("   ", 20), 0);
        assert!(m.text_height_px("py", 20) > m.text_height_px("ao", 20));
    }

    #[test]
    fn row_heights_are_shared_by_all_items() {
        let result = layout(metrics(1000))
            .measure(&items(&[("你", "nǐ"), ("？", " ")]))
            .unwrap();
        assert_eq!(result.base_row_height, 20);
        assert_eq!(result.annotation_row_height, 16);
        for item_box in &result.boxes {
            assert_eq!(item_box.base_rect.height(), 20);
            assert_eq!(item_box.annotation_rect.height(), 16);
        }
    }

    #[test]
    fn wide_annotation_sets_item_width() {
        let result = layout(metrics(1000))
            .measure(&items(&[("双", "shuāng"), ("人", "rén")]))
            .unwrap();
        // "shuāng" = 6 half-width glyphs at 16px = 48px, wider than 20px base.
        assert_eq!(result.boxes[0].annotation_rect.width(), 48);
        assert_eq!(result.boxes[0].base_rect.width(), 20);
        assert_eq!(result.boxes[1].annotation_rect.left, 48 + 10);
        assert_eq!(result.measured_width, 48 + 10 + 24);
    }

    #[test]
    fn wrapped_line_restarts_at_left_edge() {
        let result = layout(metrics(50))
            .measure(&items(&[("你", "nǐ"), ("在", "zài"), ("哪", "nǎ")]))
            .unwrap();
        // Widths are 20, 24 and 20px; any two plus the 10px gap exceed 50px.
        assert_eq!(result.line_count, 3);
        for item_box in &result.boxes {
            assert_eq!(item_box.annotation_rect.left, 0);
        }
        let advance = result.line_advance(&metrics(50));
        assert_eq!(result.boxes[2].annotation_rect.top, 2 * advance);
        assert_eq!(result.measured_width, 24);
    }

    #[test]
    fn line_gap_adds_to_line_advance() {
        let mut m = metrics(30);
        m.line_gap_px = 7;
        let result = layout(m).measure(&items(&[("你", ""), ("好", "")])).unwrap();
        assert_eq!(result.annotation_row_height, 0);
        assert_eq!(result.boxes[1].annotation_rect.top, 20 + 5 + 7);
    }

    #[test]
    fn non_exact_height_adds_quarter_base_row() {
        let result = layout(metrics(1000))
            .measure(&items(&[("你", "nǐ")]))
            .unwrap();
        assert_eq!(result.measured_height, 16 + 5 + 20 + 5);
    }

    #[test]
    fn at_most_height_caps_measured_height() {
        let m = metrics(1000).with_height(30, false);
        let result = layout(m).measure(&items(&[("你", "nǐ")])).unwrap();
        assert_eq!(result.measured_height, 30);
    }

    #[test]
    fn exact_axes_report_requested_size() {
        let m = metrics(300).with_width(300, true).with_height(90, true);
        let result = layout(m).measure(&items(&[("你", "nǐ")])).unwrap();
        assert_eq!((result.measured_width, result.measured_height), (300, 90));
    }

    #[test]
    fn empty_items_measure_zero_or_exact() {
        let result = layout(metrics(100)).measure(&[]).unwrap();
        assert!(result.boxes.is_empty());
        assert_eq!((result.measured_width, result.measured_height), (0, 0));

        let exact = metrics(100).with_width(100, true).with_height(40, true);
        let result = layout(exact).measure(&[]).unwrap();
        assert_eq!((result.measured_width, result.measured_height), (100, 40));
    }

    #[test]
    fn invalid_font_sizes_fail_before_layout() {
        let mut m = metrics(100);
        m.base_font_size_px = 1;
        assert!(matches!(
            layout(m).measure(&items(&[("你", "nǐ")])),
            Err(PinyinTextError::InvalidMetric {
                metric: "text_size",
                ..
            })
        ));

        let mut m = metrics(100);
        m.annotation_font_size_px = 0;
        assert!(matches!(
            layout(m).measure(&[]),
            Err(PinyinTextError::InvalidMetric {
                metric: "pinyin_text_size",
                ..
            })
        ));
    }

    #[test]
    fn unbounded_width_keeps_everything_on_one_line() {
        let many: Vec<AnnotatedItem> = (0..200).map(|_| AnnotatedItem::new("你", "nǐ")).collect();
        let m = LayoutMetrics {
            base_font_size_px: 20,
            annotation_font_size_px: 16,
            ..LayoutMetrics::default()
        };
        let result = layout(m).measure(&many).unwrap();
        assert_eq!(result.line_count, 1);
    }

    #[test]
    fn break_tokens_split_after_spaces_and_around_ideographs() {
        assert_eq!(break_tokens("Nice to meet"), ["Nice ", "to ", "meet"]);
        assert_eq!(break_tokens("很高ab"), ["很", "高", "ab"]);
        assert_eq!(break_tokens("你！How"), ["你！", "How"]);
        assert_eq!(break_tokens("家，我"), ["家，", "我"]);
        assert_eq!(break_tokens("a  b"), ["a  ", "b"]);
        assert!(break_tokens("").is_empty());
    }

    #[test]
    fn plain_layout_wraps_at_width_and_drops_leading_space() {
        // Half-width glyphs are 10px at size 20.
        let flow = PlainTextLayout::layout("Nice to meet you", 20, 80, &CellMeasurer);
        let texts: Vec<&str> = flow.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["Nice to", "meet you"]);
        assert_eq!(flow.desired_width, 160);
        assert_eq!(flow.line_height, 24);
        assert_eq!(flow.height(), 48);
        assert!(flow.max_line_width() <= 80);
    }

    #[test]
    fn plain_layout_breaks_between_ideographs() {
        let flow = PlainTextLayout::layout("很高兴认识你", 20, 50, &CellMeasurer);
        let texts: Vec<&str> = flow.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["很高", "兴认", "识你"]);
    }

    #[test]
    fn closing_punctuation_never_starts_a_wrapped_line() {
        let flow = PlainTextLayout::layout("很高兴认识你！", 20, 60, &CellMeasurer);
        let texts: Vec<&str> = flow.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["很高兴", "认识", "你！"]);

        let flow = PlainTextLayout::layout("我在家，你呢？", 20, 60, &CellMeasurer);
        for line in &flow.lines {
            let first = line.text.chars().next().unwrap();
            assert!(!is_closing_punctuation(first), "{:?}", line.text);
        }
    }

    #[test]
    fn huge_line_gap_saturates_line_positions() {
        let mut m = metrics(30);
        m.line_gap_px = i32::MAX;
        m.row_gap_px = i32::MAX / 2;
        let result = layout(m)
            .measure(&items(&[("你", "nǐ"), ("好", "hǎo"), ("吗", "ma")]))
            .unwrap();
        assert_eq!(result.line_count, 3);
        assert_eq!(result.boxes[1].annotation_rect.top, i32::MAX);
        assert_eq!(result.boxes[2].base_rect.bottom, i32::MAX);
        assert_eq!(result.measured_height, i32::MAX);
        assert_eq!(result.line_advance(&m), i32::MAX);
    }

    #[test]
    fn plain_layout_honors_hard_breaks_and_oversized_tokens() {
        let flow = PlainTextLayout::layout("a\nsupercalifragilistic b", 20, 50, &CellMeasurer);
        let texts: Vec<&str> = flow.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "supercalifragilistic", "b"]);
        assert_eq!(flow.baseline(0), 24 - 4);
        assert_eq!(flow.baseline(1), 48 - 4);
    }
}
