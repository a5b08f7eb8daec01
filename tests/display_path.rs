use core::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    pixelcolor::Rgb888,
    Pixel,
};
use pinyin_text::{AnnotatedItem, Argb, Padding, PinyinTextStyle, TextContent};
use pinyin_text_embedded_graphics::{argb_to_rgb888, EgSurface, EgTextMeasurer};
use pinyin_text_render::{CommandRecorder, LayoutResult, MeasureSpec, PinyinTextView};

const SENTENCE: &[(&str, &str)] = &[
    ("你", "nǐ"),
    ("在", "zài"),
    ("哪", "nǎ"),
    ("？", " "),
    ("我", "wǒ"),
    ("在", "zài"),
    ("家", "jiā"),
    ("，", " "),
];

#[derive(Default)]
struct PixelCaptureDisplay {
    size: Size,
    pixels: Vec<(Point, Rgb888)>,
}

impl PixelCaptureDisplay {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            pixels: Vec::new(),
        }
    }

    fn count_color(&self, color: Argb) -> usize {
        let color = argb_to_rgb888(color);
        self.pixels.iter().filter(|(_, c)| *c == color).count()
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

fn eg_view(style: PinyinTextStyle) -> PinyinTextView {
    let mut view = PinyinTextView::with_style(style).with_text_measurer(EgTextMeasurer::shared());
    view.set_padding(Padding::uniform(10));
    view
}

#[test]
fn annotated_view_draws_both_rows_in_their_colors() {
    let style = PinyinTextStyle::default()
        .with_colors(Argb(0xFF10_2030), Argb(0xFFC0_4000))
        .with_debug_draw(false);
    let mut view = eg_view(style);
    view.set_annotated_content(SENTENCE.iter().copied());
    let size = view
        .measure(MeasureSpec::exactly(200), MeasureSpec::at_most(400))
        .unwrap();
    assert_eq!(size.width, 200);

    let mut display = PixelCaptureDisplay::new(size.width as u32, size.height as u32);
    let mut surface = EgSurface::new(&mut display);
    view.draw(&mut surface).unwrap();

    assert!(display.count_color(style.text_color) > 0);
    assert!(display.count_color(style.pinyin_text_color) > 0);
    assert!(display
        .pixels
        .iter()
        .all(|(p, _)| p.x >= 10 && p.y >= 10 && p.x < size.width - 10));
}

#[test]
fn eg_measurer_wraps_demo_sentence_onto_several_lines() {
    let mut view = eg_view(PinyinTextStyle::default());
    view.set_annotated_content(SENTENCE.iter().cycle().take(SENTENCE.len() * 4).copied());
    view.measure(MeasureSpec::exactly(160), MeasureSpec::unspecified())
        .unwrap();

    let result = view.layout_result().unwrap();
    assert!(result.line_count > 1);
    for item_box in &result.boxes {
        assert!(item_box.base_rect.right <= 140 || item_box.base_rect.left == 0);
    }
    let last = result.boxes.last().unwrap();
    assert_eq!(last.line, result.line_count - 1);
}

#[test]
fn plain_view_draws_only_text_color() {
    let style = PinyinTextStyle::default();
    let mut view = eg_view(style);
    view.set_plain_content("很高兴认识你！Nice to meet you!");
    let size = view
        .measure(MeasureSpec::exactly(160), MeasureSpec::at_most(400))
        .unwrap();
    let flow = view.plain_layout().unwrap();
    assert!(flow.lines.len() > 1);
    assert_eq!(size.height, flow.height() + 20);

    let mut display = PixelCaptureDisplay::new(size.width as u32, size.height as u32);
    let mut surface = EgSurface::new(&mut display);
    view.draw(&mut surface).unwrap();
    assert_eq!(surface.origin(), Point::zero());
    assert!(display.count_color(style.text_color) > 0);
    assert_eq!(display.count_color(style.pinyin_text_color), 0);
}

#[test]
fn recorded_commands_replay_to_same_pixels() {
    let style = PinyinTextStyle::default().with_debug_draw(true);
    let mut view = eg_view(style);
    view.set_annotated_content(SENTENCE.iter().copied());
    let size = view
        .measure(MeasureSpec::exactly(180), MeasureSpec::unspecified())
        .unwrap();

    let mut recorder = CommandRecorder::new();
    view.draw(&mut recorder).unwrap();

    let mut direct = PixelCaptureDisplay::new(size.width as u32, size.height as u32);
    view.draw(&mut EgSurface::new(&mut direct)).unwrap();
    let mut replayed = PixelCaptureDisplay::new(size.width as u32, size.height as u32);
    recorder.replay(&mut EgSurface::new(&mut replayed)).unwrap();

    assert!(!direct.pixels.is_empty());
    assert_eq!(direct.pixels, replayed.pixels);
}

#[test]
fn layout_result_survives_json() {
    let content = TextContent::annotated([
        AnnotatedItem::from_options(Some("你"), Some("nǐ")),
        AnnotatedItem::from_options(Some("！"), None),
    ]);
    let mut view = eg_view(PinyinTextStyle::default());
    view.set_annotated_content(content.items().to_vec());
    view.measure(MeasureSpec::at_most(300), MeasureSpec::at_most(300))
        .unwrap();

    let result = view.layout_result().unwrap();
    let json = serde_json::to_string(result).unwrap();
    let back: LayoutResult = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, result);
}
