//! Annotated line layout, draw IR, and widget orchestration for `pinyin-text`.

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

mod render_engine;
mod render_ir;
mod render_layout;

pub use pinyin_text::{AnnotatedItem, DrawMode, Padding, Rect, TextContent};
pub use render_engine::{MeasureMode, MeasureSpec, MeasuredSize, PinyinTextView};
pub use render_ir::{
    render_annotated, render_plain, CommandRecorder, DrawCommand, DrawSurface, GlyphRunCommand,
    StrokeRectCommand,
};
pub use render_layout::{
    is_full_width, AnnotatedRunLayout, HeuristicMeasurer, ItemBox, LayoutMetrics, LayoutResult,
    PlainLine, PlainTextLayout, TextMeasurer,
};
