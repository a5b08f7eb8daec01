//! Content model and style configuration for pinyin-annotated Chinese text.
//!
//! This crate holds the backend-agnostic pieces shared by the layout engine
//! (`pinyin-text-render`) and the drawing backends: the ordered
//! (character, reading) pairs, the style surface with its validation rules,
//! and the integer geometry the layout produces.
//!
//! ```
//! use pinyin_text::{AnnotatedItem, PinyinTextStyle, TextContent};
//!
//! let content = TextContent::annotated([("你", "nǐ"), ("好", "hǎo")]);
//! assert_eq!(content.items().len(), 2);
//!
//! let mut style = PinyinTextStyle::default();
//! style.set_text_size(20).unwrap();
//! assert_eq!(style.pinyin_text_size_px(), 16);
//! assert!(style.set_text_size(1).is_err());
//! assert_eq!(style.text_size_px(), 20);
//! # let _ = AnnotatedItem::new("你", "nǐ");
//! ```

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

mod content;
mod error;
mod geometry;
mod style;

pub use content::{AnnotatedItem, DrawMode, TextContent};
pub use error::PinyinTextError;
pub use geometry::{Padding, Rect};
pub use style::{
    Argb, PinyinTextStyle, DEFAULT_ITEM_SPACING_PX, DEFAULT_LINE_SPACING_PX,
    DEFAULT_PINYIN_TEXT_COLOR, DEFAULT_TEXT_COLOR, DEFAULT_TEXT_SIZE_PX, MIN_PINYIN_TEXT_SIZE_PX,
    MIN_TEXT_SIZE_PX, PINYIN_TEXT_SIZE_RATIO,
};
