use serde::{Deserialize, Serialize};

use crate::error::PinyinTextError;

/// Smallest accepted base text size.
pub const MIN_TEXT_SIZE_PX: i32 = 2;
/// Smallest accepted annotation text size.
pub const MIN_PINYIN_TEXT_SIZE_PX: i32 = 1;
/// Annotation size relative to the base size when not set explicitly.
pub const PINYIN_TEXT_SIZE_RATIO: f32 = 0.8;

pub const DEFAULT_TEXT_SIZE_PX: i32 = 14;
pub const DEFAULT_LINE_SPACING_PX: i32 = 5;
pub const DEFAULT_ITEM_SPACING_PX: i32 = 5;
pub const DEFAULT_TEXT_COLOR: Argb = Argb(0xFF33_3333);
pub const DEFAULT_PINYIN_TEXT_COLOR: Argb = Argb(0xFF99_9999);

/// Packed `0xAARRGGBB` color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argb(pub u32);

impl Argb {
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Widget style surface.
///
/// Font sizes go through validating setters; a rejected value leaves the
/// previous configuration in place. The annotation size follows
/// [`PINYIN_TEXT_SIZE_RATIO`] of the base size until it is set explicitly,
/// after which base size changes no longer touch it. Deserialization
/// applies the same size checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StyleFields")]
pub struct PinyinTextStyle {
    text_size_px: i32,
    pinyin_text_size_px: i32,
    pinyin_text_size_overridden: bool,
    /// Base text color.
    pub text_color: Argb,
    /// Annotation text color.
    pub pinyin_text_color: Argb,
    /// Vertical spacing between wrapped lines; half of it separates the
    /// annotation row from its base row.
    pub line_spacing_px: i32,
    /// Horizontal spacing between adjacent items on a line.
    pub item_spacing_px: i32,
    /// Stroke the computed boxes while drawing.
    pub debug_draw: bool,
}

impl Default for PinyinTextStyle {
    fn default() -> Self {
        Self {
            text_size_px: DEFAULT_TEXT_SIZE_PX,
            pinyin_text_size_px: derived_pinyin_size(DEFAULT_TEXT_SIZE_PX),
            pinyin_text_size_overridden: false,
            text_color: DEFAULT_TEXT_COLOR,
            pinyin_text_color: DEFAULT_PINYIN_TEXT_COLOR,
            line_spacing_px: DEFAULT_LINE_SPACING_PX,
            item_spacing_px: DEFAULT_ITEM_SPACING_PX,
            debug_draw: false,
        }
    }
}

impl PinyinTextStyle {
    pub fn text_size_px(&self) -> i32 {
        self.text_size_px
    }

    pub fn pinyin_text_size_px(&self) -> i32 {
        self.pinyin_text_size_px
    }

    /// Whether the annotation size was set explicitly.
    pub fn pinyin_text_size_overridden(&self) -> bool {
        self.pinyin_text_size_overridden
    }

    /// Check both font sizes against their minimums.
    pub fn validate(&self) -> Result<(), PinyinTextError> {
        PinyinTextError::check_min("text_size", self.text_size_px, MIN_TEXT_SIZE_PX)?;
        PinyinTextError::check_min(
            "pinyin_text_size",
            self.pinyin_text_size_px,
            MIN_PINYIN_TEXT_SIZE_PX,
        )
    }

    /// Set the base text size.
    pub fn set_text_size(&mut self, px: i32) -> Result<(), PinyinTextError> {
        PinyinTextError::check_min("text_size", px, MIN_TEXT_SIZE_PX)?;
        self.text_size_px = px;
        if !self.pinyin_text_size_overridden {
            self.pinyin_text_size_px = derived_pinyin_size(px);
        }
        Ok(())
    }

    /// Set the annotation text size and pin it against later base size changes.
    pub fn set_pinyin_text_size(&mut self, px: i32) -> Result<(), PinyinTextError> {
        PinyinTextError::check_min("pinyin_text_size", px, MIN_PINYIN_TEXT_SIZE_PX)?;
        self.pinyin_text_size_px = px;
        self.pinyin_text_size_overridden = true;
        Ok(())
    }

    pub fn with_text_size(mut self, px: i32) -> Result<Self, PinyinTextError> {
        self.set_text_size(px)?;
        Ok(self)
    }

    pub fn with_pinyin_text_size(mut self, px: i32) -> Result<Self, PinyinTextError> {
        self.set_pinyin_text_size(px)?;
        Ok(self)
    }

    pub fn with_colors(mut self, text: Argb, pinyin: Argb) -> Self {
        self.text_color = text;
        self.pinyin_text_color = pinyin;
        self
    }

    pub fn with_spacing(mut self, line_spacing_px: i32, item_spacing_px: i32) -> Self {
        self.line_spacing_px = line_spacing_px;
        self.item_spacing_px = item_spacing_px;
        self
    }

    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug_draw = enabled;
        self
    }

    /// Gap between an annotation row and the base row under it.
    pub fn row_gap_px(&self) -> i32 {
        self.line_spacing_px.max(0) / 2
    }

    /// Extra gap between one line's base row and the next line's annotation row.
    pub fn line_gap_px(&self) -> i32 {
        self.line_spacing_px.max(0)
    }

    /// Gap between adjacent items on one line.
    pub fn item_gap_px(&self) -> i32 {
        self.item_spacing_px.max(0)
    }
}

/// Serialized shape of [`PinyinTextStyle`], checked before it becomes one.
#[derive(Deserialize)]
struct StyleFields {
    text_size_px: i32,
    pinyin_text_size_px: i32,
    pinyin_text_size_overridden: bool,
    text_color: Argb,
    pinyin_text_color: Argb,
    line_spacing_px: i32,
    item_spacing_px: i32,
    debug_draw: bool,
}

impl TryFrom<StyleFields> for PinyinTextStyle {
    type Error = PinyinTextError;

    fn try_from(fields: StyleFields) -> Result<Self, Self::Error> {
        let style = Self {
            text_size_px: fields.text_size_px,
            pinyin_text_size_px: fields.pinyin_text_size_px,
            pinyin_text_size_overridden: fields.pinyin_text_size_overridden,
            text_color: fields.text_color,
            pinyin_text_color: fields.pinyin_text_color,
            line_spacing_px: fields.line_spacing_px,
            item_spacing_px: fields.item_spacing_px,
            debug_draw: fields.debug_draw,
        };
        style.validate()?;
        Ok(style)
    }
}

fn derived_pinyin_size(text_size_px: i32) -> i32 {
    ((text_size_px as f32 * PINYIN_TEXT_SIZE_RATIO) as i32).max(MIN_PINYIN_TEXT_SIZE_PX)
}
