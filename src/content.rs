use serde::{Deserialize, Serialize};

/// One display unit: a base text (usually a single Chinese character) and
/// the phonetic reading drawn above it.
///
/// Either side may be empty. Punctuation is commonly paired with a blank
/// reading so it still occupies a column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotatedItem {
    /// Primary text drawn on the base row.
    pub base: String,
    /// Phonetic annotation drawn on the row above.
    pub annotation: String,
}

impl AnnotatedItem {
    pub fn new(base: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            annotation: annotation.into(),
        }
    }

    /// Build an item from optional fields, treating a missing side as empty.
    pub fn from_options(base: Option<&str>, annotation: Option<&str>) -> Self {
        Self::new(base.unwrap_or_default(), annotation.unwrap_or_default())
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.annotation.is_empty()
    }
}

impl<B, A> From<(B, A)> for AnnotatedItem
where
    B: Into<String>,
    A: Into<String>,
{
    fn from((base, annotation): (B, A)) -> Self {
        Self::new(base, annotation)
    }
}

/// Which draw path the widget takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    /// A single paragraph flow at the base size and color.
    PlainText,
    /// Annotation row stacked above each base item.
    PinyinAndText,
}

/// Content owned by the widget. Replaced wholesale on every set call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextContent {
    /// Plain paragraph text without annotations.
    Plain(String),
    /// Ordered (base, annotation) pairs.
    Annotated(Vec<AnnotatedItem>),
}

impl Default for TextContent {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl TextContent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn annotated<I, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<AnnotatedItem>,
    {
        Self::Annotated(pairs.into_iter().map(Into::into).collect())
    }

    pub fn mode(&self) -> DrawMode {
        match self {
            Self::Plain(_) => DrawMode::PlainText,
            Self::Annotated(_) => DrawMode::PinyinAndText,
        }
    }

    /// True when there is nothing to lay out in the current mode.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.is_empty(),
            Self::Annotated(items) => items.is_empty(),
        }
    }

    /// Annotated items, or an empty slice in plain mode.
    pub fn items(&self) -> &[AnnotatedItem] {
        match self {
            Self::Annotated(items) => items,
            Self::Plain(_) => &[],
        }
    }

    /// Plain text, if this is plain content.
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            Self::Plain(text) => Some(text),
            Self::Annotated(_) => None,
        }
    }

    /// Drop all text while keeping the current mode.
    pub fn clear(&mut self) {
        match self {
            Self::Plain(text) => text.clear(),
            Self::Annotated(items) => items.clear(),
        }
    }
}
