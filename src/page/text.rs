//! Lazily evaluated text settings (titles, entity labels)

use std::fmt;
use std::sync::Arc;

use crate::translation::{TranslatableMessage, Text};
use crate::types::{Entity, Page};

/// Title callback: receives the entity instance when one is available
pub type TitleFn = dyn Fn(Option<&dyn Entity>) -> Option<Text> + Send + Sync;

/// Entity label callback: receives the entity instance and the page being rendered
pub type LabelFn = dyn Fn(Option<&dyn Entity>, Option<Page>) -> Option<Text> + Send + Sync;

/// Literal text, a translatable handle, or a callback producing either
pub enum TextSource<F: ?Sized> {
    Literal(String),
    Translatable(TranslatableMessage),
    Computed(Arc<F>),
}

pub type TitleSource = TextSource<TitleFn>;
pub type LabelSource = TextSource<LabelFn>;

impl<F: ?Sized> TextSource<F> {
    /// Static value, if this source is not a callback
    fn static_text(&self) -> Option<Text> {
        match self {
            TextSource::Literal(s) => Some(Text::Plain(s.clone())),
            TextSource::Translatable(m) => Some(Text::Translatable(m.clone())),
            TextSource::Computed(_) => None,
        }
    }
}

impl TitleSource {
    pub fn computed(f: impl Fn(Option<&dyn Entity>) -> Option<Text> + Send + Sync + 'static) -> Self {
        TextSource::Computed(Arc::new(f))
    }

    /// Callbacks get the entity when one was supplied, nothing otherwise
    pub fn evaluate(&self, entity: Option<&dyn Entity>) -> Option<Text> {
        match self {
            TextSource::Computed(f) => f(entity),
            other => other.static_text(),
        }
    }
}

impl LabelSource {
    pub fn computed(f: impl Fn(Option<&dyn Entity>, Option<Page>) -> Option<Text> + Send + Sync + 'static) -> Self {
        TextSource::Computed(Arc::new(f))
    }

    pub fn evaluate(&self, entity: Option<&dyn Entity>, page: Option<Page>) -> Option<Text> {
        match self {
            TextSource::Computed(f) => f(entity, page),
            other => other.static_text(),
        }
    }
}

impl<F: ?Sized> Clone for TextSource<F> {
    fn clone(&self) -> Self {
        match self {
            TextSource::Literal(s) => TextSource::Literal(s.clone()),
            TextSource::Translatable(m) => TextSource::Translatable(m.clone()),
            TextSource::Computed(f) => TextSource::Computed(Arc::clone(f)),
        }
    }
}

impl<F: ?Sized> fmt::Debug for TextSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSource::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            TextSource::Translatable(m) => f.debug_tuple("Translatable").field(m).finish(),
            TextSource::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl<F: ?Sized> From<&str> for TextSource<F> {
    fn from(value: &str) -> Self {
        TextSource::Literal(value.to_string())
    }
}

impl<F: ?Sized> From<String> for TextSource<F> {
    fn from(value: String) -> Self {
        TextSource::Literal(value)
    }
}

impl<F: ?Sized> From<TranslatableMessage> for TextSource<F> {
    fn from(value: TranslatableMessage) -> Self {
        TextSource::Translatable(value)
    }
}

impl<F: ?Sized> From<Text> for TextSource<F> {
    fn from(value: Text) -> Self {
        match value {
            Text::Plain(s) => TextSource::Literal(s),
            Text::Translatable(m) => TextSource::Translatable(m),
        }
    }
}
