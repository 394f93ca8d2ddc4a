//! Semantic color names mapped to concrete colors.

use std::collections::HashMap;

use super::model::Color;

/// Maps semantic names (`accent`, `success`, `warning`, `error`, `muted`, ...) to colors.
///
/// The default theme covers the built-in names; custom names can be added with
/// [`Theme::with`]. Lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    colors: HashMap<String, Color>,
}

impl Theme {
    /// A theme with no names defined.
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    /// Define or replace a name (builder).
    pub fn with(mut self, name: impl Into<String>, color: Color) -> Self {
        self.colors.insert(name.into().to_ascii_lowercase(), color);
        self
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Color> {
        self.colors.get(&name.to_ascii_lowercase())
    }

    /// Number of defined names.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no names are defined.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::empty()
            .with("primary", Color::rgb(122, 162, 247))
            .with("accent", Color::rgb(187, 154, 247))
            .with("success", Color::rgb(158, 206, 106))
            .with("warning", Color::rgb(224, 175, 104))
            .with("error", Color::rgb(247, 118, 142))
            .with("info", Color::rgb(125, 207, 255))
            .with("muted", Color::rgb(86, 95, 137))
            .with("text", Color::rgb(192, 202, 245))
            .with("background", Color::rgb(26, 27, 38))
            .with("border", Color::rgb(65, 72, 104))
    }
}
