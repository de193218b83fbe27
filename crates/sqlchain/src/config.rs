//! Render configuration.

use serde::{Deserialize, Serialize};

/// How literal values reach the rendered SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Literals are written into the SQL text (`name = 'alice'`).
    ///
    /// Useful for debugging and logging. Only template expressions carry
    /// parameters in this mode.
    #[default]
    Inline,
    /// Every literal becomes one placeholder plus one entry in the parameter list.
    Parameterized,
}

/// Placeholder token written for each bound parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` (MySQL, SQLite, most drivers)
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL)
    Numbered,
}

/// Configuration applied when a top-level statement is built.
///
/// Sub-statements always render with the mode of the statement that embeds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Inline or parameterized rendering.
    pub mode: RenderMode,
    /// Placeholder token style for parameterized output.
    pub placeholder: PlaceholderStyle,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_logged_sql: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Inline,
            placeholder: PlaceholderStyle::Question,
            max_logged_sql: Some(200),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults (inline, `?` placeholders).
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for parameterized rendering with `?` placeholders.
    pub fn parameterized() -> Self {
        Self::default().with_mode(RenderMode::Parameterized)
    }

    /// Set the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the placeholder style.
    pub fn with_placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set the maximum logged SQL length.
    pub fn with_max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }
}
