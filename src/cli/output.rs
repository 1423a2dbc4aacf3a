//! Output format and color selection.

use std::io::IsTerminal;

/// How results and errors are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text for terminals.
    #[default]
    Human,
    /// Single-line JSON.
    Json,
    /// Indented JSON.
    JsonPretty,
}

impl OutputFormat {
    /// True for both JSON variants.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty)
    }

    /// Serializes `value` in this format, or `None` for [`OutputFormat::Human`].
    ///
    /// # Errors
    ///
    /// Returns the serializer error when `value` cannot be represented.
    pub fn render_json<T: serde::Serialize>(
        self,
        value: &T,
    ) -> Result<Option<String>, serde_json::Error> {
        match self {
            Self::Human => Ok(None),
            Self::Json => serde_json::to_string(value).map(Some),
            Self::JsonPretty => serde_json::to_string_pretty(value).map(Some),
        }
    }
}

/// Whether human output is colored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorChoice {
    /// Resolves `Auto` against the environment.
    #[must_use]
    pub fn should_colorize(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
            }
        }
    }
}
