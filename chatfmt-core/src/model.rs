use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ChatfmtError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Html,
}

impl OutputFormat {
    /// File extension used when deriving the default output path.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }

    /// Whether rendered timestamps carry an explicit `UTC` designator.
    pub fn shows_timezone(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ChatfmtError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(ChatfmtError::InvalidFormat(input.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Drop `{...}` spans that look like leaked JSON payloads.
    pub strip_json_artifacts: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            strip_json_artifacts: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub include_timestamps: bool,
    pub clean: CleanOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueEntry {
    pub role: String,
    pub timestamp: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedDialogue {
    pub document: String,
    pub rendered: usize,
    pub skipped_empty: usize,
    pub skipped_versions: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdout => write!(f, "<stdout>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: OutputTarget,
    pub message_count: usize,
    pub dialogue: FormattedDialogue,
}
