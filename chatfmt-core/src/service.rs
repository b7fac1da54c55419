use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{ChatfmtError, Result};
use crate::model::{ConversionReport, OutputTarget, RenderOptions};
use crate::render::format_dialogue;

const STDOUT_MARKER: &str = "-";
const OUTPUT_SUFFIX: &str = "_formatted";

/// Reads a conversation file and returns its non-empty `messages` array.
pub fn load_messages(path: &Path) -> Result<Vec<Value>> {
    let raw = read_input(path)?;
    parse_messages(path, &raw)
}

/// Parses a conversation document; `path` is only used for error reporting.
pub fn parse_messages(path: &Path, raw: &str) -> Result<Vec<Value>> {
    let value = serde_json::from_str::<Value>(raw).map_err(|source| ChatfmtError::InvalidJson {
        path: path.to_path_buf(),
        line: source.line(),
        column: source.column(),
        source,
    })?;

    match value.get("messages") {
        Some(Value::Array(messages)) if !messages.is_empty() => Ok(messages.clone()),
        _ => Err(ChatfmtError::MissingMessages {
            path: path.to_path_buf(),
        }),
    }
}

/// `conversation.json` becomes `conversation_formatted.<ext>` next to the input.
pub fn default_output_path(input: &Path, options: &RenderOptions) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!(
        "{stem}{OUTPUT_SUFFIX}.{}",
        options.format.extension()
    ))
}

pub fn resolve_output_target(
    input: &Path,
    explicit: Option<&Path>,
    options: &RenderOptions,
) -> OutputTarget {
    match explicit {
        Some(path) if path.as_os_str() == STDOUT_MARKER => OutputTarget::Stdout,
        Some(path) => OutputTarget::File(path.to_path_buf()),
        None => OutputTarget::File(default_output_path(input, options)),
    }
}

/// Converts `input` and writes the document once rendering has fully succeeded.
pub fn convert_file(
    input: &Path,
    explicit_output: Option<&Path>,
    options: &RenderOptions,
) -> Result<ConversionReport> {
    let messages = load_messages(input)?;
    let dialogue = format_dialogue(&messages, options);
    let output = resolve_output_target(input, explicit_output, options);

    write_output(&output, &dialogue.document)?;

    info!(
        input = %input.display(),
        output = %output,
        rendered = dialogue.rendered,
        skipped_empty = dialogue.skipped_empty,
        skipped_versions = dialogue.skipped_versions,
        "conversation formatted"
    );

    Ok(ConversionReport {
        input: input.to_path_buf(),
        output,
        message_count: messages.len(),
        dialogue,
    })
}

fn read_input(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ChatfmtError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ChatfmtError::InputNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::InvalidData => ChatfmtError::NonUtf8Input {
            path: path.to_path_buf(),
        },
        _ => ChatfmtError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn write_output(target: &OutputTarget, document: &str) -> Result<()> {
    match target {
        OutputTarget::File(path) => fs::write(path, document).map_err(|source| ChatfmtError::Io {
            path: path.clone(),
            source,
        }),
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| ChatfmtError::Io {
                    path: PathBuf::from(STDOUT_MARKER),
                    source,
                })
        }
    }
}
