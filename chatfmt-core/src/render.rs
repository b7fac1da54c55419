use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clean::clean_content;
use crate::extract::extract_content;
use crate::model::{DialogueEntry, FormattedDialogue, OutputFormat, RenderOptions};

const UNKNOWN_ROLE: &str = "Unknown";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

enum Resolution<'a> {
    Resolved { role: String, source: &'a Value },
    InvalidVersion { index: String, available: usize },
}

/// Renders every message of a conversation into one document.
///
/// Messages keep their input order. A message is left out when its cleaned
/// content is empty or when its `currentlySelected` index does not point at
/// one of its `versions`; the latter is recorded as a warning.
pub fn format_dialogue(messages: &[Value], options: &RenderOptions) -> FormattedDialogue {
    let mut dialogue = FormattedDialogue::default();

    for (idx, message) in messages.iter().enumerate() {
        let (role, source) = match resolve_message(message) {
            Resolution::Resolved { role, source } => (role, source),
            Resolution::InvalidVersion { index, available } => {
                let warning = format!(
                    "message {}: 'currentlySelected' index {index} out of range for {available} version(s); skipped",
                    idx + 1
                );
                warn!("{warning}");
                dialogue.warnings.push(warning);
                dialogue.skipped_versions += 1;
                continue;
            }
        };

        let content = clean_content(&extract_content(source), options.clean);
        if content.is_empty() {
            debug!(index = idx + 1, "skipping message with empty content");
            dialogue.skipped_empty += 1;
            continue;
        }

        let timestamp = if options.include_timestamps {
            message.get("timestamp").and_then(|raw| {
                let rendered = render_timestamp(raw, options.format);
                if rendered.is_none() {
                    let warning = format!("message {}: unusable timestamp {raw}; omitted", idx + 1);
                    warn!("{warning}");
                    dialogue.warnings.push(warning);
                }
                rendered
            })
        } else {
            None
        };

        let entry = DialogueEntry {
            role,
            timestamp,
            content,
        };
        debug!(index = idx + 1, role = %entry.role, "rendering message");
        dialogue
            .document
            .push_str(&render_entry(&entry, options.format));
        dialogue.rendered += 1;
    }

    dialogue
}

/// Renders a single resolved entry with the template of `format`.
pub fn render_entry(entry: &DialogueEntry, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => match &entry.timestamp {
            Some(timestamp) => format!("{} [{timestamp}]:\n{}\n\n", entry.role, entry.content),
            None => format!("{}:\n{}\n\n", entry.role, entry.content),
        },
        OutputFormat::Markdown => match &entry.timestamp {
            Some(timestamp) => format!("### {} ({timestamp})\n\n{}\n\n", entry.role, entry.content),
            None => format!("### {}\n\n{}\n\n", entry.role, entry.content),
        },
        OutputFormat::Html => {
            let role = html_escape::encode_text(&entry.role);
            let class = entry.role.to_lowercase();
            let class = html_escape::encode_double_quoted_attribute(&class);
            let content = html_escape::encode_text(&entry.content).replace('\n', "<br>");
            let heading = match &entry.timestamp {
                Some(timestamp) => format!("{role} {timestamp}"),
                None => role.into_owned(),
            };
            format!("<div class=\"{class}\">\n<h3>{heading}</h3>\n<p>{content}</p>\n</div>\n")
        }
    }
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize_role(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Formats Unix seconds as a UTC timestamp; `None` for non-numeric or out-of-range values.
#[allow(clippy::cast_possible_truncation)]
pub fn render_timestamp(raw: &Value, format: OutputFormat) -> Option<String> {
    let seconds = match raw.as_i64() {
        Some(seconds) => seconds,
        None => {
            let seconds = raw.as_f64()?.floor();
            if !seconds.is_finite() || seconds.abs() > 1e15 {
                return None;
            }
            seconds as i64
        }
    };

    let datetime: DateTime<Utc> = DateTime::from_timestamp(seconds, 0)?;
    let rendered = datetime.format(TIMESTAMP_FORMAT).to_string();
    if format.shows_timezone() {
        Some(format!("{rendered} UTC"))
    } else {
        Some(rendered)
    }
}

fn resolve_message(message: &Value) -> Resolution<'_> {
    let Some(versions) = message.get("versions") else {
        return Resolution::Resolved {
            role: role_of(message),
            source: message,
        };
    };

    let available = versions.as_array().map_or(0, Vec::len);
    let selected = message.get("currentlySelected");
    let version = match selected {
        None => versions.get(0),
        Some(index) => index
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| versions.get(index)),
    };

    match version {
        Some(version) => Resolution::Resolved {
            role: role_of(version),
            source: version,
        },
        None => Resolution::InvalidVersion {
            index: selected.map_or_else(|| "0".to_string(), ToString::to_string),
            available,
        },
    }
}

fn role_of(value: &Value) -> String {
    let role = value
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_ROLE);
    capitalize_role(role)
}
