use serde_json::{Map, Value};

const CONTENT_BLOCK: &str = "contentBlock";

/// Flattens any JSON value into the text it carries.
///
/// Objects are resolved through the first present key of `text`, `content`,
/// `steps`, `messages`, `data`; arrays join their elements with a trailing
/// newline after each one. Scalars other than strings resolve to nothing.
pub fn extract_content(value: &Value) -> String {
    match value {
        Value::Object(map) => extract_object(map),
        Value::Array(items) => {
            let mut output = String::new();
            for item in items {
                output.push_str(&extract_content(item));
                output.push('\n');
            }
            output
        }
        Value::String(text) => text.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) => String::new(),
    }
}

fn extract_object(map: &Map<String, Value>) -> String {
    if let Some(text) = map.get("text") {
        return extract_content(text);
    }
    if let Some(content) = map.get("content") {
        return extract_content(content);
    }
    if let Some(steps) = map.get("steps") {
        return extract_steps(steps);
    }
    if let Some(messages) = map.get("messages") {
        return extract_content(messages);
    }
    if let Some(data) = map.get("data") {
        return extract_content(data);
    }

    String::new()
}

fn extract_steps(steps: &Value) -> String {
    let mut output = String::new();
    for step in steps.as_array().into_iter().flatten() {
        if step.get("type").and_then(Value::as_str) != Some(CONTENT_BLOCK) {
            continue;
        }

        if let Some(content) = step.get("content") {
            output.push_str(&extract_content(content));
        }
    }
    output
}
