//! Parse LLM output into a narrative

use crate::types::Narrative;
use tracing::warn;

/// Title used when the response yields none
pub const DEFAULT_TITLE: &str = "Analysis Result";

/// Description used when the response yields none
pub const DEFAULT_DESCRIPTION: &str = "Description generated.";

/// Parse a Markdown response of the form `# Title` / `# Description`
///
/// The title is the line right after the `# Title` heading; the description is
/// everything after the `# Description` heading. If either comes out empty the
/// whole response is used instead: first line as title, the rest as
/// description. Remaining empties take the defaults. Never fails.
pub fn parse_narrative(response: &str) -> Narrative {
    let text = strip_code_fence(response);

    let title = section_first_line(text, "Title").unwrap_or_default();
    let description = section_rest(text, "Description").unwrap_or_default();

    let (title, description) = if title.is_empty() || description.is_empty() {
        warn!("Response did not follow the heading format, using raw text");
        let mut lines = text.trim().lines();
        let first = lines.next().unwrap_or_default().trim().to_string();
        let rest = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        (first, rest)
    } else {
        (title, description)
    };

    Narrative {
        title: or_default(title, DEFAULT_TITLE),
        description: or_default(description, DEFAULT_DESCRIPTION),
    }
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Models sometimes wrap the whole answer in a ```markdown block
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string line and the closing fence
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body)
}

fn is_heading(line: &str, name: &str) -> bool {
    line.trim()
        .strip_prefix('#')
        .map(|rest| rest.trim_start_matches('#').trim().eq_ignore_ascii_case(name))
        .unwrap_or(false)
}

/// Byte offset just past the heading line named `name`
fn after_heading(text: &str, name: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if is_heading(line, name) {
            return Some(offset);
        }
    }
    None
}

fn section_first_line(text: &str, name: &str) -> Option<String> {
    let start = after_heading(text, name)?;
    let line = text[start..].lines().next()?;
    Some(line.trim().to_string())
}

fn section_rest(text: &str, name: &str) -> Option<String> {
    let start = after_heading(text, name)?;
    Some(text[start..].trim().to_string())
}
