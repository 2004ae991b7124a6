//! YAML error diagnostics pointing at the offending line of an order file

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid YAML in {filename}: {message}")]
#[diagnostic(code(wft::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,

    /// The underlying serde_yml message
    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            filename: filename.to_string(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("IO error: {0}")]
    #[diagnostic(code(wft::yaml::io))]
    Io(#[from] std::io::Error),
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (idx, text) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == line {
            let col_bytes = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(b, _)| b)
                .unwrap_or(text.len().saturating_sub(1));
            return line_start + col_bytes;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

fn generate_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs.".to_string());
    }
    if msg.contains("duplicate key") {
        return Some("Each key can only appear once per record.".to_string());
    }
    if msg.contains("tool_ids") {
        return Some(
            "tool_ids is a list of tool ids, e.g. [TOOL-01..., TOOL-02...]; leave it empty for order-wide items."
                .to_string(),
        );
    }
    if msg.contains("invalid type: integer") && msg.contains("expected a string") {
        return Some(
            "Part numbers and SO numbers are strings; quote them (\"613278\") to keep leading zeros."
                .to_string(),
        );
    }
    if msg.contains("missing field") {
        return Some("Every record needs its id and parent reference fields.".to_string());
    }
    if msg.contains("mapping values are not allowed") {
        return Some("Check for a missing space after ':' or inconsistent indentation.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "so_number: \"3930\"\ncustomer_name: Acme\nquantity: 2";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 18);
        assert_eq!(line_col_to_offset(source, 2, 3), 20);
        assert_eq!(line_col_to_offset(source, 9, 1), source.len() - 1);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("found character that cannot start any token (tab)").is_some());
        assert!(generate_help("missing field `part_number`").is_some());
        assert!(generate_help("invalid type: integer `613278`, expected a string").is_some());
        assert!(generate_help("something unrelated").is_none());
    }
}
