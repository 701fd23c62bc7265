// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Template parsing into literal and parameter segments.

use std::collections::HashSet;

use super::error::{Result, TemplateError};

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must appear verbatim.
    Literal(String),

    /// A named placeholder matching one or more characters other than `/`.
    Parameter(String),
}

/// Parses `template` left to right into an ordered segment list.
///
/// Adjacent literal text is merged into a single segment; a template with no
/// placeholders yields exactly one literal (or nothing, for the empty string).
pub fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    let mut rest = template;
    let mut offset = 0;

    while let Some(open) = rest.find('{') {
        let position = offset + open;
        let after_open = &rest[open + 1..];
        let close = after_open.find('}').ok_or_else(|| TemplateError::Unclosed {
            template: template.to_string(),
            position,
        })?;

        if open > 0 {
            push_literal(&mut segments, &rest[..open]);
        }

        let name = &after_open[..close];
        if name.is_empty() {
            return Err(TemplateError::EmptyParameter {
                template: template.to_string(),
                position,
            });
        }
        if name.contains('{') {
            return Err(TemplateError::InvalidParameterName {
                template: template.to_string(),
                name: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(TemplateError::DuplicateParameter {
                template: template.to_string(),
                name: name.to_string(),
            });
        }
        segments.push(Segment::Parameter(name.to_string()));

        let consumed = open + 1 + close + 1;
        rest = &rest[consumed..];
        offset += consumed;
    }

    if !rest.is_empty() {
        push_literal(&mut segments, rest);
    }

    Ok(segments)
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.to_string())
    }

    fn param(s: &str) -> Segment {
        Segment::Parameter(s.to_string())
    }

    #[test]
    fn test_parse_mixed() {
        let segments = parse_template("res://{id}/schema").unwrap();
        assert_eq!(segments, vec![lit("res://"), param("id"), lit("/schema")]);
    }

    #[test]
    fn test_parse_literal_only() {
        assert_eq!(parse_template("config://app").unwrap(), vec![lit("config://app")]);
        assert!(parse_template("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_adjacent_parameters() {
        let segments = parse_template("x://{a}{b}").unwrap();
        assert_eq!(segments, vec![lit("x://"), param("a"), param("b")]);
    }

    #[test]
    fn test_stray_closing_brace_is_literal() {
        let segments = parse_template("x://a}b/{c}").unwrap();
        assert_eq!(segments, vec![lit("x://a}b/"), param("c")]);
    }

    #[test]
    fn test_unclosed_brace_reports_position() {
        let err = parse_template("db://{table}/{col").unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unclosed {
                template: "db://{table}/{col".to_string(),
                position: 13,
            }
        );
    }

    #[test]
    fn test_empty_and_nested_names_rejected() {
        assert!(matches!(
            parse_template("x://{}").unwrap_err(),
            TemplateError::EmptyParameter { position: 4, .. }
        ));
        assert!(matches!(
            parse_template("x://{a{b}").unwrap_err(),
            TemplateError::InvalidParameterName { .. }
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        assert!(matches!(
            parse_template("x://{id}/{id}").unwrap_err(),
            TemplateError::DuplicateParameter { ref name, .. } if name == "id"
        ));
    }
}
