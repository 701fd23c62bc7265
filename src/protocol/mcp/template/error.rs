// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for resource template compilation.

/// Errors that can occur while compiling a resource template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A `{` is never closed.
    #[error("Unclosed {{ at byte {position} in template: {template}")]
    Unclosed {
        /// The template being compiled.
        template: String,
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A placeholder has no name (`{}`).
    #[error("Empty parameter name at byte {position} in template: {template}")]
    EmptyParameter {
        /// The template being compiled.
        template: String,
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A placeholder name contains a brace.
    #[error("Invalid parameter name `{name}` in template: {template}")]
    InvalidParameterName {
        /// The template being compiled.
        template: String,
        /// The offending name.
        name: String,
    },

    /// The same parameter name appears twice.
    #[error("Duplicate parameter `{name}` in template: {template}")]
    DuplicateParameter {
        /// The template being compiled.
        template: String,
        /// The repeated name.
        name: String,
    },

    /// The matching pattern could not be built.
    #[error("Failed to build matcher for template {template}: {reason}")]
    Pattern {
        /// The template being compiled.
        template: String,
        /// Why the pattern was rejected.
        reason: String,
    },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TemplateError::Unclosed {
            template: "res://{id".to_string(),
            position: 6,
        };
        assert_eq!(err.to_string(), "Unclosed { at byte 6 in template: res://{id");

        let err = TemplateError::EmptyParameter {
            template: "res://{}".to_string(),
            position: 6,
        };
        assert_eq!(err.to_string(), "Empty parameter name at byte 6 in template: res://{}");
    }
}
