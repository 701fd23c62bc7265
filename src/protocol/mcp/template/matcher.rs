// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Compiled resource templates.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde_json::Value;

use super::error::{Result, TemplateError};
use super::parser::{parse_template, Segment};

/// Pattern used for every placeholder: one or more characters other than `/`.
const PARAMETER_PATTERN: &str = "([^/]+)";

/// A URI pattern such as `db://{table}/{id}`, compiled once at registration.
///
/// Matching is anchored at both ends. When the template starts with a literal
/// `scheme://`, URIs with a different scheme are rejected before the pattern
/// is consulted.
#[derive(Debug, Clone)]
pub struct ResourceTemplate {
    template: String,
    segments: Vec<Segment>,
    parameters: Vec<String>,
    scheme: Option<String>,
    pattern: Regex,
    capabilities: Value,
}

impl ResourceTemplate {
    /// Compiles `template`.
    pub fn compile(template: &str) -> Result<Self> {
        let segments = parse_template(template)?;

        let mut source = String::with_capacity(template.len() + 8);
        source.push('^');
        let mut parameters = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(text)),
                Segment::Parameter(name) => {
                    source.push_str(PARAMETER_PATTERN);
                    parameters.push(name.clone());
                }
            }
        }
        source.push('$');

        let pattern = Regex::new(&source).map_err(|e| TemplateError::Pattern {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match segments.first() {
            Some(Segment::Literal(text)) => text.find("://").map(|end| text[..end].to_string()),
            _ => None,
        };

        Ok(Self {
            template: template.to_string(),
            segments,
            parameters,
            scheme,
            pattern,
            capabilities: Value::Object(Default::default()),
        })
    }

    /// Attaches the capability descriptor advertised in resource listings.
    pub fn with_capabilities(mut self, capabilities: Value) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The template text as registered.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Capability descriptor for listings.
    pub fn capabilities(&self) -> &Value {
        &self.capabilities
    }

    /// The literal scheme, if the template starts with one.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Parameter names in template order.
    pub fn parameter_names(&self) -> &[String] {
        &self.parameters
    }

    /// True when the template has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Matches `uri` against the template, returning the captured parameters.
    pub fn match_uri(&self, uri: &str) -> Option<HashMap<String, String>> {
        if let Some(scheme) = &self.scheme {
            if uri_scheme(uri) != Some(scheme.as_str()) {
                return None;
            }
        }

        let captures = self.pattern.captures(uri)?;
        Some(
            self.parameters
                .iter()
                .zip(captures.iter().skip(1))
                .filter_map(|(name, capture)| Some((name.clone(), capture?.as_str().to_string())))
                .collect(),
        )
    }

    /// Substitutes `params` into the template. Returns `None` if a parameter
    /// is missing.
    pub fn expand(&self, params: &HashMap<String, String>) -> Option<String> {
        let mut uri = String::with_capacity(self.template.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => uri.push_str(text),
                Segment::Parameter(name) => uri.push_str(params.get(name)?),
            }
        }
        Some(uri)
    }
}

impl fmt::Display for ResourceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl FromStr for ResourceTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

/// Scheme of `uri`: the text before its first `://`.
pub fn uri_scheme(uri: &str) -> Option<&str> {
    uri.find("://").map(|end| &uri[..end])
}
