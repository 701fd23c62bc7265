// Copyright (c) 2025 Makai MCP Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Resource URI templates.
//!
//! A template is literal text with `{name}` placeholders. Each placeholder
//! matches one or more characters other than `/`, and the whole URI must match.
//!
//! ```
//! use makai_mcp_lib::protocol::mcp::template::ResourceTemplate;
//!
//! let template = ResourceTemplate::compile("db://{table}/{id}").unwrap();
//! let params = template.match_uri("db://users/42").unwrap();
//! assert_eq!(params["table"], "users");
//! assert_eq!(params["id"], "42");
//! assert!(template.match_uri("db://users/42/extra").is_none());
//! ```

pub mod error;
pub mod matcher;
pub mod parser;

pub use error::TemplateError;
pub use matcher::{uri_scheme, ResourceTemplate};
pub use parser::{parse_template, Segment};

#[cfg(test)]
mod tests;
