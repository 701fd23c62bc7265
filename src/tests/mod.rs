//! Test modules for the Makai MCP engine.
//!
//! Component tests live next to their code; this module holds the shared
//! fixtures and the suites that cut across modules (configuration loading,
//! error reporting, client/server sessions).


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{
    connected_session, create_test_dir, jsonrpc_method_strategy, uri_value_strategy, TestFixture,
};
