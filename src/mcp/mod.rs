//! MCP (Model Context Protocol) tool server.
//!
//! Exposes the clinic store to external agents over JSON-RPC 2.0 on
//! stdio: `initialize`, `tools/list` and `tools/call`. The typed tools
//! share validators and repositories with the REST API; `execute_query`
//! is a raw passthrough.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
