//! Model Context Protocol (MCP) surface for the Binance provider
//!
//! This module provides:
//! - Tools: price, 24h change, rolling-window statistics, recent activity
//! - Resources: symbol map, activity log, per-symbol price (URI template)
//! - Prompts: executive and multi-asset summaries
//!
//! All three are registered once in a [`SurfaceRegistry`] and served over
//! JSON-RPC by [`McpHandler`], independent of the transport.

pub mod handler;
pub mod prompts;
pub mod registry;
pub mod resources;
pub mod server;
pub mod tools;
pub mod types;
pub mod uri;

// Re-exports
pub use handler::McpHandler;
pub use registry::SurfaceRegistry;
pub use server::BinanceServer;
