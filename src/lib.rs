// Library exports for binance-mcp

pub mod activity; // Activity log (file and ring-buffer backends)
pub mod error;
pub mod symbols; // Crypto name → trading symbol resolution

// Binance API integration modules
pub mod binance; // Binance API client
pub mod config; // Configuration management

pub mod mcp; // MCP surface registry and dispatcher
pub mod transport; // MCP transport layer (stdio, HTTP)
