use anyhow::{anyhow, Context};
use binance_mcp::config::Config;
use binance_mcp::mcp::{BinanceServer, McpHandler, SurfaceRegistry};
use binance_mcp::transport::TransportMode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first to determine mode
    let args: Vec<String> = std::env::args().collect();
    let (mode, port) = parse_args(&args);

    // stdout is reserved for the MCP protocol in stdio mode
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Binance MCP server in {} mode...", mode);

    let config = Config::from_env().map_err(|e| anyhow!(e))?;
    let server = BinanceServer::from_config(&config, mode)
        .context("Failed to initialize Binance server")?;
    let handler = McpHandler::new(Arc::new(SurfaceRegistry::new(server, mode)));

    match mode {
        TransportMode::Stdio => binance_mcp::transport::stdio::run_stdio_server(handler)
            .await
            .map_err(|e| anyhow!("stdio transport failed: {}", e))?,
        TransportMode::Http => run_http_server(handler, port).await?,
    }

    Ok(())
}

/// Parse command-line arguments
fn parse_args(args: &[String]) -> (TransportMode, Option<u16>) {
    let mut mode = TransportMode::default();
    let mut port = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                if i + 1 < args.len() {
                    mode = args[i + 1].parse().unwrap_or_else(|e: String| {
                        eprintln!("{}", e);
                        print_usage();
                        std::process::exit(1);
                    });
                    i += 1;
                }
            }
            "--http" => mode = TransportMode::Http,
            "--stdio" => mode = TransportMode::Stdio,
            "--port" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().ok().filter(|p| *p != 0);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    (mode, port)
}

/// Print usage information
///
/// Goes to stderr so it never mixes with protocol output.
fn print_usage() {
    eprintln!("Binance MCP - read-only Binance market data over the Model Context Protocol");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    binance-mcp [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    --mode <MODE>       Transport mode: stdio or http (default: stdio)");
    eprintln!("    --stdio             Run in stdio mode (shortcut for --mode stdio)");
    eprintln!("    --http              Run in HTTP mode (shortcut for --mode http)");
    eprintln!("    --port <PORT>       HTTP port (overrides HTTP_PORT, default: 8897)");
    eprintln!("    --help, -h          Print this help message");
    eprintln!();
    eprintln!("ENVIRONMENT VARIABLES:");
    eprintln!("    BINANCE_BASE_URL          Binance API base URL (default: https://api.binance.us)");
    eprintln!("    BINANCE_MCP_DATA_DIR      Directory for symbol_map.csv and activity.log (default: ./data)");
    eprintln!("    BINANCE_MCP_LOG_BACKEND   Activity log backend: file or memory");
    eprintln!("    HTTP_HOST                 HTTP bind address (default: 127.0.0.1)");
    eprintln!("    HTTP_PORT                 HTTP port (default: 8897)");
    eprintln!("    HTTP_MAX_SESSIONS         Max concurrent HTTP sessions (default: 50)");
    eprintln!("    RUST_LOG                  Logging level (default: info)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    # Start in stdio mode (for desktop MCP clients)");
    eprintln!("    binance-mcp --stdio");
    eprintln!();
    eprintln!("    # Start HTTP server on a custom port");
    eprintln!("    binance-mcp --mode http --port 8080");
}

/// Run the server in HTTP mode
#[cfg(feature = "http_transport")]
async fn run_http_server(handler: McpHandler, port: Option<u16>) -> anyhow::Result<()> {
    use binance_mcp::config::HttpConfig;

    let mut config = HttpConfig::from_env()
        .map_err(|e| anyhow!("Failed to load HTTP configuration: {}", e))?;
    if let Some(port) = port {
        config = config.with_port(port);
    }

    binance_mcp::transport::http::start_http_server(&config, handler)
        .await
        .map_err(|e| anyhow!("HTTP transport failed: {}", e))
}

#[cfg(not(feature = "http_transport"))]
async fn run_http_server(_handler: McpHandler, _port: Option<u16>) -> anyhow::Result<()> {
    Err(anyhow!(
        "HTTP transport not enabled. Rebuild with --features http_transport"
    ))
}
