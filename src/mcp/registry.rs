//! Surface registry
//!
//! Static tables of tools, resources, and prompts, built once at startup and
//! looked up by exact name (tools, prompts) or URI template (resources).
//! Arguments are deserialized into each entry's parameter type before the
//! handler runs, so malformed arguments never reach a handler.

use futures::future::BoxFuture;
use futures::FutureExt;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use super::server::BinanceServer;
use super::uri::{UriParams, UriTemplate};
use super::{prompts, resources, tools};
use crate::error::{ProviderError, Result};
use crate::transport::TransportMode;

/// Boxed future returned by tool and resource handlers
pub type HandlerFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// Typed tool handler
pub type ToolFn<P> = for<'a> fn(&'a BinanceServer, P) -> HandlerFuture<'a, String>;

/// Resource read handler
pub type ResourceFn = for<'a> fn(&'a BinanceServer, UriParams) -> HandlerFuture<'a, String>;

type ErasedToolFn =
    Box<dyn for<'a> Fn(&'a BinanceServer, Value) -> HandlerFuture<'a, String> + Send + Sync>;

type ErasedPromptFn = Box<dyn Fn(Value) -> Result<String> + Send + Sync>;

/// Deserialize protocol arguments into a parameter type
///
/// A missing/null argument object is treated as `{}`.
pub fn parse_args<P: DeserializeOwned>(args: Value) -> Result<P> {
    let args = match args {
        Value::Null => json!({}),
        Value::Object(_) => args,
        other => {
            return Err(ProviderError::InvalidArgument(format!(
                "Arguments must be an object, got {}",
                other
            )))
        }
    };

    serde_json::from_value(args).map_err(|e| ProviderError::InvalidArgument(e.to_string()))
}

fn schema_of<P: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(P)).unwrap_or_else(|_| json!({"type": "object"}))
}

fn erase_tool<F>(f: F) -> ErasedToolFn
where
    F: for<'a> Fn(&'a BinanceServer, Value) -> HandlerFuture<'a, String> + Send + Sync + 'static,
{
    Box::new(f)
}

/// An invocable operation
pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    handler: ErasedToolFn,
}

impl Tool {
    pub fn new<P>(name: &'static str, description: &'static str, handler: ToolFn<P>) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
    {
        let handler = erase_tool(move |server, args| match parse_args::<P>(args) {
            Ok(params) => handler(server, params),
            Err(e) => futures::future::ready(Err(e)).boxed(),
        });

        Self {
            name,
            description,
            input_schema: schema_of::<P>(),
            handler,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema,
        })
    }
}

/// A readable resource addressed by URI or URI template
pub struct Resource {
    pub template: UriTemplate,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    handler: ResourceFn,
}

impl Resource {
    pub fn new(
        template: &'static str,
        name: &'static str,
        description: &'static str,
        mime_type: &'static str,
        handler: ResourceFn,
    ) -> Self {
        Self {
            template: UriTemplate::new(template),
            name,
            description,
            mime_type,
            handler,
        }
    }

    pub fn to_json(&self) -> Value {
        let uri_key = if self.template.is_concrete() {
            "uri"
        } else {
            "uriTemplate"
        };

        let mut value = json!({
            "name": self.name,
            "description": self.description,
            "mimeType": self.mime_type,
        });
        value[uri_key] = json!(self.template.as_str());
        value
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("template", &self.template)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

/// Declared prompt argument
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// A pure text template
pub struct Prompt {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
    render: ErasedPromptFn,
}

impl std::fmt::Debug for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompt")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl Prompt {
    pub fn new<P>(
        name: &'static str,
        description: &'static str,
        arguments: Vec<PromptArgument>,
        render: fn(P) -> String,
    ) -> Self
    where
        P: DeserializeOwned + 'static,
    {
        Self {
            name,
            description,
            arguments,
            render: Box::new(move |args| parse_args::<P>(args).map(render)),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "arguments": self.arguments,
        })
    }
}

/// Registry of every externally addressable entity
pub struct SurfaceRegistry {
    server: BinanceServer,
    tools: Vec<Tool>,
    resources: Vec<Resource>,
    prompts: Vec<Prompt>,
}

impl SurfaceRegistry {
    /// Register the fixed surface for a transport mode
    ///
    /// `get_recent_logs` is only exposed on the HTTP transport.
    pub fn new(server: BinanceServer, mode: TransportMode) -> Self {
        let mut registry = Self {
            server,
            tools: Vec::new(),
            resources: Vec::new(),
            prompts: Vec::new(),
        };

        registry.add_market_data_tools();
        if mode == TransportMode::Http {
            registry.tools.push(Tool::new(
                "get_recent_logs",
                "Get recent activity logs (limit: 1-100)",
                tools::get_recent_logs,
            ));
        }
        registry.add_resources();
        registry.add_prompts();

        tracing::debug!(
            tools = registry.tools.len(),
            resources = registry.resources.len(),
            prompts = registry.prompts.len(),
            "Surface registry built"
        );

        registry
    }

    fn add_market_data_tools(&mut self) {
        self.tools.push(Tool::new(
            "get_price",
            "Get the current price of a crypto asset from Binance",
            tools::get_price,
        ));
        self.tools.push(Tool::new(
            "get_price_24hr_change",
            "Get the 24-hour price change statistics of a crypto asset from Binance",
            tools::get_price_24hr_change,
        ));
        self.tools.push(Tool::new(
            "get_rolling_windows_price",
            "Get rolling window price change statistics of a crypto asset from Binance \
             (window: 1m-59m, 1h-23h, 1d-7d)",
            tools::get_rolling_windows_price,
        ));
    }

    fn add_resources(&mut self) {
        self.resources.push(Resource::new(
            resources::SYMBOL_MAP_URI,
            "symbol_map",
            "Crypto name to trading symbol mappings (CSV)",
            "text/csv",
            resources::read_symbol_map,
        ));
        self.resources.push(Resource::new(
            resources::ACTIVITY_LOG_URI,
            "activity_log",
            "Recorded market data activity, one entry per line",
            "text/plain",
            resources::read_activity_log,
        ));
        self.resources.push(Resource::new(
            resources::CRYPTO_PRICE_URI,
            "crypto_price",
            "Current price of a crypto asset from Binance",
            "text/plain",
            resources::read_crypto_price,
        ));
    }

    fn add_prompts(&mut self) {
        self.prompts.push(Prompt::new(
            "executive_summary",
            "Returns an executive summary of Bitcoin and Ethereum",
            Vec::new(),
            prompts::executive_summary,
        ));
        self.prompts.push(Prompt::new(
            "crypto_summary",
            "Return an executive summary of crypto assets (supports multiple assets separated by commas)",
            vec![PromptArgument {
                name: "cryptos",
                description: "Comma-separated list of crypto assets (e.g., btc, eth, sol)",
                required: true,
            }],
            prompts::crypto_summary,
        ));
    }

    pub fn list_tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Invoke a tool by exact name
    pub async fn invoke(&self, name: &str, args: Value) -> Result<String> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| ProviderError::ToolNotFound(name.to_string()))?;

        tracing::debug!(tool = %name, "Invoking tool");
        (tool.handler)(&self.server, args).await
    }

    /// Resources addressed by a concrete URI
    pub fn list_resources(&self) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|resource| resource.template.is_concrete())
            .collect()
    }

    /// Resources addressed by a URI template
    pub fn list_resource_templates(&self) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|resource| !resource.template.is_concrete())
            .collect()
    }

    /// Read the first resource whose template matches `uri`
    pub async fn read_resource(&self, uri: &str) -> Result<(&Resource, String)> {
        let (resource, params) = self
            .resources
            .iter()
            .find_map(|resource| resource.template.matches(uri).map(|p| (resource, p)))
            .ok_or_else(|| ProviderError::ResourceNotFound(uri.to_string()))?;

        tracing::debug!(uri = %uri, "Reading resource");
        let text = (resource.handler)(&self.server, params).await?;
        Ok((resource, text))
    }

    pub fn list_prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Render a prompt by exact name
    pub fn render_prompt(&self, name: &str, args: Value) -> Result<(&Prompt, String)> {
        let prompt = self
            .prompts
            .iter()
            .find(|prompt| prompt.name == name)
            .ok_or_else(|| ProviderError::PromptNotFound(name.to_string()))?;

        let text = (prompt.render)(args)?;
        Ok((prompt, text))
    }
}
