//! Makai MCP - Main entrypoint.
//!
//! Serves the demonstration server over stdio, or acts as a client against a
//! server launched as a child process. Logs always go to stderr because stdout
//! carries protocol traffic when serving.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Args as ClapArgs, Parser, Subcommand};
use makai_mcp_lib::config::{ConfigLoader, LogConfig, MakaiConfig, Validate, ENV_PREFIX};
use makai_mcp_lib::demo::demo_server;
use makai_mcp_lib::error::{MakaiError, MakaiResult};
use makai_mcp_lib::protocol::mcp::{Capabilities, McpClient};
use makai_mcp_lib::transport::{ProcessTransport, StdioTransport};
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Makai MCP.
#[derive(Parser, Debug)]
#[clap(name = "makai_mcp", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser, global = true)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// A server to launch as a child process.
#[derive(ClapArgs, Debug)]
struct ServerCommand {
    /// Program that runs the server
    #[clap(long)]
    command: String,

    /// Arguments for the program, after `--`
    #[clap(last = true)]
    args: Vec<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the demonstration server on stdin/stdout
    Serve,

    /// Launch a server, perform the handshake and print its catalogs
    Inspect {
        #[clap(flatten)]
        server: ServerCommand,
    },

    /// Launch a server and call one of its tools
    CallTool {
        #[clap(flatten)]
        server: ServerCommand,

        /// Tool name
        #[clap(long)]
        name: String,

        /// Tool arguments as a JSON object
        #[clap(long, default_value = "{}")]
        arguments: String,
    },

    /// Launch a server and read one of its resources
    ReadResource {
        #[clap(flatten)]
        server: ServerCommand,

        /// Resource URI
        #[clap(long)]
        uri: String,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> MakaiResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location)
        .with_thread_names(true);

    let registry = tracing_subscriber::registry().with(filter).with(ErrorLayer::default());
    let result = if log.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };

    result.map_err(|e| MakaiError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Main entry point for the application.
fn main() -> MakaiResult<()> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Serve);

    if let Command::GenConfig { output } = &command {
        init_logging(&LogConfig::default())?;
        return gen_config(output);
    }

    let loader = ConfigLoader::new(args.config.as_deref(), ENV_PREFIX);
    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LogConfig::default())?;
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    init_logging(&config.log)?;
    makai_mcp_lib::init();

    if let Command::Validate = command {
        config.validate()?;
        info!("Configuration validated successfully");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.worker_threads)
        .thread_name("makai-worker")
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        match command {
            Command::Serve => serve(&config).await,
            Command::Inspect { server } => inspect(&config, server).await,
            Command::CallTool {
                server,
                name,
                arguments,
            } => call_tool(&config, server, &name, &arguments).await,
            Command::ReadResource { server, uri } => read_resource(&config, server, &uri).await,
            Command::Validate | Command::GenConfig { .. } => Ok(()),
        }
    })
}

fn gen_config(output: &Path) -> MakaiResult<()> {
    info!("Generating default configuration");

    // Create parent directories if they don't exist
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml = MakaiConfig::default().to_toml()?;
    std::fs::write(output, toml)?;

    info!("Default configuration written to {:?}", output);
    Ok(())
}

async fn serve(config: &MakaiConfig) -> MakaiResult<()> {
    let server = demo_server(&config.server)?;
    let transport = Arc::new(StdioTransport::new());
    server.connect(transport.clone()).await?;
    info!(name = %config.server.name, "Serving on stdio");

    tokio::select! {
        _ = transport.wait_closed() => info!("stdin closed, shutting down"),
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for interrupt");
            }
            info!("Interrupted, shutting down");
        }
    }

    server.disconnect().await?;
    Ok(())
}

async fn connect(config: &MakaiConfig, server: ServerCommand) -> MakaiResult<McpClient> {
    let client = McpClient::with_config(&config.client, Capabilities::all());
    let transport = Arc::new(ProcessTransport::new(server.command, server.args));
    client.connect(transport).await?;
    Ok(client)
}

fn print_json<T: serde::Serialize>(value: &T) -> MakaiResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn inspect(config: &MakaiConfig, server: ServerCommand) -> MakaiResult<()> {
    let client = connect(config, server).await?;

    let outcome = async {
        print_json(&client.server_info())?;

        let capabilities = client.server_info().map(|info| info.capabilities).unwrap_or_default();
        if capabilities.tools.is_some() {
            print_json(&client.list_tools().await?)?;
        }
        if capabilities.resources.is_some() {
            print_json(&client.list_resources().await?)?;
        }
        if capabilities.prompts.is_some() {
            print_json(&client.list_prompts().await?)?;
        }
        Ok::<_, MakaiError>(())
    }
    .await;

    client.disconnect().await?;
    outcome
}

async fn call_tool(config: &MakaiConfig, server: ServerCommand, name: &str, arguments: &str) -> MakaiResult<()> {
    let arguments: Value = serde_json::from_str(arguments)?;
    let client = connect(config, server).await?;

    let outcome = client.call_tool(name, arguments).await;
    client.disconnect().await?;

    let result = outcome?;
    print_json(&result)?;
    if result.is_error {
        process::exit(2);
    }
    Ok(())
}

async fn read_resource(config: &MakaiConfig, server: ServerCommand, uri: &str) -> MakaiResult<()> {
    let client = connect(config, server).await?;

    let outcome = client.read_resource(uri).await;
    client.disconnect().await?;

    print_json(&outcome?)
}
