use anyhow::Context;
use clap::{Parser, Subcommand};
use reynard_core::datetime_tools::{format_time_tool, get_current_time_tool};
use reynard_core::{initialize_tool_executor, ReynardConfig, ToolExecutionContext, ToolExecutor};
use reynard_git::{register_git_tools, GitBridgeClient};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reynard", author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "reynard.toml", env = "REYNARD_CONFIG")]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tools a role may call
    List {
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Execute a tool and print its result
    Call {
        /// Registered tool name
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,

        #[arg(long, default_value = "cli")]
        user_id: String,

        #[arg(long, default_value = "user")]
        role: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn register_builtin_tools(
    executor: &ToolExecutor,
    config: &ReynardConfig,
) -> anyhow::Result<()> {
    executor.register(Arc::new(get_current_time_tool()?)).await;
    executor.register(Arc::new(format_time_tool()?)).await;

    let client = GitBridgeClient::new(&config.bridge).context("Failed to create git bridge client")?;
    let registry = executor.registry();
    let mut registry = registry.write().await;
    register_git_tools(&mut registry, Arc::new(client))?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = ReynardConfig::load_or_default(&args.config);
    let executor = initialize_tool_executor(&config);
    register_builtin_tools(&executor, &config).await?;

    match args.command {
        Command::List { role } => {
            let ctx = ToolExecutionContext::new("cli", role);
            let tools = executor.available_tools(&ctx).await;
            println!("{}", serde_json::to_string_pretty(&tools)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Call {
            tool,
            args: raw_args,
            user_id,
            role,
        } => {
            let call_args: Value =
                serde_json::from_str(&raw_args).context("--args must be valid JSON")?;
            let ctx = ToolExecutionContext::new(user_id, role);
            let result = executor.execute(&tool, call_args, &ctx).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
