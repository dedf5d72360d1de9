use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use toolchat::cli::{Cli, Commands};
use toolchat::{init, server, utils, Settings, ToolRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { port } => handle_serve(settings, port).await,
        Commands::Ask { question } => handle_ask(&settings, &question).await,
        Commands::Tools => handle_tools(&settings),
    };

    if let Err(e) = &result {
        utils::print_error(&format!("Error: {:#}", e));
    }

    result
}

async fn handle_serve(mut settings: Settings, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }

    let orchestrator = Arc::new(init(&settings)?);
    server::serve(orchestrator, &settings.server.address()).await
}

async fn handle_ask(settings: &Settings, question: &str) -> Result<()> {
    let orchestrator = init(settings)?;

    utils::print_info("Thinking...");
    let answer = orchestrator.run(question).await?;

    if !answer.tool_calls.is_empty() {
        utils::print_header("Tool calls");
        for record in &answer.tool_calls {
            utils::print_tool_call(record);
        }
    }

    utils::print_header("Answer");
    println!("{}", answer.answer);
    Ok(())
}

fn handle_tools(settings: &Settings) -> Result<()> {
    let registry = ToolRegistry::with_defaults(&settings.tools, Settings::weather_api_key())?;

    utils::print_header(&format!("{} tools", registry.len()));
    for contract in registry.contracts() {
        utils::print_contract(&contract);
    }

    if Settings::weather_api_key().is_some() {
        utils::print_success("\nWeather lookups enabled");
    } else {
        utils::print_info("\nget_current_weather needs OPENWEATHER_API_KEY to succeed");
    }
    Ok(())
}
