use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use infragen::generate::GenerateArgs;
use infragen::wizard::WizardCommand;
use infragen_config::RuntimeConfig;
use std::path::PathBuf;

/// Configuration wizard backend generating CloudFormation templates
#[derive(Parser)]
#[command(name = "infragen")]
#[command(version)]
#[command(about = "Configuration wizard backend generating CloudFormation templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// HTTP listen port (overrides config file)
    #[arg(short, long, value_name = "PORT", global = true)]
    port: Option<u16>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default if no subcommand given)
    Serve,
    /// Generate a template from a Configuration JSON file
    Generate(GenerateArgs),
    /// Interactive wizards for templates and project artifacts
    Wizard {
        #[command(subcommand)]
        target: WizardCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Generate(args)) => {
            infragen::generate::run(&args, &config.generator)?;
            Ok(())
        }
        Some(Commands::Wizard { target }) => target.run(&config.generator),
        Some(Commands::Serve) | None => run_server(config),
    }
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::load_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::load().context("Failed to load configuration")?
    };

    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) {
    if let Some(port) = cli.port {
        let host = config
            .server
            .listen_addr
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.server.listen_addr = format!("{}:{}", host, port);
    }

    if let Some(level) = &cli.log_level {
        config.server.log_level = level.clone();
    }
}

fn run_server(config: RuntimeConfig) -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(config))
}

async fn async_main(config: RuntimeConfig) -> Result<()> {
    // run_with_config initializes tracing again; that call is a no-op
    infragen::init_tracing(&config);
    display_startup_info(&config);
    infragen::run_with_config(config).await
}

fn display_startup_info(config: &RuntimeConfig) {
    use tracing::info;

    let server = &config.server;
    let generator = &config.generator;

    info!("╭─────────────────────────────────────────────────");
    info!("│ infragen v{}", env!("CARGO_PKG_VERSION"));
    info!("├─────────────────────────────────────────────────");
    info!("│ Listen address: http://{}", server.listen_addr);
    info!("│ Log level: {}", server.log_level);
    info!(
        "│ Services: {}",
        generator
            .enabled_services
            .iter()
            .map(|service| service.id())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("│ Output format: {}", generator.output_format);
    info!(
        "│ CORS: {}",
        if server.cors_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    if !generator.images.is_empty() {
        info!("│ Image overrides: {}", generator.images.len());
    }
    info!("╰─────────────────────────────────────────────────");
}
