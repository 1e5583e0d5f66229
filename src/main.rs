//! BTC-MXN Tauros arbitrage bot entry point.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tauros_arb::config::Config;
use tauros_arb::exchange::{PrivateExchange, TaurosClient, TaurosPublicClient};
use tauros_arb::reference::BitsoClient;
use tauros_arb::strategy::StrategyEngine;

/// BTC-MXN cross-venue arbitrage bot.
#[derive(Parser, Debug)]
#[command(name = "tauros-arb")]
#[command(about = "Arbitrage bot quoting Tauros BTC-MXN against the Bitso reference price")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the trading loop (default).
    Run,

    /// Check configuration validity.
    CheckConfig,

    /// Check credentials, balance, and open orders.
    CheckBalance,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("tauros_arb=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckBalance) => cmd_check_balance().await,
        Some(Command::Run) | None => cmd_run().await,
    }
}

/// Load and validate configuration; missing credentials are fatal.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    Ok(config)
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TAUROS ARB BOT - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Checking API secret... ");
    match TaurosClient::new(&config) {
        Ok(_) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("API secret invalid"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {:?}", config.environment);
    println!("  Tauros URL: {}", config.tauros_url());
    println!("  Market: {}", config.market);
    println!("  Reference Book: {} ({})", config.reference_book, config.bitso_url);
    println!("  Max Order Value: ${}", config.max_order_value);
    println!("  Price Delta: {}", config.price_delta);
    println!("  Hold: {}s", config.hold_seconds);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check credentials, balance, and open orders against the live API.
async fn cmd_check_balance() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("TAUROS ARB BOT - BALANCE CHECK");
    println!("======================================================================");

    let config = load_config()?;

    println!("Host: {}", config.tauros_url());
    println!("Market: {}", config.market);
    println!("======================================================================");

    print!("\n1. Creating client... ");
    let client = TaurosClient::new(&config)?;
    println!("OK");

    print!("\n2. Getting {} balance... ", config.quote_currency);
    match client.balance(&config.quote_currency).await {
        Ok(wallet) => {
            println!("OK");
            println!("   Available: ${}", wallet.available);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    print!("\n3. Getting open orders... ");
    match client.open_orders(Some(&config.market)).await {
        Ok(orders) => {
            println!("OK");
            println!("   Open orders: {}", orders.len());
            for order in orders.iter().take(5) {
                println!(
                    "   - #{} {} {:?} @ {:?}",
                    order.order_id, order.side, order.amount, order.price
                );
            }
            if orders.len() > 5 {
                println!("   ... and {} more", orders.len() - 5);
            }
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    println!("\n======================================================================");
    println!("BALANCE CHECK COMPLETED");
    println!("======================================================================");

    Ok(())
}

/// Run the trading loop until the process is terminated.
async fn cmd_run() -> anyhow::Result<()> {
    let config = load_config()?;

    info!("Configuration loaded successfully");
    info!("Environment: {:?}", config.environment);
    info!("Market: {} vs reference {}", config.market, config.reference_book);
    info!("Max order value: ${}", config.max_order_value);
    info!("Hold: {}s", config.hold_seconds);

    let private = TaurosClient::new(&config)?;
    let local = TaurosPublicClient::new(&config);
    let reference = BitsoClient::new(&config);

    let engine = StrategyEngine::new(private, local, reference, config);

    info!("Starting arbitrage bot...");
    engine.run().await;

    Ok(())
}
