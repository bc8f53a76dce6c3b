//! Relay and hosted-session server.
//!
//! Usage: monkeybet-server [--host H] [--port P] [--think-delay-ms MS] [--log-json]

use monkeybet_web::{ServerConfig, WebServer};
use std::process;
use std::time::Duration;

#[derive(Debug)]
struct Args {
    config: ServerConfig,
    log_json: bool,
}

fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut config = ServerConfig::default();
    let mut log_json = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--host" | "-h" => {
                let host = iter.next().ok_or("--host requires a value")?;
                config = ServerConfig::new(host.clone(), config.port())
                    .with_think_delay(config.think_delay());
            }
            "--port" | "-p" => {
                let port = iter
                    .next()
                    .ok_or("--port requires a value")?
                    .parse()
                    .map_err(|_| "invalid port number".to_string())?;
                config = ServerConfig::new(config.host().to_string(), port)
                    .with_think_delay(config.think_delay());
            }
            "--think-delay-ms" => {
                let ms: u64 = iter
                    .next()
                    .ok_or("--think-delay-ms requires a value")?
                    .parse()
                    .map_err(|_| "invalid think delay".to_string())?;
                config = config.with_think_delay(Duration::from_millis(ms));
            }
            "--log-json" => log_json = true,
            "--help" => return Ok(None),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(Some(Args { config, log_json }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return Ok(());
        }
        Err(msg) => {
            eprintln!("Error: {msg}");
            print_help();
            process::exit(1);
        }
    };

    monkeybet_web::init_logging(args.log_json)?;

    let config = args.config;
    tracing::info!(
        host = config.host(),
        port = config.port(),
        think_delay_ms = config.think_delay().as_millis() as u64,
        "starting monkeybet server"
    );

    let handle = WebServer::new(config).start().await?;
    println!("Server running at http://{}", handle.address());
    println!("Lobby relay at ws://{}/ws", handle.address());

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");
    Ok(())
}

fn print_help() {
    println!("Monkeybet Server");
    println!();
    println!("Usage: monkeybet-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>         Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>         Port to bind to (default: 8080)");
    println!("  --think-delay-ms <MS>     Bot think delay (default: 1000)");
    println!("  --log-json                Log as JSON lines");
    println!("  --help                    Show this help message");
}
