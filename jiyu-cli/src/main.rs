//! jiyu-udp binary entry point

use jiyu_cli::Cli;
use jiyu_core::Result;
use jiyu_net::SendConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    if let Err(e) = run(Cli::parse_args()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let payload = cli.action()?.encode(cli.on_overflow)?;
    info!(bytes = payload.len(), "frame encoded");

    let config = SendConfig {
        source: cli.teacher_ip,
        source_port: cli.teacher_port,
        ip_id: cli.ip_id,
    };

    for target in &cli.targets {
        let sent = jiyu_net::send(&config, target, cli.target_port, &payload)?;
        for endpoint in sent {
            println!("Sent {} bytes to {endpoint}", payload.len());
        }
    }
    Ok(())
}
