mod cli;
mod commands;
mod config;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Migrate(conn) => {
            let settings = config::Settings::resolve(&conn)?;
            init_tracing(settings.log_filter.as_deref());
            commands::migrate(&settings).await
        }
        cli::Command::Companies(cmd) => {
            let settings = config::Settings::resolve(cmd.conn())?;
            init_tracing(settings.log_filter.as_deref());
            commands::companies(&settings, cmd).await
        }
        cli::Command::Jobs(cmd) => {
            let settings = config::Settings::resolve(cmd.conn())?;
            init_tracing(settings.log_filter.as_deref());
            commands::jobs(&settings, cmd).await
        }
    }
}

/// Log to stderr so stdout stays parseable JSON. `RUST_LOG` wins over the
/// config file.
fn init_tracing(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config_filter.unwrap_or("warn")));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
