use core::fmt;
use std::sync::Once;
use tracing_subscriber::{
    field::MakeExt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Output format of the log subscriber.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tracing {
    /// Human readable, one line per event
    #[default]
    #[value(name = "compact")]
    Compact,
    /// One JSON object per event, for log shippers
    #[value(name = "json")]
    Json,
}

impl fmt::Display for Tracing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tracing::Compact => write!(f, "compact"),
            Tracing::Json => write!(f, "json"),
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
#[command(next_help_heading = "Logging")]
pub struct LoggingConfig {
    #[arg(id = "log-format", long, env = "LOG_FORMAT", value_enum, default_value_t = Tracing::Compact)]
    pub format: Tracing,
}

static INIT: Once = Once::new();

const RUST_LOG: &str = "info,sqlx=warn,sea_orm_migration=warn";

/// Set up the global subscriber. Calling this more than once is a no-op.
pub fn init_tracing(name: &str, tracing: Tracing) {
    INIT.call_once(|| init(name, tracing));
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        eprintln!("RUST_LOG is unset, using default: '{RUST_LOG}'");
        EnvFilter::new(RUST_LOG)
    })
}

fn init(name: &str, tracing: Tracing) {
    let result = match tracing {
        Tracing::Compact => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .map_fmt_fields(|f| f.debug_alt())
                    .with_ansi(true)
                    .with_level(true)
                    .compact(),
            )
            .try_init(),
        Tracing::Json => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    match result {
        Ok(()) => log::debug!("logging initialized for {name} ({tracing})"),
        // a test harness may have installed its own subscriber already
        Err(err) => log::debug!("logging not initialized for {name}: {err}"),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    #[derive(clap::Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        logging: LoggingConfig,
    }

    #[test]
    fn default_format() {
        let cli = Cli::parse_from(["test"]);
        assert_eq!(cli.logging.format, Tracing::Compact);
    }

    #[test]
    fn json_format() {
        let cli = Cli::parse_from(["test", "--log-format", "json"]);
        assert_eq!(cli.logging.format, Tracing::Json);
        assert_eq!(cli.logging.format.to_string(), "json");
    }

    #[test]
    fn init_twice() {
        init_tracing("test", Tracing::Compact);
        init_tracing("test", Tracing::Json);
    }
}
