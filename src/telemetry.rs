use std::str::FromStr;

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

/// Format de sortie des logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Choisit le premier filtre valide : explicite, puis `RUST_LOG`, puis `info`.
fn pick_filter(explicit_filter: Option<&str>) -> Result<EnvFilter> {
    explicit_filter
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("RUST_LOG").ok())
        .chain(std::iter::once("info".to_string()))
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

/// Initialise tracing avec un filtre optionnel et le format demandé.
///
/// # Errors
///
/// Retourne une erreur si aucun filtre n'est valide, si le format JSON est
/// demandé alors que la fonctionnalité `json-logs` n'est pas compilée, ou si
/// l'installation du subscriber global échoue.
pub fn init_tracing(explicit_filter: Option<&str>, format: LogFormat) -> Result<()> {
    let filter = pick_filter(explicit_filter)?;
    let registry = Registry::default().with(filter);

    let installed = match format {
        LogFormat::Full => tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            ),
        ),
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().compact().with_target(false)),
        ),
        #[cfg(feature = "json-logs")]
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .json()
                    .flatten_event(true),
            ),
        ),
        #[cfg(not(feature = "json-logs"))]
        LogFormat::Json => {
            return Err(Error::Telemetry(
                "binary was built without the `json-logs` feature".to_string(),
            ));
        }
    };

    installed.map_err(|err| Error::Telemetry(err.to_string()))
}
