use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;
use toaster::telemetry::LogFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Toast notification presenter driven by a command script", long_about = None)]
pub struct Cli {
    /// Chemin du fichier de configuration TOML.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Script de commandes à rejouer (stdin par défaut).
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Force le délai de fermeture automatique (ex. "5s").
    #[arg(long, value_parser = parse_duration)]
    pub auto_dismiss: Option<Duration>,

    /// Force le délai d'envoi simulé du formulaire de contact (ex. "1200ms").
    #[arg(long, value_parser = parse_duration)]
    pub submit_delay: Option<Duration>,

    /// Attend la disparition de la dernière notification avant de quitter.
    #[arg(long, action = ArgAction::SetTrue)]
    pub drain: bool,

    /// Format des logs : full, compact ou json (`--features json-logs`).
    #[arg(long, value_name = "FORMAT", default_value = "full", value_parser = LogFormat::from_str)]
    pub log_format: LogFormat,

    /// Filtre de logs explicite (ex. "toaster=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::time::Duration;
    use toaster::telemetry::LogFormat;

    #[test]
    fn parses_durations_and_format() {
        let cli = Cli::try_parse_from([
            "toaster",
            "--auto-dismiss",
            "2s",
            "--log-format",
            "compact",
            "--drain",
        ])
        .unwrap();
        assert_eq!(cli.auto_dismiss, Some(Duration::from_secs(2)));
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert!(cli.drain);
        assert!(cli.script.is_none());
    }
}
