//! `moon-console`: loads `config.toml`, applies command-line overrides and
//! starts the terminal console.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

use moon_console::{
    config::{AppConfig, ConfigOverrides},
    i18n::Locale,
    logging,
};

#[derive(Debug, Parser)]
#[command(
    name = "moon-console",
    version,
    about = "Terminal administration console for Moon Monitor"
)]
struct Cli {
    /// Config file (defaults to the per-user config directory)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Console origin; picks the backend from the host map
    #[arg(long = "origin", value_name = "URL")]
    origin: Option<String>,

    /// UI language: zh-CN or en-US
    #[arg(short = 'l', long = "locale", value_name = "LOCALE")]
    locale: Option<Locale>,

    /// Where the remembered account, team and logs are kept
    #[arg(long = "state-dir", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "moon_console=trace"
    #[arg(long = "log-level", value_name = "FILTER")]
    log_level: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long = "print-config")]
    print_config: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            origin: self.origin.clone(),
            locale: self.locale,
            state_dir: self.state_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())
        .wrap_err("failed to load the configuration")?
        .apply(cli.overrides());

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let _guard = logging::init(&config.log_dir(), config.log_level.as_deref())
        .wrap_err("failed to initialize logging")?;
    moon_console::run(config).map_err(|err| color_eyre::eyre::eyre!("{err:#}"))?;
    Ok(())
}
