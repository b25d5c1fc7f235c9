use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use winit::event_loop::{ControlFlow, EventLoop};

use hazard_run::app::{App, AppConfig};
use hazard_run::{build_info, health};

/// Isometric tactics on procedurally generated hazard arenas
#[derive(Parser, Debug)]
#[command(name = "hazard-run", version, about)]
struct Cli {
    /// Config profile to load (config/<profile>.toml); APP_PROFILE otherwise
    #[arg(long)]
    profile: Option<String>,

    /// Arena width in tiles (made odd)
    #[arg(long)]
    width: Option<i32>,

    /// Arena height in tiles (made odd)
    #[arg(long)]
    height: Option<i32>,

    /// Tile size in pixels
    #[arg(long = "tile-size", alias = "tilesize")]
    tile_size: Option<i32>,

    /// Hazard density between 0.0 and 0.9
    #[arg(long)]
    hazard: Option<f32>,

    /// Fixed arena seed; locks the seed
    #[arg(long, allow_negative_numbers = true)]
    seed: Option<i64>,

    /// Debug-level logging unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,

    /// Run the health-check suite and exit with its status code (details of
    /// passing checks only with --verbose)
    #[arg(long)]
    check: bool,
}

impl Cli {
    /// Command-line values win over config files and environment
    fn apply_overrides(&self, config: &mut AppConfig) {
        let level = &mut config.level;
        if let Some(width) = self.width {
            level.width = width;
        }
        if let Some(height) = self.height {
            level.height = height;
        }
        if let Some(tile_size) = self.tile_size {
            level.tile_size = tile_size;
        }
        if let Some(hazard) = self.hazard {
            level.hazard_density = hazard;
        }
        if let Some(seed) = self.seed {
            level.seed = Some(seed);
        }
    }

    fn load_config(&self) -> AppConfig {
        let loaded = match &self.profile {
            Some(profile) => AppConfig::load(profile),
            None => AppConfig::load_from_env(),
        };
        let mut config = loaded.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        self.apply_overrides(&mut config);
        config
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!(version = %build_info::version_string(), "Hazard Run");
    debug!("\n{}", build_info::detailed_info());

    if cli.check {
        let report = health::run_all_checks();
        health::print_report(&report, cli.verbose);
        std::process::exit(report.exit_code());
    }

    let config = cli.load_config();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    info!("Goodbye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hazard-run").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = parse(&["--width", "31", "--tilesize", "40", "--seed", "-12"]);
        let mut config = AppConfig::default();
        let hazard = config.level.hazard_density;
        cli.apply_overrides(&mut config);

        assert_eq!(config.level.width, 31);
        assert_eq!(config.level.tile_size, 40);
        assert_eq!(config.level.seed, Some(-12));
        assert_eq!(config.level.hazard_density, hazard);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        let args = ["hazard-run", "--hazard", "lots"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["hazard-run", "--width", "3.5"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["-v", "--check", "--profile", "debug", "--tile-size", "32"]);
        assert!(cli.verbose);
        assert!(cli.check);
        assert_eq!(cli.profile.as_deref(), Some("debug"));
        assert_eq!(cli.tile_size, Some(32));
    }
}
