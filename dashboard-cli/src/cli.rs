use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dashboard_core::{
    Config, Dashboard, DashboardContext, UnitPreference, dashboard::load_both, provider_from_config,
    render::render_dashboard,
};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Current weather and 5-day forecast in the terminal")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default city and units.
    Configure,

    /// Show current conditions and the forecast chart once.
    Show(Target),

    /// Interactive dashboard: type a city to search, `:t` to toggle units, `:q` to quit.
    Watch(Target),

    /// Print the config file location.
    ConfigPath,
}

/// City and units for this run; fall back to the config file.
#[derive(Debug, Args)]
pub struct Target {
    /// City name, e.g. "Atlanta" or "Paris,FR".
    #[arg(long, short)]
    city: Option<String>,

    /// `metric` or `imperial`.
    #[arg(long, short)]
    units: Option<UnitPreference>,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show(target) => {
                let config = Config::load()?;
                let context = config.context(target.city, target.units);
                let provider = provider_from_config(&config)?;

                let (current, forecast) = load_both(provider.as_ref(), &context).await;
                print!("{}", render_dashboard(&current, &forecast, context.units));
            }
            Command::Watch(target) => {
                let config = Config::load()?;
                let context = config.context(target.city, target.units);
                watch(&config, context).await?;
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let city = Text::new("Default city:")
        .with_default(&config.city)
        .prompt()
        .context("Failed to read default city")?;
    if !city.trim().is_empty() {
        config.city = city.trim().to_string();
    }

    let start = UnitPreference::all()
        .iter()
        .position(|u| *u == config.units)
        .unwrap_or_default();
    config.units = Select::new("Default units:", UnitPreference::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read default units")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

/// One line typed into the watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WatchInput {
    Search(String),
    Units(UnitPreference),
    Toggle,
    Refresh,
    Help,
    Quit,
    Ignore,
}

impl WatchInput {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return WatchInput::Ignore;
        }

        let Some(command) = line.strip_prefix(':') else {
            return WatchInput::Search(line.to_string());
        };

        match command.trim().to_lowercase().as_str() {
            "q" | "quit" | "exit" => WatchInput::Quit,
            "t" | "toggle" => WatchInput::Toggle,
            "r" | "refresh" => WatchInput::Refresh,
            "h" | "help" | "?" => WatchInput::Help,
            other => match UnitPreference::try_from(other) {
                Ok(units) => WatchInput::Units(units),
                Err(_) => WatchInput::Help,
            },
        }
    }
}

const WATCH_HELP: &str = "Type a city name and press Enter to search.\n\
    :c / :metric    show metric units\n\
    :f / :imperial  show imperial units\n\
    :t / :toggle    toggle units\n\
    :r / :refresh   fetch again\n\
    :q / :quit      leave";

async fn watch(config: &Config, context: DashboardContext) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let (mut dashboard, mut updates) = Dashboard::new(provider, context);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{WATCH_HELP}\n");
    dashboard.refresh();
    draw(&dashboard);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match WatchInput::parse(&line) {
                    WatchInput::Search(city) => {
                        dashboard.search(&city);
                    }
                    WatchInput::Units(units) => dashboard.set_units(units),
                    WatchInput::Toggle => dashboard.toggle_units(),
                    WatchInput::Refresh => dashboard.refresh(),
                    WatchInput::Help => {
                        println!("{WATCH_HELP}");
                        continue;
                    }
                    WatchInput::Quit => break,
                    WatchInput::Ignore => continue,
                }
                draw(&dashboard);
            }
            Some(update) = updates.recv() => {
                if dashboard.apply(update) {
                    draw(&dashboard);
                }
            }
        }
    }

    debug!("Watch session ended");
    Ok(())
}

fn draw(dashboard: &Dashboard) {
    let context = dashboard.context();
    println!("==== {} ({}) ====", context.city, context.units);
    println!("{}", render_dashboard(dashboard.current(), dashboard.forecast(), context.units));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(WatchInput::parse("  New York "), WatchInput::Search("New York".into()));
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(WatchInput::parse("   "), WatchInput::Ignore);
    }

    #[test]
    fn unit_commands() {
        assert_eq!(WatchInput::parse(":c"), WatchInput::Units(UnitPreference::Metric));
        assert_eq!(WatchInput::parse(":imperial"), WatchInput::Units(UnitPreference::Imperial));
        assert_eq!(WatchInput::parse(":T"), WatchInput::Toggle);
    }

    #[test]
    fn session_commands() {
        assert_eq!(WatchInput::parse(":q"), WatchInput::Quit);
        assert_eq!(WatchInput::parse(":refresh"), WatchInput::Refresh);
        assert_eq!(WatchInput::parse(":bogus"), WatchInput::Help);
    }

    #[test]
    fn cli_parses_show_with_units() {
        let cli = Cli::try_parse_from(["weather-dashboard", "show", "--city", "Oslo", "--units", "metric"])
            .expect("valid args");
        match cli.command {
            Command::Show(target) => {
                assert_eq!(target.city.as_deref(), Some("Oslo"));
                assert_eq!(target.units, Some(UnitPreference::Metric));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_unknown_units() {
        let err = Cli::try_parse_from(["weather-dashboard", "show", "--units", "kelvin"]).unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }
}
