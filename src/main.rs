use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use inquiry::api::FormEndpoint;
use inquiry::app::App;
use inquiry::config::Config;
use inquiry::form::contact_steps;
use inquiry::logging;
use inquiry::notifications::NotificationQueue;
use inquiry::theme::{FileThemeStore, Theme, ThemeToggle};
use inquiry::wizard::{SubmissionResult, Widget};

#[derive(Parser)]
#[command(name = "inquiry")]
#[command(about = "Multi-step contact form for the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the form from the command line and send it
    Submit {
        /// Field value as name=value (repeatable)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Show or change the saved light/dark theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Write the effective configuration to ./inquiry.toml
    Init,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the saved theme
    Show,
    /// Switch to the other theme
    Toggle,
    /// Save a specific theme
    Set { theme: Theme },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // Only the wizard takes over the terminal
    let is_tui_mode = cli.command.is_none();

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Submit { fields }) => {
            cmd_submit(&config, fields).await?;
        }
        Some(Commands::Theme { action }) => {
            cmd_theme(&config, action.unwrap_or(ThemeAction::Show))?;
        }
        Some(Commands::Init) => {
            config.save()?;
            println!("Wrote {}", Config::local_config_path().display());
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(config).context("Failed to start the wizard")?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

async fn cmd_submit(config: &Config, fields: Vec<(String, String)>) -> Result<()> {
    let endpoint = FormEndpoint::from_config(&config.endpoint)?;
    let queue = NotificationQueue::new();
    let mut widget = Widget::new(contact_steps(), Arc::new(queue.clone()))
        .with_messages(config.messages.clone());

    for (name, value) in fields {
        if !widget.set_value(&name, value) {
            bail!("Unknown field '{}'", name);
        }
    }

    while !widget.state().is_last() {
        let step = widget.state().progress_label();
        widget
            .next()
            .with_context(|| format!("{} is incomplete", step))?;
    }

    let result = widget
        .submit(&endpoint)
        .await
        .context("Form is incomplete")?;

    for notification in queue.drain() {
        println!("{}", notification.message);
    }

    match result {
        SubmissionResult::Success => Ok(()),
        SubmissionResult::Failure(reason) => {
            bail!("Submission to {} failed: {}", endpoint.url(), reason)
        }
    }
}

fn cmd_theme(config: &Config, action: ThemeAction) -> Result<()> {
    let mut toggle = ThemeToggle::new(Box::new(FileThemeStore::new(config.preferences_path())));

    let theme = match action {
        ThemeAction::Show => toggle.current(),
        ThemeAction::Toggle => toggle.toggle()?,
        ThemeAction::Set { theme } => toggle.set(theme)?,
    };
    println!("{} {}", theme.glyph(), theme);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("email=ada@x.com"),
            Ok(("email".to_string(), "ada@x.com".to_string()))
        );
        assert_eq!(
            parse_field("message=a=b"),
            Ok(("message".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_field("phone="), Ok(("phone".to_string(), String::new())));
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_cli_parses_submit_fields() {
        let cli = Cli::try_parse_from([
            "inquiry",
            "submit",
            "--field",
            "name=Ada",
            "-f",
            "email=ada@x.com",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Submit { fields }) => assert_eq!(fields.len(), 2),
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_cli_parses_theme_set() {
        let cli = Cli::try_parse_from(["inquiry", "--debug", "theme", "set", "dark"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(
            cli.command,
            Some(Commands::Theme {
                action: Some(ThemeAction::Set { theme: Theme::Dark })
            })
        ));

        assert!(Cli::try_parse_from(["inquiry", "theme", "set", "sepia"]).is_err());
    }
}
