//! `wft settings` command - Per-device settings

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{FileSettingsStorage, Settings, SettingsService, SettingsUpdate, Theme};

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the current device settings
    Show,

    /// Change one or more settings
    Set(SetArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Name recorded on picks made from this device
    #[arg(long, conflicts_with = "clear_display_name")]
    pub display_name: Option<String>,

    /// Remove the display name (picks fall back to the config author)
    #[arg(long)]
    pub clear_display_name: bool,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Vibrate on a recorded pick
    #[arg(long)]
    pub haptics: Option<bool>,

    /// Celebrate when a line item completes
    #[arg(long)]
    pub confetti: Option<bool>,
}

impl SetArgs {
    fn to_update(&self) -> SettingsUpdate {
        let display_name = if self.clear_display_name {
            Some(None)
        } else {
            self.display_name.clone().map(Some)
        };
        SettingsUpdate {
            display_name,
            theme: self.theme,
            haptics: self.haptics,
            confetti: self.confetti,
        }
    }
}

/// Run a settings subcommand
pub fn run(cmd: SettingsCommands, global: &GlobalOpts) -> Result<()> {
    let storage = FileSettingsStorage::default_location().into_diagnostic()?;
    let service = SettingsService::new(storage);

    match cmd {
        SettingsCommands::Show => {
            let settings = service.current().into_diagnostic()?;
            if print_structured(&settings, global.format)? {
                return Ok(());
            }
            print_settings(&settings);
            if global.format == OutputFormat::Auto {
                println!();
                println!(
                    "{} {}",
                    style("Stored at").dim(),
                    style(service.storage().path().display()).dim()
                );
            }
            Ok(())
        }
        SettingsCommands::Set(args) => {
            let update = args.to_update();
            if update.is_empty() {
                return Err(miette::miette!(
                    help = "See `wft settings set --help` for the available flags.",
                    "nothing to change"
                ));
            }
            let settings = service.update(&update).into_diagnostic()?;
            println!("{} Settings updated", style("✓").green());
            print_settings(&settings);
            Ok(())
        }
    }
}

fn print_settings(settings: &Settings) {
    let name = settings
        .display_name
        .as_deref()
        .map(|n| style(n.to_string()).yellow())
        .unwrap_or_else(|| style("(not set)".to_string()).dim());
    println!("  {}: {}", style("display_name").cyan(), name);
    println!("  {}: {}", style("theme").cyan(), settings.theme);
    println!("  {}: {}", style("haptics").cyan(), settings.features.haptics);
    println!("  {}: {}", style("confetti").cyan(), settings.features.confetti);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SetArgs {
        SetArgs {
            display_name: None,
            clear_display_name: false,
            theme: None,
            haptics: None,
            confetti: None,
        }
    }

    #[test]
    fn test_to_update_maps_flags() {
        let update = SetArgs {
            display_name: Some("Dana".to_string()),
            theme: Some(Theme::Dark),
            haptics: Some(false),
            ..args()
        }
        .to_update();
        assert_eq!(update.display_name, Some(Some("Dana".to_string())));
        assert_eq!(update.theme, Some(Theme::Dark));
        assert_eq!(update.haptics, Some(false));
        assert_eq!(update.confetti, None);
    }

    #[test]
    fn test_to_update_clear_and_empty() {
        let clear = SetArgs {
            clear_display_name: true,
            ..args()
        }
        .to_update();
        assert_eq!(clear.display_name, Some(None));
        assert!(args().to_update().is_empty());
    }
}
