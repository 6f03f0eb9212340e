use clap::Subcommand;

/// Review policy commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SettingsCommands {
    /// Show the settings in effect.
    Get,
    /// Save new active settings. Unset values keep their current value.
    Set {
        #[arg(long)]
        dispute_period_days: Option<u32>,
        #[arg(long)]
        probation_threshold: Option<f64>,
        #[arg(long)]
        lqa_weight: Option<f64>,
        #[arg(long)]
        qs_multiplier: Option<f64>,
    },
    /// Previously saved settings, newest first.
    History,
}
