use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    EscalationCommands, FreelancerCommands, ReportCommands, SettingsCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Internal users (admins, project managers, reviewers).
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Freelance linguists and their scorecards.
    Freelancer {
        #[command(subcommand)]
        action: FreelancerCommands,
    },
    /// Review policy settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Quality reports and their review lifecycle.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Threshold checks over a freelancer's history.
    Escalation {
        #[command(subcommand)]
        action: EscalationCommands,
    },
    /// Auto-accept reports whose review deadline has passed.
    Sweep(SweepArgs),
    /// Audit trail for one entity.
    Audit(AuditArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SweepArgs {
    /// Evaluate deadlines as of this RFC 3339 instant instead of now.
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// Entity ID (rpt-..., frl-..., usr-..., qst-...)
    pub entity_id: String,
    /// Only entries with this action (created, updated, status_changed, ...)
    #[arg(long)]
    pub action: Option<String>,
}
