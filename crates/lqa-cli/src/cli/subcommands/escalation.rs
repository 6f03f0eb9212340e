use clap::Subcommand;

/// Escalation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EscalationCommands {
    /// Evaluate the escalation rules for a freelancer.
    Check {
        freelancer_id: String,
        /// Only report the events; record and notify nothing.
        #[arg(long)]
        dry_run: bool,
    },
}
