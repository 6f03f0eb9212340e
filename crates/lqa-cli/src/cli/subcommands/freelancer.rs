use clap::Subcommand;

/// Freelancer commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FreelancerCommands {
    /// Register a freelancer.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Get a freelancer by ID.
    Get { id: String },
    /// List freelancers.
    List,
    /// Average LQA, average QS, and combined score over eligible reports.
    Score { id: String },
}
