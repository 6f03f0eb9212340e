use clap::Subcommand;

/// Internal user commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Create a user.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// admin, project_manager, reviewer, translator
        #[arg(long)]
        role: String,
    },
    /// List users.
    List {
        #[arg(long)]
        role: Option<String>,
    },
}
