use clap::Subcommand;

/// Quality report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Create a draft report.
    Create {
        #[arg(long)]
        freelancer: String,
        #[arg(long)]
        project: String,
        /// lqa, qs, combined
        #[arg(long = "type")]
        report_type: String,
        /// LQA score, 0-100
        #[arg(long)]
        lqa: Option<f64>,
        /// QS rating, 0-5
        #[arg(long)]
        qs: Option<f64>,
        /// Error entry as TYPE:SEVERITY:COUNT, e.g. terminology:major:2
        #[arg(long = "error")]
        errors: Vec<String>,
        #[arg(long)]
        reviewer: Option<String>,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Edit a report's content.
    Update {
        id: String,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        lqa: Option<f64>,
        #[arg(long)]
        qs: Option<f64>,
        /// Replace the error list; entries as TYPE:SEVERITY:COUNT
        #[arg(long = "error")]
        errors: Vec<String>,
        #[arg(long)]
        reviewer: Option<String>,
        #[arg(long)]
        comments: Option<String>,
    },
    /// Get a report by ID.
    Get { id: String },
    /// List reports.
    List {
        #[arg(long)]
        freelancer: Option<String>,
        /// Repeat to match several statuses
        #[arg(long)]
        status: Vec<String>,
        #[arg(long)]
        reviewer: Option<String>,
    },
    /// Send a report to the freelancer for review.
    Submit { id: String },
    /// Accept a report (translator).
    Accept { id: String },
    /// Dispute a report (translator).
    Dispute {
        id: String,
        #[arg(long)]
        comment: String,
    },
    /// Move a disputed report into final review.
    BeginFinalReview { id: String },
    /// Close a disputed report.
    Finalize {
        id: String,
        #[arg(long)]
        comment: Option<String>,
    },
}
