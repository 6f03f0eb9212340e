pub mod escalation;
pub mod freelancer;
pub mod report;
pub mod settings;
pub mod user;

pub use escalation::EscalationCommands;
pub use freelancer::FreelancerCommands;
pub use report::ReportCommands;
pub use settings::SettingsCommands;
pub use user::UserCommands;
