pub mod audit;
pub mod dispatch;
pub mod escalation;
pub mod freelancer;
pub mod report;
pub mod settings;
pub mod shared;
pub mod sweep;
pub mod user;
