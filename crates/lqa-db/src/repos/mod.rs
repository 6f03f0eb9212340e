//! Repository implementations on `LqaService`.

pub mod audit;
pub mod freelancer;
pub mod report;
pub mod settings;
pub mod user;
