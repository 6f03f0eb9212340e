//! # lqa-core
//!
//! Core types, ID prefixes, and error types for linguist quality review.
//!
//! This crate provides the foundational types shared across all lqa crates:
//! - Entity structs for quality reports, freelancers, users, settings, and audit entries
//! - Status enums, including the single report transition table
//! - ID prefix constants
//! - Cross-cutting error types
//! - Audit detail sub-types
//! - CLI response types
//! - Score aggregation (average LQA, average QS, combined score)

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;
pub mod scoring;
