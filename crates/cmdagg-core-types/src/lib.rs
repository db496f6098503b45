//! Core types shared across cmdagg facilities
//!
//! This crate provides the canonical schema used by the logging facility
//! and by the error facility when errors are reported through logs:
//!
//! - **Schema constants**: Canonical field keys and event names

pub mod schema;
