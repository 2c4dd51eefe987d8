//! Core library components.
//!
//! Host identity resolution, instance metadata, and secrets bucket access.

pub mod bucket;
pub mod config;
pub mod constants;
pub mod detect;
pub mod hostdata;
pub mod logging;
pub mod metadata;
pub mod storage;
