//! HavWtr Person Info Library
//!
//! Imperial/metric measurement conversion for the person-info form, the
//! profile endpoints it submits to, and a local cache of submitted info.

pub mod api;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod measurement;
pub mod models;
pub mod tools;
