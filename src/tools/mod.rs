//! HavWtr Tools module
//!
//! Tool implementations behind the MCP server.

pub mod conversion;
pub mod person_info;
pub mod profile;
pub mod status;
