mod system;
pub mod expert;
pub mod researcher;
pub mod validation;

pub use system::System;

/// Returned for a tool name the system does not recognize. The turn continues with this as the
/// tool result.
pub const UNKNOWN_TOOL: &str = "Unknown tool";
