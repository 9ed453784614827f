//! Workspace domain: the editable file set, the editing session that drives
//! it, and text formatting of command results.

mod editable;
mod format;
mod memory;
mod session;
mod types;

pub use editable::EditableWorkspace;
pub use format::{format_listing_text, format_section_heading, format_tree_text, format_versions_text};
pub use memory::InMemoryWorkspace;
pub use session::WorkspaceSession;
pub use types::{ListingRow, ListingOutput, TreeOutput, VersionsOutput};
