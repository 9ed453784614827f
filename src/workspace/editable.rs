//! Editable workspace port.
//!
//! The session only talks to the live file set through this trait; the
//! backing runtime (an in-browser sandbox, an editor buffer set, or the
//! in-memory map below) owns the actual storage.

/// Live, mutable file set of one editing session
pub trait EditableWorkspace {
    /// All stored file paths, in no particular order
    fn list_paths(&self) -> Vec<String>;

    fn get_content(&self, path: &str) -> Option<String>;

    /// Insert or overwrite the file at `path`
    fn set_content(&mut self, path: &str, content: String);

    /// Remove the file at `path`; returns whether anything was removed
    fn remove_path(&mut self, path: &str) -> bool;

    /// Focus the editor on `path`, or clear focus with `None`
    fn set_active_path(&mut self, path: Option<&str>);
}
