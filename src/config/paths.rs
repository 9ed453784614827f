//! Filesystem locations for config and data.

pub mod xdg_root;
