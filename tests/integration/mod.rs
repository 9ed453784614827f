//! Integration tests for the sandtree workspace, store and CLI

mod cli_contracts;
mod session_scenario;
mod sled_store;
mod tree_determinism;
