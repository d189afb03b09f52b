// ============================================================================
// vidkit-cli/src/commands/mod.rs
// ============================================================================
//
// COMMAND IMPLEMENTATIONS: one module per subcommand

pub mod compress;
pub mod info;
pub mod options;

pub use compress::run_compress;
pub use info::run_info;
pub use options::run_options;
