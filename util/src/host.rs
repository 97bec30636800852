//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "NAIAD_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the root directory of the software installation.
///
/// The root is used to locate the `params` and `sessions` directories, and is
/// set through the `NAIAD_SW_ROOT` environment variable.
pub fn get_naiad_sw_root() -> Result<PathBuf, std::env::VarError> {
    let root = std::env::var(SW_ROOT_ENV_VAR)?;

    Ok(PathBuf::from(root))
}
