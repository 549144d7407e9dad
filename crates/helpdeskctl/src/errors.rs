//! Exit codes for helpdeskctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code for a malformed command or argument
pub const EXIT_USAGE: i32 = 64;

/// Exit code when the config file is unreadable or invalid
pub const EXIT_CONFIG: i32 = 78;
