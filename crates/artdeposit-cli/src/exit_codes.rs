//! Process exit codes. Part of the CLI contract.

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 2; // Config unreadable/invalid, output not writable
pub const INPUT_ERROR: i32 = 3; // CSV/XML failed validation or the join
