/// File system operations and utilities.
pub mod file;
