// ABOUTME: Library root for webbundle - live theme deployment over the Gogo shell.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod console;
pub mod deploy;
pub mod error;
pub mod lifecycle;
pub mod locator;
pub mod output;
pub mod protocol;
pub mod types;
