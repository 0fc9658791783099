//! Live terminal dashboard for host CPU, memory, disk and uptime.

pub mod app;
pub mod cli;
pub mod core;
pub mod screens;
pub mod utils;
pub mod widgets;
