//! Client-side core of the `leadboard` terminal CRM: entity models, the
//! task progress aggregator, contact filters and statistics, the REST
//! client, the offline snapshot cache, and the CLI/TUI surfaces.

pub mod api;
pub mod commands;
pub mod filters;
pub mod models;
pub mod progress;
pub mod storage;
pub mod tui;
