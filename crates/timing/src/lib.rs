#![doc = include_str!("../../../README.md")]

pub mod api;
pub mod client;
pub mod config;
pub mod counters;
pub mod enhance;
pub mod extract;
pub mod report;
pub mod stats;
pub mod timeline;
