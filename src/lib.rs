// Library exports for the athlete results client
// This allows testing of internal modules

pub mod access;
pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod plan;
pub mod session;
pub mod storage;
pub mod ui;
