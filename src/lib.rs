// src/lib.rs
pub mod analysis;
pub mod config;
pub mod error;
pub mod file;
pub mod service;
pub mod state;
pub mod ui;
