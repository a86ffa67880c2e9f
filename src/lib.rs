// src/lib.rs

//! Evan archive library: typed API client and offline snapshot archiver.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
