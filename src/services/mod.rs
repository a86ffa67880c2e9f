//! Service layer for consuming the Evan API.
//!
//! This module contains:
//! - The typed REST client (`EvanClient`)
//! - Live/archived request resolution (`FetchResolver`)

mod client;
mod resolver;

pub use client::EvanClient;
pub use resolver::{ArchiveResolver, FetchMode, FetchResolver, NetworkResolver, resolver_for};
