//! Platform abstraction layer
//!
//! Implementations of the game's host traits:
//! - `headless`: in-memory page with a virtual clock (tests, native demo)
//! - `web`: the real DOM via web-sys (wasm32 only)

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;
