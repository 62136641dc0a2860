//! Map-annotation editor: browser host, save snapshots, and tracker export.
//!
//! The interactive surface lives in the `canvas` crate. This crate adds what
//! sits around it:
//!
//! | Module | Role |
//! |--------|------|
//! | [`persistence`] | Save snapshot codec, storage backends, quota-aware saving |
//! | [`export`] | Exporter trait and the EmoTracker JSON exporter |
//! | [`changelog`] | Changelog read-state checksum |
//! | [`config`] | App-level configuration |
//! | `host` | `wasm-bindgen` entry point (feature `hydrate`) |

pub mod changelog;
pub mod config;
pub mod export;
#[cfg(feature = "hydrate")]
pub mod host;
pub mod persistence;
