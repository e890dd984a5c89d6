//! # hue-render — Deterministic Documents
//!
//! Renders one registry identifier into a self-contained document: a JSON
//! object carrying the display name, a base64 SVG image, and the ordered
//! attribute list, returned as a `data:application/json;base64,` URI.
//!
//! ## Modules
//!
//! - **Config** (`config.rs`): [`RenderConfig`], the fixed rendering inputs.
//! - **SVG** (`svg.rs`): background rectangle plus up to three text lines.
//! - **Document** (`document.rs`): [`Document`] and its canonical encoding.
//! - **Peer** (`peer.rs`): [`PeerRegistry`] and the never-failing
//!   [`resolve_display_name`] fallback.
//! - **Renderer** (`renderer.rs`): [`Renderer`], joining registry state,
//!   derived traits, and the image.
//!
//! ## Determinism
//!
//! Documents depend only on registry state, the [`RenderConfig`], and the
//! [`HolderView`]. Bytes come from [`hue_core::CanonicalBytes`], so object
//! keys are sorted and attribute order is the store's first-write order.

pub mod config;
pub mod document;
pub mod peer;
pub mod renderer;
pub mod svg;

pub use config::RenderConfig;
pub use document::{decode_data_uri, Attribute, Document};
pub use peer::{resolve_display_name, PeerError, PeerRegistry};
pub use renderer::{HolderView, Renderer};
