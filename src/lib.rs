//! `dtnma-ari`: the AMM Resource Identifier (ARI) data model used by the
//! Delay-Tolerant Networking Management Architecture (DTNMA).
//!
//! This crate implements the core data model shared by every DTNMA agent
//! and manager: the recursive [`Ari`] value, its dual CBOR/text codecs,
//! the AMM type engine, and the parameter-binding and value-production
//! machinery built on top of it. It has no network or process-management
//! responsibilities of its own; those live in the tools that embed it.
//!
//! # Layout
//!
//! - [`value`] — the top-level [`Ari`] discriminated value and its
//!   literal primitive union.
//! - [`path`], [`idseg`], [`date`] — the object-path addressing tuple.
//! - [`containers`], [`params`] — AC/AM/TBL/EXECSET/RPTSET and the
//!   reference parameter block.
//! - [`time`] — the shared TP/TD timespec representation.
//! - [`ty`] — the fixed ARI-type enumeration.
//! - [`cbor`] and [`text`] — the two wire codecs.
//! - [`algo`] — the structural visit/translate/order/hash/equality
//!   algorithms every other module builds on.
//! - [`typing`] — the builtin and semantic type engine.
//! - [`binding`] — formal/actual parameter binding.
//! - [`produce`] — value production and LABEL substitution.

pub mod algo;
pub mod binding;
pub mod buf;
pub mod cbor;
pub mod containers;
pub mod date;
pub mod error;
pub mod idseg;
pub mod params;
pub mod path;
pub mod produce;
pub mod text;
pub mod time;
pub mod ty;
pub mod typing;
pub mod value;

pub use error::{Error, Result};
pub use path::ObjectPath;
pub use ty::AriType;
pub use value::{Ari, Literal, Primitive, Reference};
