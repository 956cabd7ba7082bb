//! Common data model for the Brook RDF parsers: the [`model`] of terms and
//! statements delivered while reading, the [`sink`] interfaces the reading
//! side calls into, and a [`uri`] engine for RFC 3986 reference resolution.
//!
//! This crate does not rely on any dependencies outside of the Rust standard
//! library.
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_qualifications
)]

pub mod model;
pub mod sink;
pub mod uri;
