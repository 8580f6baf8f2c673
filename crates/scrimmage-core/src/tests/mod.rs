//! Scenario, determinism and property tests that drive a whole [`Field`].
//!
//! - `determinism.rs`: same seed, same log
//! - `integration.rs`: end-to-end scenarios through [`Field::tick`] and [`Field::run`]
//! - `properties.rs`: proptest invariants over random rosters
//! - `helpers.rs`: field and roster builders
//!
//! [`Field`]: crate::field::Field
//! [`Field::tick`]: crate::field::Field::tick
//! [`Field::run`]: crate::field::Field::run

mod determinism;
mod helpers;
mod properties;
