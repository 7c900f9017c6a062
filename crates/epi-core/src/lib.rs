//! `epi-core` — foundational types for the `rust_epi` epidemic automaton.
//!
//! This crate is a dependency of every other `epi-*` crate.  It intentionally
//! has no `epi-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `AgentId`                                              |
//! | [`pos`]    | `Pos` — lattice cell coordinate                        |
//! | [`day`]    | `Day` — the simulated-day counter                      |
//! | [`rng`]    | `SimRng` — the explicit, seedable random source        |
//! | [`config`] | `EpiConfig` and its sections, `DurationRange`          |
//! | [`error`]  | `EpiError`, `EpiResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public config types.|

pub mod config;
pub mod day;
pub mod error;
pub mod ids;
pub mod pos;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    DiseaseConfig, DurationRange, EpiConfig, GridConfig, MovementConfig, PolicyConfig,
};
pub use day::Day;
pub use error::{EpiError, EpiResult};
pub use ids::AgentId;
pub use pos::Pos;
pub use rng::SimRng;
