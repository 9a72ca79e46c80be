//! Effect resolution engine.
//!
//! This module is the entry point for the multi-phase reducer that turns a
//! list of classified atoms into the final effect set, an audit log, and any
//! rule violations. It is split into focused submodules under `src/engine/`
//! while keeping public paths stable (`crate::engine::Resolution` etc.).
//!
//! ## How the parts work together
//!
//! Resolving a formula is a fixed pipeline of ordered phases:
//!
//! ```text
//! effect texts ── classify ──> atoms
//!                               │
//!                               v
//!                    TierBuckets::from_atoms      (buckets.rs)
//!                               │
//!                               v
//!              (1) deadly 1:1 cancellation        (tiers.rs)
//!              (2) deadly-antidote bundle blocks
//!              (3) same-tier cancellation
//!              (4) cross-tier fixed point  <──┐
//!                       └── retry same-tier ──┘
//!                               │
//!                               v
//!                    into_final_atoms (reassembly order)
//!                               │
//!                               v
//!              (5) cross-kind pairs + block rules (blocks.rs)
//!              (6) collapse-to-strongest          (resolver.rs)
//!              (7) output-size check
//!                               │
//!                               v
//!                          Resolution             (log.rs)
//! ```
//!
//! Phase ordering is part of the contract: nothing is revisited except the
//! explicit fixed-point loop in phase 4, and that loop never re-runs the
//! bundle-blocking phase.
//!
//! ## Responsibilities by module
//!
//! - `buckets.rs`: the resolver's working state — poison/antidote atoms
//!   bucketed by tier plus the pass-through "others" list.
//! - `tiers.rs`: phases 1–4, the tier arithmetic.
//! - `blocks.rs`: phase 5, the generic cross-kind cancellation/blocking pass
//!   driven by the rules configuration.
//! - `resolver.rs`: orchestration, collapse, output-size check.
//! - `log.rs`: the `Resolution`/`ResolveLog` output types.
//!
//! The engine is total over well-formed atoms: it never raises, and an
//! over-limit result is a violation on the output, not an error.

#[path = "engine/blocks.rs"]
mod blocks;
#[path = "engine/buckets.rs"]
mod buckets;
#[path = "engine/log.rs"]
mod log;
#[path = "engine/resolver.rs"]
mod resolver;
#[path = "engine/tiers.rs"]
mod tiers;

pub use log::{LogAction, Resolution, ResolveLog};
pub(crate) use resolver::resolve_effect_texts;
