//! Core traits for platform-agnostic actuation tasks.
//!
//! The control task reads the latest pilot demand, stabilization corrections
//! and arming state through [`SharedState`], so the same cycle code runs under
//! Embassy on target and with a `RefCell` on host.
//!
//! ```text
//!  RC / attitude / arming tasks         control task
//!  ───────────────────────────          ────────────
//!   inputs.with_mut(|i| ...)  ──────►   inputs.with(|i| *i)
//!                                            │
//!                               EmbassyState<T> (feature "embassy")
//!                               MockState<T>    (always available)
//! ```
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyState<T>`
//! - `MockState<T>` is always available for host testing

pub mod sync;

pub use sync::{MockState, SharedState};

#[cfg(feature = "embassy")]
pub use sync::EmbassyState;
