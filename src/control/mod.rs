//! Pure control math — no I/O, no state.

pub mod policy;
