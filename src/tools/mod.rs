//! Higher-level analytical tools built on the statistics primitives.

pub mod levels;
