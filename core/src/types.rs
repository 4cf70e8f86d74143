//! Shared primitive types used across the engine.

/// A client's stable identifier, assigned by the external client system.
pub type ClientId = String;

/// A product option line number: 1 accounts, 2 connect, 3 insurance, 4 loan.
pub type OptionId = i64;
