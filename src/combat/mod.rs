//! Combat resolution.

pub mod duel;
pub mod math;

pub use duel::{resolve_duel, DuelReport};
pub use math::{roll_win, win_rate};
