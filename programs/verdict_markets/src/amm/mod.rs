//! # Automated market maker module
//!
//! Pure pricing math for the option-group liquidity book: odds quotes,
//! liquidity distribution, potential-return projection, and the early-exit
//! unwind formula. Instruction handlers own accounts and transfers; nothing
//! in here touches state.

pub mod odds;

pub use odds::*;
