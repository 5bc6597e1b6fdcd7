//! Bonding-engine instructions: pool lifecycle, voting, processing, claims.

pub mod claim_reward;
pub mod complete_evaluation;
pub mod create_pool;
pub mod process_pool;
pub mod set_options;
pub mod unfreeze;
pub mod vote;

pub use claim_reward::*;
pub use complete_evaluation::*;
pub use create_pool::*;
pub use process_pool::*;
pub use set_options::*;
pub use unfreeze::*;
pub use vote::*;
