//! Market-engine instructions: liquidity, betting, exits, settlement, views.

pub mod add_liquidity;
pub mod claim_payout;
pub mod early_exit;
pub mod place_bet;
pub mod views;

pub use add_liquidity::*;
pub use claim_payout::*;
pub use early_exit::*;
pub use place_bet::*;
pub use views::*;
