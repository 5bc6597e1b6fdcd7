pub const SEED_CONFIG: &[u8] = b"config";
pub const SEED_AUTHORIZED: &[u8] = b"authorized";
pub const SEED_STAKE: &[u8] = b"stake";
pub const SEED_POOL: &[u8] = b"pool";
pub const SEED_VOTE: &[u8] = b"vote";
pub const SEED_GROUP: &[u8] = b"group";
pub const SEED_POSITION: &[u8] = b"position";

/// Fixed-point scale for odds: 10_000 = 1.0000x.
pub const ODDS_PRECISION: u64 = 10_000;

/// Basis-point denominator for fees.
pub const BPS_DENOMINATOR: u64 = 10_000;

pub const MAX_TITLE_LEN: usize = 128;
pub const MAX_DATA_LEN: usize = 256;
pub const MAX_OPTIONS: usize = 16;
pub const MAX_OPTION_NAME_LEN: usize = 64;
