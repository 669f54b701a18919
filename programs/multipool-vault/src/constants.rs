// Constants for the Multipool Vault program

/// Seed for vault state PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for share mint PDA
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seed for vault authority PDA
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for the vault-owned share escrow token account
pub const SHARE_ESCROW_SEED: &[u8] = b"share_escrow";

/// Seed for the withdrawal queue PDA
pub const WITHDRAW_QUEUE_SEED: &[u8] = b"withdraw_queue";

/// Seed for the global config PDA
pub const CONFIG_SEED: &[u8] = b"config";

/// Seed for per-vault config PDA
pub const VAULT_CONFIG_SEED: &[u8] = b"vault_config";

/// Seed for per-(vault, market) position PDA
pub const POSITION_SEED: &[u8] = b"position";

/// Seed for per-market liquidity token account PDA
pub const MARKET_VAULT_SEED: &[u8] = b"market_vault";

/// Seed for the global market authority PDA
pub const MARKET_AUTHORITY_SEED: &[u8] = b"market_authority";

/// Seed for per-market staking state PDA
pub const STAKING_POOL_SEED: &[u8] = b"staking_pool";

/// Protocol slots: long-tail lending pools, the single shared liquidity
/// pool, the liquid-staking pool
pub const PROTOCOL_COUNT: usize = 3;

/// Approved pools per vault
pub const MAX_POOLS: usize = 7;

/// Enumerable vault-manager set size
pub const MAX_VAULT_MANAGERS: usize = 8;

/// Pending redemption requests per vault
pub const MAX_WITHDRAW_REQUESTS: usize = 32;

/// Pending async-unstake requests per vault
pub const MAX_UNSTAKE_REQUESTS: usize = 16;

pub const MAX_LP_NAME_LEN: usize = 32;
pub const MAX_LP_SYMBOL_LEN: usize = 16;

/// Current VaultState schema, bumped on layout migrations
pub const VAULT_SCHEMA_VERSION: u16 = 1;
