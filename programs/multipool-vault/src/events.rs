use anchor_lang::prelude::*;

use crate::constants::PROTOCOL_COUNT;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub asset_mint: Pubkey,
    pub share_mint: Pubkey,
    pub config_manager: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when assets are deposited for shares
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub sender: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub timestamp: i64,
}

/// Event emitted when shares are redeemed for assets
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub sender: Pubkey,
    pub receiver: Pubkey,
    pub owner: Pubkey,
    pub assets: u64,
    pub shares: u64,
    pub timestamp: i64,
}

/// Event emitted when a redemption is deferred into the withdraw queue
#[event]
pub struct WithdrawRequestCreated {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub request_id: u64,
    pub shares: u64,
    pub timestamp: i64,
}

/// Event emitted when the head of the withdraw queue is paid out
#[event]
pub struct WithdrawRequestFinalized {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub request_id: u64,
    pub shares: u64,
    pub assets: u64,
    pub timestamp: i64,
}

/// Audit event carrying the decoded result of a single protocol action
#[event]
pub struct ProtocolActionExecuted {
    pub vault: Pubkey,
    pub protocol: u8,
    pub amount: u64,
    pub timestamp: i64,
}

/// Event emitted when the lent-amount caches are refreshed
#[event]
pub struct TotalLentUpdated {
    pub vault: Pubkey,
    pub total_lent: u64,
    pub lent_amounts: [u64; PROTOCOL_COUNT],
    pub timestamp: i64,
}

/// Event emitted when an adapter is bound to a protocol slot
#[event]
pub struct LendingAdapterSet {
    pub vault: Pubkey,
    pub protocol: u8,
    pub adapter: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a vault manager is added or removed
#[event]
pub struct VaultManagerSet {
    pub vault: Pubkey,
    pub manager: Pubkey,
    pub enabled: bool,
    pub timestamp: i64,
}

#[event]
pub struct MinDepositSet {
    pub vault: Pubkey,
    pub min_deposit: u64,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferStarted {
    pub vault: Pubkey,
    pub owner: Pubkey,
    pub pending_owner: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct OwnershipTransferred {
    pub vault: Pubkey,
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the vault state schema is migrated
#[event]
pub struct VaultMigrated {
    pub vault: Pubkey,
    pub from_version: u16,
    pub to_version: u16,
    pub timestamp: i64,
}

/// Event emitted when the global config singleton is created
#[event]
pub struct ConfigInitialized {
    pub config: Pubkey,
    pub owner: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a vault's whitelist flag is toggled
#[event]
pub struct VaultWhitelistSet {
    pub vault: Pubkey,
    pub allowed: bool,
    pub timestamp: i64,
}

#[event]
pub struct PoolAdded {
    pub vault: Pubkey,
    pub pool: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PoolRemoved {
    pub vault: Pubkey,
    pub pool: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the shared liquidity-pool endpoint is set
#[event]
pub struct LendingPoolSet {
    pub pool: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when the shared liquid-staking endpoint is set
#[event]
pub struct StakingPoolSet {
    pub pool: Pubkey,
    pub timestamp: i64,
}

/// Event emitted when a per-(vault, market) position account is created
#[event]
pub struct PositionCreated {
    pub vault: Pubkey,
    pub market: Pubkey,
    pub protocol: u8,
    pub timestamp: i64,
}

#[event]
pub struct UnstakeRequestEnqueued {
    pub vault: Pubkey,
    pub request_id: u64,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct UnstakeRequestDequeued {
    pub vault: Pubkey,
    pub request_id: u64,
    pub amount: u64,
    pub timestamp: i64,
}

/// Event emitted when the external settlement watermark advances
#[event]
pub struct UnstakeRequestsFinalized {
    pub staking_pool: Pubkey,
    pub finalized_up_to: u64,
    pub timestamp: i64,
}
