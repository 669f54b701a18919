//! Logic-level tests for the config manager state
//!
//! Covers the approved-pool set (cap, duplicates, swap-and-pop removal) and
//! the per-vault FIFO queue of async-unstake requests.

use anchor_lang::prelude::*;
use multipool_vault::constants::*;
use multipool_vault::state::{ConfigState, VaultConfig};

fn mock_vault_config() -> VaultConfig {
    VaultConfig {
        vault: Pubkey::new_unique(),
        whitelisted: true,
        pools: Vec::new(),
        unstake_requests: Vec::new(),
        bump: 0,
    }
}

fn assert_err_named<T: std::fmt::Debug>(result: Result<T>, name: &str) {
    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains(name),
        "expected {name}, got: {message}"
    );
}

// =============================================================================
// Approved pool set
// =============================================================================

#[test]
fn test_add_pool_zero_address_rejected() {
    let mut config = mock_vault_config();
    assert_err_named(config.add_pool(Pubkey::default()), "ZeroAddress");
}

#[test]
fn test_add_pool_duplicate_rejected() {
    let mut config = mock_vault_config();
    let pool = Pubkey::new_unique();
    config.add_pool(pool).unwrap();
    assert_err_named(config.add_pool(pool), "PoolAlreadyAdded");
}

#[test]
fn test_add_eighth_pool_rejected() {
    let mut config = mock_vault_config();
    for _ in 0..MAX_POOLS {
        config.add_pool(Pubkey::new_unique()).unwrap();
    }
    assert_eq!(config.pool_count(), 7);
    assert_err_named(config.add_pool(Pubkey::new_unique()), "PoolsLimitReached");
}

#[test]
fn test_remove_pool_at_zero_index_swaps_last_in() {
    let mut config = mock_vault_config();
    let pools: Vec<Pubkey> = (0..MAX_POOLS).map(|_| Pubkey::new_unique()).collect();
    for pool in &pools {
        config.add_pool(*pool).unwrap();
    }

    let removed = config.remove_pool(0).unwrap();
    assert_eq!(removed, pools[0]);
    assert_eq!(config.pool_count(), 6);

    // the last pool took the removed slot; interior order is untouched
    assert_eq!(config.pool_at(0).unwrap(), pools[6]);
    for index in 1..6 {
        assert_eq!(config.pool_at(index).unwrap(), pools[index]);
    }
}

#[test]
fn test_remove_pool_at_last_index() {
    let mut config = mock_vault_config();
    let pools: Vec<Pubkey> = (0..MAX_POOLS).map(|_| Pubkey::new_unique()).collect();
    for pool in &pools {
        config.add_pool(*pool).unwrap();
    }

    let removed = config.remove_pool(MAX_POOLS - 1).unwrap();
    assert_eq!(removed, pools[6]);
    assert_eq!(config.pool_count(), 6);
    for index in 0..6 {
        assert_eq!(config.pool_at(index).unwrap(), pools[index]);
    }
}

#[test]
fn test_remove_unknown_pool_rejected() {
    let mut config = mock_vault_config();
    assert_err_named(config.remove_pool(0), "UnknownPool");

    config.add_pool(Pubkey::new_unique()).unwrap();
    assert_err_named(config.remove_pool(1), "UnknownPool");
}

#[test]
fn test_pool_can_be_re_added_after_removal() {
    let mut config = mock_vault_config();
    let pool = Pubkey::new_unique();
    config.add_pool(pool).unwrap();
    config.remove_pool(0).unwrap();
    assert!(!config.is_pool_approved(&pool));
    config.add_pool(pool).unwrap();
    assert!(config.is_pool_approved(&pool));
}

// =============================================================================
// Unstake-request queue
// =============================================================================

#[test]
fn test_unstake_queue_is_fifo() {
    let mut config = mock_vault_config();
    config.enqueue_unstake_request(7, 300).unwrap();
    config.enqueue_unstake_request(9, 5).unwrap();
    config.enqueue_unstake_request(11, 100).unwrap();

    assert_eq!(config.peek_unstake_request_id(), 7);

    assert_eq!(config.dequeue_unstake_request().unwrap().request_id, 7);
    assert_eq!(config.dequeue_unstake_request().unwrap().request_id, 9);
    assert_eq!(config.dequeue_unstake_request().unwrap().request_id, 11);
    assert_err_named(config.dequeue_unstake_request(), "NoUnstakeRequest");
}

#[test]
fn test_peek_returns_zero_on_empty_queue() {
    let config = mock_vault_config();
    assert_eq!(config.peek_unstake_request_id(), 0);
    assert_err_named(config.peek_unstake_request(), "NoUnstakeRequest");
}

#[test]
fn test_pending_withdrawals_tracks_queue() {
    let mut config = mock_vault_config();
    assert_eq!(config.pending_withdrawals(), 0);

    config.enqueue_unstake_request(1, 200).unwrap();
    config.enqueue_unstake_request(2, 50).unwrap();
    assert_eq!(config.pending_withdrawals(), 250);

    config.dequeue_unstake_request().unwrap();
    assert_eq!(config.pending_withdrawals(), 50);

    config.dequeue_unstake_request().unwrap();
    assert_eq!(config.pending_withdrawals(), 0);
}

#[test]
fn test_unstake_queue_capacity_bound() {
    let mut config = mock_vault_config();
    for id in 0..MAX_UNSTAKE_REQUESTS as u64 {
        config.enqueue_unstake_request(id + 1, 10).unwrap();
    }
    assert_err_named(
        config.enqueue_unstake_request(99, 10),
        "UnstakeQueueIsFull",
    );
}

// =============================================================================
// PDA derivation
// =============================================================================

#[test]
fn test_config_pda_derivation() {
    let program_id = multipool_vault::id();

    let (config, _) = Pubkey::find_program_address(&[CONFIG_SEED], &program_id);
    let (market_authority, _) =
        Pubkey::find_program_address(&[MARKET_AUTHORITY_SEED], &program_id);
    assert_ne!(config, market_authority);

    // vault configs are keyed by the vault identity
    let vault_a = Pubkey::new_unique();
    let vault_b = Pubkey::new_unique();
    let (config_a, _) =
        Pubkey::find_program_address(&[VAULT_CONFIG_SEED, vault_a.as_ref()], &program_id);
    let (config_b, _) =
        Pubkey::find_program_address(&[VAULT_CONFIG_SEED, vault_b.as_ref()], &program_id);
    assert_ne!(config_a, config_b);

    // positions are keyed by (vault, market)
    let market = Pubkey::new_unique();
    let (position_a, _) = Pubkey::find_program_address(
        &[POSITION_SEED, vault_a.as_ref(), market.as_ref()],
        &program_id,
    );
    let (position_b, _) = Pubkey::find_program_address(
        &[POSITION_SEED, vault_b.as_ref(), market.as_ref()],
        &program_id,
    );
    assert_ne!(position_a, position_b);
}

#[test]
fn test_config_state_defaults_mean_unset() {
    let config = ConfigState {
        owner: Pubkey::new_unique(),
        lending_pool: Pubkey::default(),
        staking_pool: Pubkey::default(),
        market_authority_bump: 0,
        bump: 0,
    };
    // default pubkey marks an unconfigured endpoint
    assert_eq!(config.lending_pool, Pubkey::default());
    assert_eq!(config.staking_pool, Pubkey::default());
}
