//! Logic-level tests for the vault accounting engine
//!
//! These exercise the pure accounting methods the instruction handlers are
//! built on: share math, deposit/withdraw guards, the lent-amount caches and
//! the withdrawal queue state machine.

use anchor_lang::prelude::*;
use multipool_vault::adapters::ProtocolType;
use multipool_vault::constants::*;
use multipool_vault::state::{VaultState, WithdrawQueue};

fn mock_vault(free_amount: u64, total_lent: u64) -> VaultState {
    VaultState {
        owner: Pubkey::new_unique(),
        pending_owner: Pubkey::default(),
        asset_mint: Pubkey::new_unique(),
        share_mint: Pubkey::new_unique(),
        config_manager: Pubkey::new_unique(),
        lp_name: "Multipool LP tUSDC".to_string(),
        lp_symbol: "mpUSDC".to_string(),
        free_amount,
        total_lent,
        lent_amounts: [0; PROTOCOL_COUNT],
        min_deposit: 0,
        lending_adapters: [Pubkey::default(); PROTOCOL_COUNT],
        vault_managers: Vec::new(),
        schema_version: VAULT_SCHEMA_VERSION,
        bump: 0,
        share_bump: 0,
        authority_bump: 0,
    }
}

fn mock_queue() -> WithdrawQueue {
    WithdrawQueue {
        vault: Pubkey::new_unique(),
        start_index: 0,
        end_index: 0,
        entries: Vec::new(),
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
// Share math
// =============================================================================

#[test]
fn test_pda_derivation() {
    let program_id = multipool_vault::id();
    let asset_mint = Pubkey::new_unique();

    let (vault_state, _) =
        Pubkey::find_program_address(&[VAULT_SEED, asset_mint.as_ref()], &program_id);
    let (share_mint, _) =
        Pubkey::find_program_address(&[SHARE_MINT_SEED, asset_mint.as_ref()], &program_id);
    let (vault_authority, _) =
        Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED, asset_mint.as_ref()], &program_id);

    assert_ne!(vault_state, share_mint);
    assert_ne!(vault_state, vault_authority);
    assert_ne!(share_mint, vault_authority);

    // per-vault accounts hang off the vault state key
    let (queue_a, _) =
        Pubkey::find_program_address(&[WITHDRAW_QUEUE_SEED, vault_state.as_ref()], &program_id);
    let (escrow_a, _) =
        Pubkey::find_program_address(&[SHARE_ESCROW_SEED, vault_state.as_ref()], &program_id);
    assert_ne!(queue_a, escrow_a);
}

#[test]
fn test_first_deposit_mints_one_to_one() {
    let mut vault = mock_vault(0, 0);
    let shares = vault.checked_deposit(100, 0, None).unwrap();
    assert_eq!(shares, 100);
    assert_eq!(vault.free_amount, 100);
}

#[test]
fn test_deposit_never_exceeds_proportional_floor() {
    // 1500 assets backing 1000 shares
    let mut vault = mock_vault(1500, 0);
    let shares = vault.checked_deposit(100, 1000, None).unwrap();
    // 100 * 1000 / 1500 = 66.66.. rounded down
    assert_eq!(shares, 66);
}

#[test]
fn test_deposit_after_donation_halves_share_price() {
    // a direct asset donation doubles total assets without minting shares
    let vault = mock_vault(200, 0);
    assert_eq!(vault.convert_to_shares(1, 100).unwrap(), 0);
    assert_eq!(vault.convert_to_assets(1, 100).unwrap(), 2);
}

#[test]
fn test_preview_deposit_round_trip() {
    let mut vault = mock_vault(1500, 0);
    let previewed = vault.preview_deposit(100, 1000).unwrap();
    let minted = vault.checked_deposit(100, 1000, None).unwrap();
    assert_eq!(previewed, minted);
}

#[test]
fn test_preview_redeem_round_trip() {
    let mut vault = mock_vault(1500, 0);
    let previewed = vault.preview_redeem(100, 1000).unwrap();
    let paid = vault.checked_redeem(100, 1000, 1000, None).unwrap();
    assert_eq!(previewed, paid);
    assert_eq!(vault.free_amount, 1500 - paid);
}

#[test]
fn test_mint_collects_rounded_up_assets() {
    // 1 share is worth 1.001 assets
    let mut vault = mock_vault(1001, 0);
    let assets = vault.checked_mint(1, 1000, None).unwrap();
    assert_eq!(assets, 2);
}

#[test]
fn test_withdraw_burns_rounded_up_shares() {
    let mut vault = mock_vault(1500, 0);
    let shares = vault.checked_withdraw(100, 1000, 1000, None).unwrap();
    assert_eq!(shares, 67);
    assert_eq!(vault.free_amount, 1400);
}

// =============================================================================
// Economic guards
// =============================================================================

#[test]
fn test_zero_deposit_rejected() {
    let mut vault = mock_vault(0, 0);
    assert_err_named(vault.checked_deposit(0, 0, None), "ZeroDepositAmount");
}

#[test]
fn test_min_deposit_enforced_after_technical_position() {
    let mut vault = mock_vault(0, 0);
    vault.min_deposit = 100;

    // the very first deposit seeds the technical position
    let shares = vault.checked_deposit(5, 0, None).unwrap();
    assert_eq!(shares, 5);

    assert_err_named(
        vault.checked_deposit(5, 5, None),
        "DepositLessThanMinDeposit",
    );
    assert!(vault.checked_deposit(100, 5, None).is_ok());
}

#[test]
fn test_deposit_rounding_to_zero_shares_rejected() {
    // price per share far above one asset unit
    let mut vault = mock_vault(1000, 0);
    assert_err_named(vault.checked_deposit(1, 1, None), "ZeroShares");
}

#[test]
fn test_withdraw_exceeding_entitlement_rejected() {
    let mut vault = mock_vault(100, 0);
    // owner holds 50 of 100 shares, entitled to 50 assets
    assert_err_named(
        vault.checked_withdraw(60, 100, 50, None),
        "ExceededMaxWithdraw",
    );
}

#[test]
fn test_redeem_exceeding_balance_rejected() {
    let mut vault = mock_vault(100, 0);
    assert_err_named(vault.checked_redeem(60, 100, 50, None), "ExceededMaxRedeem");
}

#[test]
fn test_withdraw_beyond_free_amount_needs_queue() {
    // entitlement covers the amount but most assets are lent out
    let mut vault = mock_vault(50, 50);
    assert_err_named(
        vault.checked_withdraw(80, 100, 100, None),
        "InsufficientFreeAmount",
    );
}

#[test]
fn test_deposit_slippage_bound() {
    let mut vault = mock_vault(100, 0);
    // fair value is exactly 100 shares for 100 assets
    assert_err_named(
        vault.checked_deposit(100, 100, Some(101)),
        "TooMuchSlippage",
    );
    let shares = vault.checked_deposit(100, 100, Some(100)).unwrap();
    assert_eq!(shares, 100);
}

#[test]
fn test_redeem_slippage_bound() {
    let mut vault = mock_vault(1500, 0);
    // 100 shares are worth 150 assets
    assert_err_named(
        vault.checked_redeem(100, 1000, 1000, Some(151)),
        "TooMuchSlippage",
    );
    assert_eq!(
        vault.checked_redeem(100, 1000, 1000, Some(150)).unwrap(),
        150
    );
}

#[test]
fn test_mint_and_withdraw_slippage_bounds() {
    let mut vault = mock_vault(1500, 0);
    // minting 100 shares costs 150 assets
    assert_err_named(vault.checked_mint(100, 1000, Some(149)), "TooMuchSlippage");
    assert_eq!(vault.checked_mint(100, 1000, Some(150)).unwrap(), 150);

    let mut vault = mock_vault(1500, 0);
    // withdrawing 150 assets burns 100 shares
    assert_err_named(
        vault.checked_withdraw(150, 1000, 1000, Some(99)),
        "TooMuchSlippage",
    );
    assert_eq!(
        vault.checked_withdraw(150, 1000, 1000, Some(100)).unwrap(),
        100
    );
}

// =============================================================================
// Lent-amount accounting
// =============================================================================

#[test]
fn test_conservation_across_protocol_moves() {
    let mut vault = mock_vault(100, 0);
    let before = vault.total_assets().unwrap();

    vault.move_free_to_lent(ProtocolType::Lending, 60).unwrap();
    assert_eq!(vault.free_amount, 40);
    assert_eq!(vault.total_lent, 60);
    assert_eq!(vault.lent_amount(ProtocolType::Lending), 60);
    assert_eq!(vault.total_assets().unwrap(), before);

    vault.move_lent_to_free(ProtocolType::Lending, 25).unwrap();
    assert_eq!(vault.free_amount, 65);
    assert_eq!(vault.total_lent, 35);
    assert_eq!(vault.total_assets().unwrap(), before);
}

#[test]
fn test_move_free_to_lent_requires_free_liquidity() {
    let mut vault = mock_vault(10, 0);
    assert_err_named(
        vault.move_free_to_lent(ProtocolType::Lending, 11),
        "InsufficientFreeAmount",
    );
}

#[test]
fn test_set_lent_amounts_overwrites_cache() {
    let mut vault = mock_vault(0, 7);
    vault.set_lent_amounts([10, 20, 30]).unwrap();
    assert_eq!(vault.total_lent, 60);
    assert_eq!(vault.lent_amount(ProtocolType::Lending), 10);
    assert_eq!(vault.lent_amount(ProtocolType::Liquidity), 20);
    assert_eq!(vault.lent_amount(ProtocolType::Staking), 30);
}

#[test]
fn test_adapter_slot_binding() {
    let mut vault = mock_vault(0, 0);
    assert_err_named(vault.adapter(ProtocolType::Liquidity), "AdapterIsNotSet");

    assert_err_named(
        vault.set_adapter(ProtocolType::Liquidity, Pubkey::default()),
        "ZeroAddress",
    );

    let adapter = Pubkey::new_unique();
    vault.set_adapter(ProtocolType::Liquidity, adapter).unwrap();
    assert_eq!(vault.adapter(ProtocolType::Liquidity).unwrap(), adapter);
    // other slots stay unbound
    assert_err_named(vault.adapter(ProtocolType::Staking), "AdapterIsNotSet");
}

// =============================================================================
// Withdrawal queue
// =============================================================================

#[test]
fn test_queue_fifo_regardless_of_request_size() {
    let mut queue = mock_queue();
    let mut vault = mock_vault(1000, 0);

    queue.push(Pubkey::new_unique(), 300).unwrap();
    queue.push(Pubkey::new_unique(), 5).unwrap();
    queue.push(Pubkey::new_unique(), 100).unwrap();

    let mut total_supply = 1000;
    for expected in [(0u64, 300u64), (1, 5), (2, 100)] {
        let finalized = queue.finalize(&mut vault, total_supply).unwrap();
        assert_eq!((finalized.request_id, finalized.shares), expected);
        total_supply -= finalized.shares;
    }
    assert_err_named(queue.finalize(&mut vault, total_supply), "NoElementInQueue");
}

#[test]
fn test_finalize_distinguishes_empty_from_illiquid() {
    let mut queue = mock_queue();
    let mut vault = mock_vault(0, 100);

    // empty queue is its own condition
    assert_err_named(queue.finalize(&mut vault, 100), "NoElementInQueue");

    queue.push(Pubkey::new_unique(), 50).unwrap();

    // insufficient liquidity fails without consuming the head
    assert_err_named(queue.finalize(&mut vault, 100), "InsufficientFreeAmount");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.start_index, 0);

    // liquidity arrives, the same head resolves
    vault.move_lent_to_free(ProtocolType::Lending, 100).unwrap();
    let finalized = queue.finalize(&mut vault, 100).unwrap();
    assert_eq!(finalized.request_id, 0);
    assert_eq!(finalized.assets, 50);
}

#[test]
fn test_queue_capacity_bound() {
    let mut queue = mock_queue();
    for _ in 0..MAX_WITHDRAW_REQUESTS {
        queue.push(Pubkey::new_unique(), 1).unwrap();
    }
    assert_err_named(
        queue.push(Pubkey::new_unique(), 1),
        "WithdrawQueueIsFull",
    );
}

// =============================================================================
// Scenario: deposit, lend out, queue, drain
// =============================================================================

#[test]
fn test_full_withdrawal_queue_scenario() {
    let mut vault = mock_vault(0, 0);
    let mut queue = mock_queue();
    let user = Pubkey::new_unique();

    // user deposits 100 into an empty vault
    let minted = vault.checked_deposit(100, 0, None).unwrap();
    assert_eq!(minted, 100);
    assert_eq!(vault.free_amount, 100);
    let mut total_supply = 100u64;

    // manager lends everything out
    vault.move_free_to_lent(ProtocolType::Lending, 100).unwrap();
    assert_eq!(vault.free_amount, 0);
    assert_eq!(vault.total_lent, 100);

    // redemption of 50 shares cannot be paid, ticket 0 is created
    let owed = vault.convert_to_assets(50, total_supply).unwrap();
    assert_eq!(owed, 50);
    assert!(vault.free_amount < owed);
    let request_id = queue.push(user, 50).unwrap();
    assert_eq!(request_id, 0);

    // manager pulls 50 back from the pool
    vault.move_lent_to_free(ProtocolType::Lending, 50).unwrap();
    assert_eq!(vault.free_amount, 50);

    // the head resolves, the user gets 50 assets
    let finalized = queue.finalize(&mut vault, total_supply).unwrap();
    assert_eq!(finalized.request_id, 0);
    assert_eq!(finalized.owner, user);
    assert_eq!(finalized.assets, 50);
    assert_eq!(vault.free_amount, 0);
    total_supply -= finalized.shares;

    assert_eq!(queue.start_index, 1);
    assert_eq!(total_supply, 50);
    assert_err_named(queue.finalize(&mut vault, total_supply), "NoElementInQueue");
}

// =============================================================================
// Roles and migration
// =============================================================================

#[test]
fn test_vault_manager_set_is_enumerable() {
    let mut vault = mock_vault(0, 0);
    let manager = Pubkey::new_unique();

    assert!(!vault.is_vault_manager(&manager));
    vault.set_vault_manager(manager, true).unwrap();
    assert!(vault.is_vault_manager(&manager));

    // adding twice keeps a single entry
    vault.set_vault_manager(manager, true).unwrap();
    assert_eq!(vault.vault_managers.len(), 1);

    vault.set_vault_manager(manager, false).unwrap();
    assert!(!vault.is_vault_manager(&manager));
}

#[test]
fn test_vault_manager_limit() {
    let mut vault = mock_vault(0, 0);
    for _ in 0..MAX_VAULT_MANAGERS {
        vault.set_vault_manager(Pubkey::new_unique(), true).unwrap();
    }
    assert_err_named(
        vault.set_vault_manager(Pubkey::new_unique(), true),
        "VaultManagersLimitReached",
    );
}

#[test]
fn test_schema_migration_gate() {
    let mut vault = mock_vault(0, 0);
    vault.schema_version = 0;
    vault.lent_amounts = [5, 5, 5];

    let from = vault.migrate_schema().unwrap();
    assert_eq!(from, 0);
    assert_eq!(vault.schema_version, VAULT_SCHEMA_VERSION);
    // version 0 predates the caches, migration zeroes them
    assert_eq!(vault.lent_amounts, [0; PROTOCOL_COUNT]);

    assert_err_named(vault.migrate_schema(), "AlreadyMigrated");

    vault.schema_version = VAULT_SCHEMA_VERSION + 1;
    assert_err_named(vault.migrate_schema(), "UnknownSchemaVersion");
}
