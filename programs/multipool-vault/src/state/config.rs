use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::VaultError;

/// Global configuration singleton
///
/// Owns the vault whitelist and the single shared protocol endpoints. Its
/// owner is independent from any vault owner.
#[account]
#[derive(InitSpace)]
pub struct ConfigState {
    pub owner: Pubkey,

    /// Single shared liquidity-pool endpoint, default pubkey = unset
    pub lending_pool: Pubkey,

    /// Single shared liquid-staking endpoint, default pubkey = unset
    pub staking_pool: Pubkey,

    pub market_authority_bump: u8,
    pub bump: u8,
}

/// Per-vault configuration: whitelist flag, approved pool set and the FIFO
/// queue of pending async-unstake requests
#[account]
#[derive(InitSpace)]
pub struct VaultConfig {
    pub vault: Pubkey,

    /// Permission to call privileged config entry points
    pub whitelisted: bool,

    /// Approved long-tail pools. Removal swaps the last element into the
    /// removed slot, order is not preserved.
    #[max_len(MAX_POOLS)]
    pub pools: Vec<PoolConfig>,

    /// Pending async-unstake requests, strictly FIFO, head-only access
    #[max_len(MAX_UNSTAKE_REQUESTS)]
    pub unstake_requests: Vec<UnstakeRequest>,

    pub bump: u8,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, InitSpace)]
pub struct PoolConfig {
    pub pool: Pubkey,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, InitSpace)]
pub struct UnstakeRequest {
    pub request_id: u64,
    pub amount: u64,
}

impl VaultConfig {
    pub fn is_pool_approved(&self, pool: &Pubkey) -> bool {
        self.pools.iter().any(|config| config.pool == *pool)
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn add_pool(&mut self, pool: Pubkey) -> Result<()> {
        require_keys_neq!(pool, Pubkey::default(), VaultError::ZeroAddress);
        require!(!self.is_pool_approved(&pool), VaultError::PoolAlreadyAdded);
        require!(self.pools.len() < MAX_POOLS, VaultError::PoolsLimitReached);
        self.pools.push(PoolConfig { pool });
        Ok(())
    }

    /// Removes the pool at `index` by swapping the last element in
    pub fn remove_pool(&mut self, index: usize) -> Result<Pubkey> {
        require!(index < self.pools.len(), VaultError::UnknownPool);
        Ok(self.pools.swap_remove(index).pool)
    }

    pub fn pool_at(&self, index: usize) -> Result<Pubkey> {
        self.pools
            .get(index)
            .map(|config| config.pool)
            .ok_or(error!(VaultError::UnknownPool))
    }

    pub fn enqueue_unstake_request(&mut self, request_id: u64, amount: u64) -> Result<()> {
        require!(
            self.unstake_requests.len() < MAX_UNSTAKE_REQUESTS,
            VaultError::UnstakeQueueIsFull
        );
        self.unstake_requests.push(UnstakeRequest { request_id, amount });
        Ok(())
    }

    pub fn dequeue_unstake_request(&mut self) -> Result<UnstakeRequest> {
        require!(
            !self.unstake_requests.is_empty(),
            VaultError::NoUnstakeRequest
        );
        Ok(self.unstake_requests.remove(0))
    }

    pub fn peek_unstake_request(&self) -> Result<UnstakeRequest> {
        self.unstake_requests
            .first()
            .copied()
            .ok_or(error!(VaultError::NoUnstakeRequest))
    }

    /// Request id at the head, 0 when the queue is empty
    pub fn peek_unstake_request_id(&self) -> u64 {
        self.unstake_requests
            .first()
            .map(|request| request.request_id)
            .unwrap_or(0)
    }

    /// Sum of queued amounts awaiting external finalization
    pub fn pending_withdrawals(&self) -> u64 {
        self.unstake_requests
            .iter()
            .fold(0u64, |total, request| total.saturating_add(request.amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_config() -> VaultConfig {
        VaultConfig {
            vault: Pubkey::new_unique(),
            whitelisted: true,
            pools: Vec::new(),
            unstake_requests: Vec::new(),
            bump: 0,
        }
    }

    #[test]
    fn test_add_pool_rejects_duplicates_and_zero() {
        let mut config = mock_config();
        let pool = Pubkey::new_unique();
        config.add_pool(pool).unwrap();
        assert!(config.add_pool(pool).is_err());
        assert!(config.add_pool(Pubkey::default()).is_err());
    }

    #[test]
    fn test_pool_limit() {
        let mut config = mock_config();
        for _ in 0..MAX_POOLS {
            config.add_pool(Pubkey::new_unique()).unwrap();
        }
        assert!(config.add_pool(Pubkey::new_unique()).is_err());
    }

    #[test]
    fn test_remove_pool_swaps_last_in() {
        let mut config = mock_config();
        let pools: Vec<Pubkey> = (0..4).map(|_| Pubkey::new_unique()).collect();
        for pool in &pools {
            config.add_pool(*pool).unwrap();
        }

        let removed = config.remove_pool(0).unwrap();
        assert_eq!(removed, pools[0]);
        assert_eq!(config.pool_count(), 3);
        assert_eq!(config.pool_at(0).unwrap(), pools[3]);
        assert!(!config.is_pool_approved(&pools[0]));
    }

    #[test]
    fn test_remove_unknown_pool_index() {
        let mut config = mock_config();
        assert!(config.remove_pool(0).is_err());
    }

    #[test]
    fn test_unstake_queue_fifo() {
        let mut config = mock_config();
        config.enqueue_unstake_request(1, 100).unwrap();
        config.enqueue_unstake_request(2, 50).unwrap();

        assert_eq!(config.peek_unstake_request_id(), 1);
        assert_eq!(config.pending_withdrawals(), 150);

        let first = config.dequeue_unstake_request().unwrap();
        assert_eq!(first.request_id, 1);
        assert_eq!(first.amount, 100);

        let second = config.dequeue_unstake_request().unwrap();
        assert_eq!(second.request_id, 2);

        assert_eq!(config.peek_unstake_request_id(), 0);
        assert!(config.dequeue_unstake_request().is_err());
    }
}
