use anchor_lang::prelude::*;

/// Custom error codes for the Multipool Vault program
///
/// Every user-visible failure is a distinct, named condition so callers and
/// off-chain tooling can branch on cause.
#[error_code]
pub enum VaultError {
    // --- authorization ---
    #[msg("Sender is not the owner")]
    Unauthorized,

    #[msg("Sender is not the pending owner")]
    SenderIsNotPendingOwner,

    #[msg("Sender is not a vault manager")]
    SenderIsNotVaultManager,

    #[msg("Sender is not a whitelisted vault")]
    SenderIsNotVault,

    // --- configuration ---
    #[msg("Zero address is not allowed")]
    ZeroAddress,

    #[msg("Adapter is not set for this protocol")]
    AdapterIsNotSet,

    #[msg("Unknown pool")]
    UnknownPool,

    #[msg("Pool already added")]
    PoolAlreadyAdded,

    #[msg("Pools limit reached")]
    PoolsLimitReached,

    #[msg("Vault has position in pool")]
    VaultHasPositionInPool,

    #[msg("Shared protocol endpoint is not configured")]
    EndpointNotSet,

    #[msg("Market account does not match the configured endpoint")]
    WrongMarket,

    #[msg("Position account does not match the vault and market")]
    WrongPosition,

    #[msg("Vault managers limit reached")]
    VaultManagersLimitReached,

    #[msg("Invalid protocol type")]
    InvalidProtocolType,

    #[msg("Failed to decode protocol action data")]
    InvalidProtocolActionData,

    #[msg("Missing adapter accounts")]
    MissingAdapterAccounts,

    #[msg("Name or symbol too long")]
    NameTooLong,

    // --- economic guards ---
    #[msg("Deposit is less than the minimum deposit")]
    DepositLessThanMinDeposit,

    #[msg("Deposit amount must be greater than zero")]
    ZeroDepositAmount,

    #[msg("Operation results in zero shares")]
    ZeroShares,

    #[msg("Operation results in zero assets")]
    ZeroAssets,

    #[msg("Withdraw exceeds max withdraw")]
    ExceededMaxWithdraw,

    #[msg("Redeem exceeds max redeem")]
    ExceededMaxRedeem,

    #[msg("Slippage bound violated")]
    TooMuchSlippage,

    #[msg("Not enough free amount in the vault")]
    InsufficientFreeAmount,

    #[msg("Not enough lent amount in the protocol")]
    InsufficientLentAmount,

    // --- queue state ---
    #[msg("No element in the withdraw queue")]
    NoElementInQueue,

    #[msg("Withdraw queue is full")]
    WithdrawQueueIsFull,

    #[msg("No unstake request in the queue")]
    NoUnstakeRequest,

    #[msg("Unstake request is not finalized yet")]
    UnstakeRequestNotFinalized,

    #[msg("Unstake request queue is full")]
    UnstakeQueueIsFull,

    #[msg("Request id was never issued")]
    InvalidRequestId,

    // --- migration ---
    #[msg("Vault state schema is already current")]
    AlreadyMigrated,

    #[msg("Unknown vault state schema version")]
    UnknownSchemaVersion,

    // --- math ---
    #[msg("Math overflow occurred during calculation")]
    MathOverflow,

    #[msg("Division by zero")]
    DivisionByZero,

    // --- token validation ---
    #[msg("Invalid token mint")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidOwner,
}
