use anchor_lang::prelude::*;

use crate::errors::VaultError;

/// amount * numerator / denominator, rounding down
///
/// Uses a u128 intermediate so the product cannot overflow for u64 inputs.
pub fn mul_div(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return err!(VaultError::DivisionByZero);
    }
    let result = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultError::MathOverflow)?
        / (denominator as u128);
    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}

/// amount * numerator / denominator, rounding up
pub fn mul_div_ceil(amount: u64, numerator: u64, denominator: u64) -> Result<u64> {
    if denominator == 0 {
        return err!(VaultError::DivisionByZero);
    }
    let product = (amount as u128)
        .checked_mul(numerator as u128)
        .ok_or(VaultError::MathOverflow)?;
    let result = product
        .checked_add(denominator as u128 - 1)
        .ok_or(VaultError::MathOverflow)?
        / (denominator as u128);
    u64::try_from(result).map_err(|_| error!(VaultError::MathOverflow))
}
