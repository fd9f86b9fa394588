use thiserror::Error;
use tollgate_fees::FeeConfigError;
use tollgate_types::Amount;

/// Errors that can occur while mutating the token ledger.
///
/// Every failure is a synchronous rejection of the triggering call and
/// leaves all ledger and controller state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("the null address cannot take part in this operation")]
    InvalidAddress,

    #[error("insufficient balance: holding {balance}, debit requires {required}")]
    InsufficientBalance { balance: Amount, required: Amount },

    #[error("allowance exceeded: approved {allowance}, spend requires {required}")]
    AllowanceExceeded { allowance: Amount, required: Amount },

    #[error("caller is not the ledger owner")]
    Unauthorized,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] FeeConfigError),
}
