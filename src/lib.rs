//! Token-Ledger: a fixed-supply ERC-20 style token ledger in Rust
//!
//! This crate provides the accounting core of a fungible token:
//! - Per-address balances with conservation of a fixed total supply
//! - Allowances for delegated transfers (approve / transfer_from)
//! - Transfer and Approval notifications with a bounded event history
//! - JSON snapshot persistence
//! - A CLI front end for driving the ledger from the shell
//!
//! # Example
//!
//! ```rust
//! use token_ledger::{Address, TokenLedger};
//!
//! let creator = Address::derive("creator");
//! let recipient = Address::derive("recipient");
//! let exchange = Address::derive("exchange");
//!
//! let mut ledger = TokenLedger::new(creator).unwrap();
//!
//! // Direct transfer
//! ledger.transfer(creator, recipient, 1000).unwrap();
//! assert_eq!(ledger.balance_of(recipient), 1000);
//!
//! // Delegated transfer
//! ledger.approve(creator, exchange, 500).unwrap();
//! ledger.transfer_from(exchange, creator, recipient, 500).unwrap();
//! assert_eq!(ledger.allowance(creator, exchange), 0);
//! ```

pub mod cli;
pub mod ledger;
pub mod storage;

// Re-export commonly used types
pub use ledger::{
    Address, AddressError, ApprovalEvent, LedgerError, LedgerEvent, TokenLedger,
    TokenMetadata, TransferEvent, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL, TOTAL_SUPPLY,
};
pub use storage::{Storage, StorageConfig, StorageError};
