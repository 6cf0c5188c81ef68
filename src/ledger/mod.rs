//! ERC-20 style fungible token ledger
//!
//! Tracks ownership of a fixed-supply divisible asset across addresses:
//! - Balances per address (sum always equals the total supply)
//! - Allowances for delegated transfers
//! - Transfer, approve, and transfer_from operations
//! - Transfer/Approval notifications for observers
//!
//! # Example
//!
//! ```rust
//! use token_ledger::ledger::{Address, TokenLedger};
//!
//! let creator = Address::derive("creator");
//! let recipient = Address::derive("recipient");
//!
//! let mut ledger = TokenLedger::new(creator).unwrap();
//! ledger.transfer(creator, recipient, 1000).unwrap();
//!
//! assert_eq!(ledger.balance_of(recipient), 1000);
//! ```

pub mod address;
pub mod events;
pub mod ledger;

pub use address::{Address, AddressError};
pub use events::{ApprovalEvent, LedgerEvent, TransferEvent, EVENT_HISTORY_LIMIT};
pub use ledger::{
    LedgerError, TokenLedger, TokenMetadata, TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL,
    TOTAL_SUPPLY,
};
