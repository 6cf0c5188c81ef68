//! The token ledger state machine
//!
//! Owns all mutable state (balances, allowances, event history) and exposes
//! the ERC-20 operation surface: transfer, approve, transfer_from, and the
//! view accessors. Every mutating operation is check-then-write: all
//! preconditions are verified before any state is touched, so a failed call
//! leaves the ledger exactly as it found it.

use crate::ledger::address::Address;
use crate::ledger::events::{
    ApprovalEvent, LedgerEvent, TransferEvent, EVENT_HISTORY_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Token name of the fixed instance
pub const TOKEN_NAME: &str = "DApp Token";
/// Token symbol of the fixed instance
pub const TOKEN_SYMBOL: &str = "DAPP";
/// Decimal precision of the fixed instance
pub const TOKEN_DECIMALS: u8 = 18;
/// Total supply of the fixed instance, in smallest units (1,000,000 tokens)
pub const TOTAL_SUPPLY: u128 = 1_000_000 * 10u128.pow(TOKEN_DECIMALS as u32);

/// Ledger operation and construction errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid recipient: the zero address cannot receive tokens")]
    InvalidRecipient,
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid supply: must be greater than 0")]
    InvalidSupply,
    #[error("Invalid creator: the zero address cannot hold the supply")]
    InvalidCreator,
}

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name (e.g., "DApp Token")
    pub name: String,
    /// Token symbol (e.g., "DAPP")
    pub symbol: String,
    /// Decimal places (usually 18)
    pub decimals: u8,
    /// Total supply in smallest units (fixed at creation)
    pub total_supply: u128,
    /// Creator address, credited with the entire supply
    pub creator: Address,
}

impl TokenMetadata {
    /// Create new token metadata with validation
    pub fn new(
        name: String,
        symbol: String,
        decimals: u8,
        total_supply: u128,
        creator: Address,
    ) -> Result<Self, LedgerError> {
        let metadata = Self {
            name,
            symbol,
            decimals,
            total_supply,
            creator,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Validate the metadata fields
    ///
    /// The fields are public, so a ledger constructor must re-check them
    /// even for metadata built elsewhere.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.is_empty() || self.name.len() > 50 {
            return Err(LedgerError::InvalidName);
        }

        if self.symbol.is_empty() || self.symbol.len() > 10 {
            return Err(LedgerError::InvalidSymbol);
        }

        if self.decimals > 18 {
            return Err(LedgerError::InvalidDecimals);
        }

        if self.total_supply == 0 {
            return Err(LedgerError::InvalidSupply);
        }

        if self.creator.is_zero() {
            return Err(LedgerError::InvalidCreator);
        }

        Ok(())
    }
}

/// A fixed-supply fungible token ledger
///
/// The ledger is a plain value: mutating operations take `&mut self`, so a
/// host that needs concurrent access must serialize all three mutating
/// operations behind a single lock covering the whole ledger (delegated
/// transfers touch balances and allowances together).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenLedger {
    /// Token metadata
    pub metadata: TokenMetadata,
    /// Balances: address -> amount in smallest units
    balances: HashMap<Address, u128>,
    /// Allowances: owner -> (spender -> remaining amount)
    allowances: HashMap<Address, HashMap<Address, u128>>,
    /// Recent events, oldest first
    events: Vec<LedgerEvent>,
}

impl TokenLedger {
    /// Create the fixed instance: 1,000,000 DAPP (18 decimals), all of it
    /// credited to the creator. No event is emitted on construction.
    ///
    /// Fails with `InvalidCreator` if the creator is the zero address:
    /// the supply would be unreachable forever.
    pub fn new(creator: Address) -> Result<Self, LedgerError> {
        Self::with_metadata(TokenMetadata {
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: TOKEN_DECIMALS,
            total_supply: TOTAL_SUPPLY,
            creator,
        })
    }

    /// Create a ledger from explicit metadata, crediting the entire supply
    /// to the metadata's creator. The metadata is validated first.
    pub fn with_metadata(metadata: TokenMetadata) -> Result<Self, LedgerError> {
        metadata.validate()?;

        let mut balances = HashMap::new();
        balances.insert(metadata.creator, metadata.total_supply);

        log::info!(
            "Ledger created: {} ({}), supply {} credited to {}",
            metadata.name,
            metadata.symbol,
            metadata.total_supply,
            metadata.creator
        );

        Ok(Self {
            metadata,
            balances,
            allowances: HashMap::new(),
            events: Vec::new(),
        })
    }

    // =========================================================================
    // View accessors
    // =========================================================================

    /// Get token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Get token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Get decimal places
    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    /// Get total supply in smallest units
    pub fn total_supply(&self) -> u128 {
        self.metadata.total_supply
    }

    /// Get balance of an address (zero for unknown addresses)
    pub fn balance_of(&self, address: Address) -> u128 {
        self.balances.get(&address).copied().unwrap_or(0)
    }

    /// Get remaining allowance for a spender (zero if never approved)
    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    /// Get all holders with non-zero balances
    pub fn holders(&self) -> Vec<(Address, u128)> {
        self.balances
            .iter()
            .filter(|(_, &balance)| balance > 0)
            .map(|(&address, &balance)| (address, balance))
            .collect()
    }

    /// Get holder count
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|&&balance| balance > 0).count()
    }

    /// Recent events, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    // =========================================================================
    // Mutating operations
    // =========================================================================

    /// Transfer tokens from `sender` to `recipient`
    ///
    /// A transfer to the sender itself and a transfer of zero tokens are
    /// both valid: they leave balances unchanged but still emit the event.
    pub fn transfer(
        &mut self,
        sender: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        if recipient.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }

        let sender_balance = self.balance_of(sender);
        if sender_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: sender_balance,
                need: amount,
            });
        }

        // All checks passed; apply both sides
        *self.balances.entry(sender).or_insert(0) -= amount;
        *self.balances.entry(recipient).or_insert(0) += amount;

        log::debug!("transfer {} -> {}: {}", sender, recipient, amount);

        let event = TransferEvent::new(sender, recipient, amount);
        self.record(LedgerEvent::Transfer(event.clone()));
        Ok(event)
    }

    /// Set `spender`'s allowance over `owner`'s tokens to exactly `amount`
    ///
    /// This is an absolute overwrite, never additive; approving zero revokes.
    /// The spender address is not validated: approving the zero address is
    /// permitted, and the tokens only become unreachable because the
    /// transfer path rejects the zero address as a recipient.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: u128,
    ) -> Result<ApprovalEvent, LedgerError> {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);

        log::debug!("approve {} -> {}: {}", owner, spender, amount);

        let event = ApprovalEvent::new(owner, spender, amount);
        self.record(LedgerEvent::Approval(event.clone()));
        Ok(event)
    }

    /// Transfer tokens from `owner` to `recipient` on behalf of `spender`
    ///
    /// Requires a prior approval; consumes exactly `amount` of the
    /// spender's remaining allowance. Emits one Transfer event (the
    /// allowance change is not re-announced).
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<TransferEvent, LedgerError> {
        if recipient.is_zero() {
            return Err(LedgerError::InvalidRecipient);
        }

        let owner_balance = self.balance_of(owner);
        if owner_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: owner_balance,
                need: amount,
            });
        }

        let remaining = self.allowance(owner, spender);
        if remaining < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: remaining,
                need: amount,
            });
        }

        // All checks passed; move the balance and consume the allowance
        *self.balances.entry(owner).or_insert(0) -= amount;
        *self.balances.entry(recipient).or_insert(0) += amount;
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, remaining - amount);

        log::debug!(
            "transfer_from {} ({} via {}): {} -> {}",
            amount,
            owner,
            spender,
            owner,
            recipient
        );

        let event = TransferEvent::new(owner, recipient, amount);
        self.record(LedgerEvent::Transfer(event.clone()));
        Ok(event)
    }

    /// Append an event to the bounded history
    fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
        if self.events.len() > EVENT_HISTORY_LIMIT {
            self.events.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One whole token in smallest units
    const UNIT: u128 = 10u128.pow(18);

    fn creator() -> Address {
        Address::derive("deployer")
    }

    fn receiver() -> Address {
        Address::derive("receiver")
    }

    fn exchange() -> Address {
        Address::derive("exchange")
    }

    fn create_ledger() -> TokenLedger {
        TokenLedger::new(creator()).unwrap()
    }

    fn sum_of_balances(ledger: &TokenLedger) -> u128 {
        ledger.holders().iter().map(|(_, balance)| balance).sum()
    }

    #[test]
    fn test_creation() {
        let ledger = create_ledger();

        assert_eq!(ledger.name(), "DApp Token");
        assert_eq!(ledger.symbol(), "DAPP");
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.total_supply(), 1_000_000 * UNIT);
        assert_eq!(ledger.balance_of(creator()), 1_000_000 * UNIT);
        assert_eq!(ledger.holder_count(), 1);
        // No event is attributable to construction
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_metadata_validation() {
        let creator = creator();

        assert_eq!(
            TokenMetadata::new("".to_string(), "TST".to_string(), 18, 1000, creator),
            Err(LedgerError::InvalidName)
        );
        assert_eq!(
            TokenMetadata::new("Test".to_string(), "TOOLONGSYMBOL".to_string(), 18, 1000, creator),
            Err(LedgerError::InvalidSymbol)
        );
        assert_eq!(
            TokenMetadata::new("Test".to_string(), "TST".to_string(), 19, 1000, creator),
            Err(LedgerError::InvalidDecimals)
        );
        assert_eq!(
            TokenMetadata::new("Test".to_string(), "TST".to_string(), 18, 0, creator),
            Err(LedgerError::InvalidSupply)
        );
        assert_eq!(
            TokenMetadata::new("Test".to_string(), "TST".to_string(), 18, 1000, Address::ZERO),
            Err(LedgerError::InvalidCreator)
        );
    }

    #[test]
    fn test_new_rejects_zero_creator() {
        // The supply credited to the zero sentinel could never move again
        let result = TokenLedger::new(Address::ZERO);
        assert_eq!(result.unwrap_err(), LedgerError::InvalidCreator);
    }

    #[test]
    fn test_with_metadata_validates_struct_literals() {
        // Metadata built field-by-field must not bypass validation
        let metadata = TokenMetadata {
            name: String::new(),
            symbol: "TST".to_string(),
            decimals: 99,
            total_supply: 0,
            creator: Address::ZERO,
        };

        let result = TokenLedger::with_metadata(metadata);
        assert_eq!(result.unwrap_err(), LedgerError::InvalidName);
    }

    #[test]
    fn test_transfer() {
        let mut ledger = create_ledger();

        let event = ledger.transfer(creator(), receiver(), 100 * UNIT).unwrap();

        assert_eq!(event.from, creator());
        assert_eq!(event.to, receiver());
        assert_eq!(event.value, 100 * UNIT);
        assert_eq!(ledger.balance_of(creator()), 999_900 * UNIT);
        assert_eq!(ledger.balance_of(receiver()), 100 * UNIT);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = create_ledger();

        // More than the total supply
        let result = ledger.transfer(creator(), receiver(), 100_000_000 * UNIT);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                have: 1_000_000 * UNIT,
                need: 100_000_000 * UNIT,
            })
        );

        // A holder with no tokens at all
        let result = ledger.transfer(receiver(), creator(), 10 * UNIT);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                have: 0,
                need: 10 * UNIT,
            })
        );

        // Balances untouched, nothing emitted
        assert_eq!(ledger.balance_of(creator()), 1_000_000 * UNIT);
        assert_eq!(ledger.balance_of(receiver()), 0);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_transfer_to_zero_address_rejected() {
        let mut ledger = create_ledger();

        let result = ledger.transfer(creator(), Address::ZERO, 100 * UNIT);
        assert_eq!(result, Err(LedgerError::InvalidRecipient));
        assert_eq!(ledger.balance_of(creator()), 1_000_000 * UNIT);
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn test_self_transfer_succeeds_and_emits() {
        let mut ledger = create_ledger();

        let event = ledger.transfer(creator(), creator(), 100 * UNIT).unwrap();

        assert_eq!(event.from, creator());
        assert_eq!(event.to, creator());
        assert_eq!(ledger.balance_of(creator()), 1_000_000 * UNIT);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_zero_amount_transfer_succeeds_and_emits() {
        let mut ledger = create_ledger();

        let event = ledger.transfer(creator(), receiver(), 0).unwrap();

        assert_eq!(event.value, 0);
        assert_eq!(ledger.balance_of(receiver()), 0);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn test_approve_and_allowance() {
        let mut ledger = create_ledger();

        assert_eq!(ledger.allowance(creator(), exchange()), 0);

        let event = ledger.approve(creator(), exchange(), 100 * UNIT).unwrap();
        assert_eq!(event.owner, creator());
        assert_eq!(event.spender, exchange());
        assert_eq!(event.value, 100 * UNIT);
        assert_eq!(ledger.allowance(creator(), exchange()), 100 * UNIT);

        // Re-approving overwrites; it never accumulates
        ledger.approve(creator(), exchange(), 30 * UNIT).unwrap();
        assert_eq!(ledger.allowance(creator(), exchange()), 30 * UNIT);

        // Approving zero revokes
        ledger.approve(creator(), exchange(), 0).unwrap();
        assert_eq!(ledger.allowance(creator(), exchange()), 0);
    }

    #[test]
    fn test_approve_zero_spender_permitted() {
        let mut ledger = create_ledger();

        // The spender address is not validated; the tokens are merely
        // unreachable because the transfer path rejects the zero recipient.
        let event = ledger.approve(creator(), Address::ZERO, 100 * UNIT).unwrap();
        assert_eq!(event.spender, Address::ZERO);
        assert_eq!(ledger.allowance(creator(), Address::ZERO), 100 * UNIT);
    }

    #[test]
    fn test_transfer_from() {
        let mut ledger = create_ledger();

        ledger.approve(creator(), exchange(), 100 * UNIT).unwrap();
        let event = ledger
            .transfer_from(exchange(), creator(), receiver(), 100 * UNIT)
            .unwrap();

        // The event attributes the transfer to the owner, not the spender
        assert_eq!(event.from, creator());
        assert_eq!(event.to, receiver());
        assert_eq!(event.value, 100 * UNIT);

        assert_eq!(ledger.balance_of(creator()), 999_900 * UNIT);
        assert_eq!(ledger.balance_of(receiver()), 100 * UNIT);
        assert_eq!(ledger.allowance(creator(), exchange()), 0);
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let mut ledger = create_ledger();

        ledger.approve(creator(), exchange(), 100 * UNIT).unwrap();
        ledger
            .transfer_from(exchange(), creator(), receiver(), 100 * UNIT)
            .unwrap();

        // Allowance is exhausted; the next delegated transfer must fail
        // and leave every balance and the allowance untouched
        let result = ledger.transfer_from(exchange(), creator(), receiver(), 101 * UNIT);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientAllowance {
                have: 0,
                need: 101 * UNIT,
            })
        );

        assert_eq!(ledger.balance_of(creator()), 999_900 * UNIT);
        assert_eq!(ledger.balance_of(receiver()), 100 * UNIT);
        assert_eq!(ledger.allowance(creator(), exchange()), 0);
    }

    #[test]
    fn test_transfer_from_insufficient_balance() {
        let mut ledger = create_ledger();

        // Allowance exceeding the owner's entire balance
        ledger
            .approve(creator(), exchange(), 2_000_000 * UNIT)
            .unwrap();

        let result =
            ledger.transfer_from(exchange(), creator(), receiver(), 1_000_001 * UNIT);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                have: 1_000_000 * UNIT,
                need: 1_000_001 * UNIT,
            })
        );

        // Allowance is only consumed by successful transfers
        assert_eq!(ledger.allowance(creator(), exchange()), 2_000_000 * UNIT);
        assert_eq!(ledger.balance_of(creator()), 1_000_000 * UNIT);
    }

    #[test]
    fn test_transfer_from_to_zero_address_rejected() {
        let mut ledger = create_ledger();

        ledger.approve(creator(), exchange(), 100 * UNIT).unwrap();

        let result = ledger.transfer_from(exchange(), creator(), Address::ZERO, 100 * UNIT);
        assert_eq!(result, Err(LedgerError::InvalidRecipient));
        assert_eq!(ledger.allowance(creator(), exchange()), 100 * UNIT);
        assert_eq!(ledger.balance_of(creator()), 1_000_000 * UNIT);
    }

    #[test]
    fn test_supply_is_conserved() {
        let mut ledger = create_ledger();
        assert_eq!(sum_of_balances(&ledger), ledger.total_supply());

        // A mixed sequence of successes and rejections
        ledger.transfer(creator(), receiver(), 250 * UNIT).unwrap();
        assert_eq!(sum_of_balances(&ledger), ledger.total_supply());

        ledger.approve(creator(), exchange(), 500 * UNIT).unwrap();
        assert_eq!(sum_of_balances(&ledger), ledger.total_supply());

        ledger
            .transfer_from(exchange(), creator(), receiver(), 400 * UNIT)
            .unwrap();
        assert_eq!(sum_of_balances(&ledger), ledger.total_supply());

        let _ = ledger.transfer(receiver(), creator(), 10_000_000 * UNIT);
        let _ = ledger.transfer_from(exchange(), creator(), receiver(), 400 * UNIT);
        let _ = ledger.transfer(creator(), Address::ZERO, UNIT);
        assert_eq!(sum_of_balances(&ledger), ledger.total_supply());
    }

    #[test]
    fn test_one_event_per_successful_operation() {
        let mut ledger = create_ledger();

        ledger.transfer(creator(), receiver(), UNIT).unwrap();
        ledger.approve(creator(), exchange(), UNIT).unwrap();
        ledger
            .transfer_from(exchange(), creator(), receiver(), UNIT)
            .unwrap();
        let _ = ledger.transfer(creator(), Address::ZERO, UNIT);

        let events = ledger.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], LedgerEvent::Transfer(_)));
        assert!(matches!(events[1], LedgerEvent::Approval(_)));
        assert!(matches!(events[2], LedgerEvent::Transfer(_)));
    }

    #[test]
    fn test_event_history_is_bounded() {
        let mut ledger = create_ledger();

        for _ in 0..(EVENT_HISTORY_LIMIT + 10) {
            ledger.transfer(creator(), receiver(), 0).unwrap();
        }

        assert_eq!(ledger.events().len(), EVENT_HISTORY_LIMIT);
    }
}
