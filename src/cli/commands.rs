//! CLI commands for the token ledger
//!
//! Implements all command handlers for the CLI interface. Each mutating
//! command loads the snapshot, applies one ledger operation, and saves.
//! Ledger rejections are reported to the user, not propagated as errors.

use crate::ledger::{Address, LedgerEvent, TokenLedger};
use crate::storage::{Storage, StorageConfig};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub ledger: TokenLedger,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Open an existing ledger snapshot
    pub fn open(data_dir: PathBuf) -> CliResult<Self> {
        let storage_config = StorageConfig {
            data_dir: data_dir.clone(),
            ..Default::default()
        };
        let storage = Storage::new(storage_config)?;

        if !storage.exists() {
            return Err(format!(
                "No ledger found in {:?}. Run `ledger init` first.",
                data_dir
            )
            .into());
        }

        let ledger = storage.load()?;
        Ok(Self {
            ledger,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.ledger)?;
        Ok(())
    }
}

/// Initialize a new ledger with the full supply credited to the creator
pub fn cmd_init(data_dir: &Path, creator: Address, force: bool) -> CliResult<()> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    let storage = Storage::new(storage_config)?;

    if storage.exists() {
        if !force {
            println!("⚠️  Ledger already exists at {:?}", data_dir);
            println!("   Use --force to reinitialize (this will delete existing data)");
            return Ok(());
        }
        storage.delete()?;
    }

    let ledger = match TokenLedger::new(creator) {
        Ok(ledger) => ledger,
        Err(e) => {
            println!("❌ Initialization rejected: {}", e);
            return Ok(());
        }
    };
    storage.save(&ledger)?;

    println!("✅ Ledger initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   🪙 Token: {} ({})", ledger.name(), ledger.symbol());
    println!("   📏 Decimals: {}", ledger.decimals());
    println!(
        "   💰 Supply: {} units, credited to {}",
        ledger.total_supply(),
        creator
    );

    Ok(())
}

/// Display ledger info
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    let ledger = &state.ledger;

    println!("🪙 Ledger Info");
    println!("   ├─ Name: {}", ledger.name());
    println!("   ├─ Symbol: {}", ledger.symbol());
    println!("   ├─ Decimals: {}", ledger.decimals());
    println!("   ├─ Total supply: {} units", ledger.total_supply());
    println!("   ├─ Holders: {}", ledger.holder_count());
    println!("   └─ Recorded events: {}", ledger.events().len());

    Ok(())
}

/// Show the balance of an address
pub fn cmd_balance(state: &AppState, address: Address) -> CliResult<()> {
    let balance = state.ledger.balance_of(address);

    println!("💰 Balance for {}", address);
    println!("   {} units", balance);

    Ok(())
}

/// Show the remaining allowance of a spender
pub fn cmd_allowance(state: &AppState, owner: Address, spender: Address) -> CliResult<()> {
    let allowance = state.ledger.allowance(owner, spender);

    println!("🔓 Allowance");
    println!("   Owner:   {}", owner);
    println!("   Spender: {}", spender);
    println!("   Remaining: {} units", allowance);

    Ok(())
}

/// Transfer tokens between addresses
pub fn cmd_transfer(
    state: &mut AppState,
    from: Address,
    to: Address,
    amount: u128,
) -> CliResult<()> {
    match state.ledger.transfer(from, to, amount) {
        Ok(event) => {
            state.save()?;
            println!("📤 Transfer complete");
            println!("   From: {}", event.from);
            println!("   To: {}", event.to);
            println!("   Amount: {} units", event.value);
            println!("   Sender balance: {} units", state.ledger.balance_of(from));
        }
        Err(e) => println!("❌ Transfer rejected: {}", e),
    }

    Ok(())
}

/// Approve a spender for delegated transfers
pub fn cmd_approve(
    state: &mut AppState,
    owner: Address,
    spender: Address,
    amount: u128,
) -> CliResult<()> {
    match state.ledger.approve(owner, spender, amount) {
        Ok(event) => {
            state.save()?;
            println!("🔏 Approval set");
            println!("   Owner: {}", event.owner);
            println!("   Spender: {}", event.spender);
            println!("   Allowance: {} units", event.value);
        }
        Err(e) => println!("❌ Approval rejected: {}", e),
    }

    Ok(())
}

/// Delegated transfer out of an owner's balance
pub fn cmd_transfer_from(
    state: &mut AppState,
    spender: Address,
    owner: Address,
    to: Address,
    amount: u128,
) -> CliResult<()> {
    match state.ledger.transfer_from(spender, owner, to, amount) {
        Ok(event) => {
            state.save()?;
            println!("📤 Delegated transfer complete");
            println!("   From: {}", event.from);
            println!("   To: {}", event.to);
            println!("   Amount: {} units", event.value);
            println!(
                "   Remaining allowance: {} units",
                state.ledger.allowance(owner, spender)
            );
        }
        Err(e) => println!("❌ Delegated transfer rejected: {}", e),
    }

    Ok(())
}

/// Show recent ledger events
pub fn cmd_history(state: &AppState, count: usize) -> CliResult<()> {
    let events = state.ledger.events();

    if events.is_empty() {
        println!("📭 No events recorded yet.");
        return Ok(());
    }

    println!("📜 Recent events:");
    for event in events.iter().rev().take(count) {
        match event {
            LedgerEvent::Transfer(t) => println!(
                "   Transfer | {} -> {} | {} units | {}",
                t.from,
                t.to,
                t.value,
                t.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
            LedgerEvent::Approval(a) => println!(
                "   Approval | {} ~> {} | {} units | {}",
                a.owner,
                a.spender,
                a.value,
                a.timestamp.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }

    Ok(())
}

/// Derive a demo address from a label
pub fn cmd_derive(label: &str) -> CliResult<()> {
    let address = Address::derive(label);

    println!("📍 Address for label '{}':", label);
    println!("   {}", address);

    Ok(())
}

/// Export the ledger snapshot to a file
pub fn cmd_export(state: &AppState, path: &Path) -> CliResult<()> {
    crate::storage::save_to_file(&state.ledger, path)?;
    println!("📦 Ledger exported to {:?}", path);
    Ok(())
}

/// Import a ledger snapshot from a file
pub fn cmd_import(data_dir: &Path, path: &Path) -> CliResult<()> {
    let ledger = crate::storage::load_from_file(path)?;

    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    let storage = Storage::new(storage_config)?;
    storage.save(&ledger)?;

    println!("📥 Ledger imported from {:?}", path);
    println!("   Token: {} ({})", ledger.name(), ledger.symbol());
    println!("   Holders: {}", ledger.holder_count());

    Ok(())
}
