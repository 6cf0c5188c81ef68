//! Token-Ledger CLI Application
//!
//! A command-line interface for driving a fixed-supply token ledger.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use token_ledger::cli::commands::{
    cmd_allowance, cmd_approve, cmd_balance, cmd_derive, cmd_export, cmd_history,
    cmd_import, cmd_info, cmd_init, cmd_transfer, cmd_transfer_from,
};
use token_ledger::cli::AppState;
use token_ledger::ledger::Address;

#[derive(Parser)]
#[command(name = "ledger")]
#[command(version = "0.1.0")]
#[command(about = "A fixed-supply ERC-20 style token ledger", long_about = None)]
struct Cli {
    /// Data directory for ledger storage
    #[arg(short, long, default_value = ".ledger_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger with the full supply credited to the creator
    Init {
        /// Creator address (0x-prefixed hex)
        #[arg(short, long)]
        creator: Address,

        /// Reinitialize even if a ledger already exists
        #[arg(long)]
        force: bool,
    },

    /// Display ledger information
    Info,

    /// Show the balance of an address
    Balance {
        /// Account address
        #[arg(short, long)]
        address: Address,
    },

    /// Show the remaining allowance of a spender
    Allowance {
        /// Owner address
        #[arg(short, long)]
        owner: Address,

        /// Spender address
        #[arg(short, long)]
        spender: Address,
    },

    /// Transfer tokens to an address
    Transfer {
        /// Sender address
        #[arg(short, long)]
        from: Address,

        /// Recipient address
        #[arg(short, long)]
        to: Address,

        /// Amount in smallest units
        #[arg(short, long)]
        amount: u128,
    },

    /// Approve a spender for delegated transfers
    Approve {
        /// Owner address
        #[arg(short, long)]
        owner: Address,

        /// Spender address
        #[arg(short, long)]
        spender: Address,

        /// Allowance in smallest units (overwrites any previous value)
        #[arg(short, long)]
        amount: u128,
    },

    /// Transfer tokens out of an owner's balance using an allowance
    TransferFrom {
        /// Spender address (must hold an allowance)
        #[arg(short, long)]
        spender: Address,

        /// Owner address the tokens move out of
        #[arg(short, long)]
        owner: Address,

        /// Recipient address
        #[arg(short, long)]
        to: Address,

        /// Amount in smallest units
        #[arg(short, long)]
        amount: u128,
    },

    /// Show recent Transfer/Approval events
    History {
        /// Number of events to show
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Derive a demo address from a label
    Derive {
        /// Human-readable label
        label: String,
    },

    /// Export the ledger snapshot to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import a ledger snapshot from a file
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { creator, force } => cmd_init(&cli.data_dir, creator, force)?,
        Commands::Info => {
            let state = AppState::open(cli.data_dir)?;
            cmd_info(&state)?;
        }
        Commands::Balance { address } => {
            let state = AppState::open(cli.data_dir)?;
            cmd_balance(&state, address)?;
        }
        Commands::Allowance { owner, spender } => {
            let state = AppState::open(cli.data_dir)?;
            cmd_allowance(&state, owner, spender)?;
        }
        Commands::Transfer { from, to, amount } => {
            let mut state = AppState::open(cli.data_dir)?;
            cmd_transfer(&mut state, from, to, amount)?;
        }
        Commands::Approve {
            owner,
            spender,
            amount,
        } => {
            let mut state = AppState::open(cli.data_dir)?;
            cmd_approve(&mut state, owner, spender, amount)?;
        }
        Commands::TransferFrom {
            spender,
            owner,
            to,
            amount,
        } => {
            let mut state = AppState::open(cli.data_dir)?;
            cmd_transfer_from(&mut state, spender, owner, to, amount)?;
        }
        Commands::History { count } => {
            let state = AppState::open(cli.data_dir)?;
            cmd_history(&state, count)?;
        }
        Commands::Derive { label } => cmd_derive(&label)?,
        Commands::Export { output } => {
            let state = AppState::open(cli.data_dir)?;
            cmd_export(&state, &output)?;
        }
        Commands::Import { input } => cmd_import(&cli.data_dir, &input)?,
    }

    Ok(())
}
