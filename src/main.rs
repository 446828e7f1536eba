//! Vault Index - Binary Entry Point
//!
//! Walks through a short session against the in-memory kernel.
//! Set `RUST_LOG=debug` to see index-level logging.

use tracing_subscriber::EnvFilter;
use vault_index::services::RegistrationRequest;
use vault_index::types::money::{from_amount, units};
use vault_index::types::{AccountType, TransactionKind};
use vault_index::{Bank, BankConfig, BankResult};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("===========================================");
    println!("  Vault Index - Banking Index Kernel");
    println!("===========================================");
    println!();

    if let Err(err) = run() {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> BankResult<()> {
    let mut bank = Bank::new(BankConfig::new().default_overdraft(units(50)));

    let request = RegistrationRequest::new("johndoe", "SecurePass123!", "john.doe@example.com")
        .name("John", "Doe");
    bank.register_with(request)?;
    let user = bank.authenticate("johndoe", "SecurePass123!")?;
    println!("Authenticated {} ({})", user.username, user.role);

    let customer = bank.accounts().customers().next().map(|c| c.customer_id.clone());
    let owner = customer.as_deref().unwrap_or("walk-in");

    let checking = bank.create_account(owner, AccountType::Checking, units(25_000))?.account_number.clone();
    let savings = bank.create_account(owner, AccountType::Savings, units(1_000))?.account_number.clone();
    let abroad = bank.create_account("partner", AccountType::Business, 0)?.account_number.clone();

    bank.transfer(&checking, &savings, units(12_000))?;
    bank.transfer_with_kind(&checking, &abroad, units(800), TransactionKind::International)?;
    bank.transfer(&savings, &abroad, units(150))?;

    println!();
    println!("Accounts of {owner}:");
    for account in bank.accounts_for_customer(owner) {
        println!("  {} {:<8} {:>12}", account.account_number, account.account_type, from_amount(account.balance));
    }

    println!();
    println!("Shortest transfer paths from {checking}:");
    for (account, distance) in bank.shortest_paths_from(&checking).reachable() {
        println!("  {account} -> {}", from_amount(distance));
    }

    println!();
    println!("Review queue:");
    while let Ok(tx) = bank.next_for_review() {
        println!("  {} {:>12} {}", tx.transaction_id, from_amount(tx.amount), tx.kind);
    }

    println!();
    println!("Suspicious: {}", bank.suspicious_transactions().len());
    Ok(())
}
