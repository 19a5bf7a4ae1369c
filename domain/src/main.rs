use std::env;
use std::process;

use domain::adapters::memory_repo::InMemoryStore;
use serde::Serialize;
use domain::service::LedgerService;
use domain::{CustomerId, NewCustomer, NewTransaction};

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  domain customers\n  domain transactions\n  domain add-customer <name>\n  domain add-transaction <amount> <customer-id>\n\nFlags:\n  --json  print records as JSON instead of tab-separated text\n\nNotes:\n  - This demo CLI uses a seeded in-memory store; data is not persisted across runs.",
        domain::about()
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

fn run() -> Result<(), String> {
    // skip program name; `--json` may appear anywhere
    let (flags, rest): (Vec<String>, Vec<String>) =
        env::args().skip(1).partition(|a| a == "--json");
    let json = !flags.is_empty();
    let mut args = rest.into_iter();

    let Some(cmd) = args.next() else {
        print_usage();
        return Ok(());
    };

    let svc = LedgerService::new(InMemoryStore::seeded());

    match cmd.as_str() {
        "customers" => {
            let customers = svc.customers().map_err(|e| e.to_string())?;
            if json {
                return print_json(&customers);
            }
            for customer in customers {
                let amounts: Vec<String> = svc
                    .transactions_of(&customer)
                    .map_err(|e| e.to_string())?
                    .into_iter()
                    .map(|t| t.amount)
                    .collect();
                println!(
                    "{}\t{}\t[{}]",
                    customer.id,
                    customer.name,
                    amounts.join(", ")
                );
            }
            Ok(())
        }
        "transactions" => {
            let transactions = svc.transactions().map_err(|e| e.to_string())?;
            if json {
                return print_json(&transactions);
            }
            for transaction in transactions {
                let owner = svc
                    .customer_of(&transaction)
                    .map_err(|e| e.to_string())?
                    .map(|c| c.name)
                    .unwrap_or_else(|| "-".into());
                println!("{}\t{}\t{}", transaction.id, transaction.amount, owner);
            }
            Ok(())
        }
        "add-customer" => {
            let Some(name) = args.next() else {
                return Err("missing <name> for add-customer".into());
            };
            match svc.add_customer(NewCustomer { name }) {
                Ok(c) if json => print_json(&c),
                Ok(c) => {
                    println!("added customer: {} {}", c.id, c.name);
                    Ok(())
                }
                Err(e) => Err(format!("add-customer failed: {}", e)),
            }
        }
        "add-transaction" => {
            let (Some(amount), Some(customer)) = (args.next(), args.next()) else {
                return Err("add-transaction needs <amount> <customer-id>".into());
            };
            let customer_id = customer
                .parse::<i32>()
                .map_err(|_| format!("invalid customer id: {}", customer))?;
            let input = NewTransaction {
                amount,
                customer_id: CustomerId::new(customer_id),
            };
            match svc.add_transaction(input) {
                Ok(t) if json => print_json(&t),
                Ok(t) => {
                    println!(
                        "added transaction: {} amount={} customer={}",
                        t.id, t.amount, t.customer_id
                    );
                    Ok(())
                }
                Err(e) => Err(format!("add-transaction failed: {}", e)),
            }
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}
