//! Sample records the service starts with unless seeding is turned off.

use crate::{Customer, CustomerId, Transaction, TransactionId};

const CUSTOMERS: &[(i32, &str)] = &[(1, "Michael"), (2, "Tracy"), (3, "Lucy")];

// (id, amount, customer id)
const TRANSACTIONS: &[(i32, &str, i32)] = &[
    (1, "10", 1),
    (2, "15", 1),
    (3, "42", 1),
    (4, "61", 2),
    (5, "21", 2),
    (6, "5", 2),
    (7, "51", 3),
    (8, "3", 3),
];

pub fn customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|&(id, name)| Customer {
            id: CustomerId::new(id),
            name: name.to_string(),
        })
        .collect()
}

pub fn transactions() -> Vec<Transaction> {
    TRANSACTIONS
        .iter()
        .map(|&(id, amount, customer_id)| Transaction {
            id: TransactionId::new(id),
            amount: amount.to_string(),
            customer_id: CustomerId::new(customer_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_positions() {
        for (i, c) in customers().iter().enumerate() {
            assert_eq!(c.id.get() as usize, i + 1);
        }
        for (i, t) in transactions().iter().enumerate() {
            assert_eq!(t.id.get() as usize, i + 1);
        }
    }

    #[test]
    fn every_sample_transaction_has_a_sample_customer() {
        let ids: Vec<CustomerId> = customers().into_iter().map(|c| c.id).collect();
        assert!(transactions().iter().all(|t| ids.contains(&t.customer_id)));
    }
}
