//! Domain library for the customer/transaction ledger.
//!
//! This crate holds the record types, repository ports (traits), the
//! application service and error definitions. Records serialize with
//! `serde` in the same camelCase shape the GraphQL API exposes; keep HTTP
//! and GraphQL concerns out of this crate.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifier of a customer. Assigned as `count + 1` at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i32);

impl CustomerId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a transaction. Assigned as `count + 1` at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i32);

impl TransactionId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer owning zero or more transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

/// A transaction made by a customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    /// Kept as the caller supplied it; no numeric parsing happens anywhere.
    pub amount: String,
    /// Foreign key into the customers. Never checked against existing records.
    pub customer_id: CustomerId,
}

/// Input data for creating a customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
}

/// Input data for creating a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: String,
    pub customer_id: CustomerId,
}

/// Repository port for customers.
pub trait CustomerRepository: Send + Sync {
    fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, CoreError>;
    /// All customers in insertion order.
    fn list_customers(&self) -> Result<Vec<Customer>, CoreError>;
    /// Append a customer, assigning `count + 1` as its id.
    fn append_customer(&self, input: NewCustomer) -> Result<Customer, CoreError>;
    /// Replace the name of an existing customer in place.
    fn update_customer_name(&self, id: CustomerId, name: String)
        -> Result<Customer, CoreError>;
}

/// Repository port for transactions.
pub trait TransactionRepository: Send + Sync {
    fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, CoreError>;
    /// All transactions in insertion order.
    fn list_transactions(&self) -> Result<Vec<Transaction>, CoreError>;
    /// Transactions whose `customer_id` matches, in insertion order.
    fn list_transactions_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, CoreError>;
    /// Append a transaction, assigning `count + 1` as its id.
    fn append_transaction(&self, input: NewTransaction) -> Result<Transaction, CoreError>;
    /// Replace the amount of an existing transaction in place.
    fn update_transaction_amount(
        &self,
        id: TransactionId,
        amount: String,
    ) -> Result<Transaction, CoreError>;
}

/// Core domain errors (no external error crates to keep deps at zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    CustomerNotFound(CustomerId),
    TransactionNotFound(TransactionId),
    Repository(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::CustomerNotFound(_) | CoreError::TransactionNotFound(_)
        )
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::CustomerNotFound(id) => write!(f, "Customer with id {} not found", id),
            CoreError::TransactionNotFound(id) => {
                write!(f, "Transaction with id {} not found", id)
            }
            CoreError::Repository(msg) => write!(f, "repository error: {}", msg),
        }
    }
}

impl Error for CoreError {}

/// Return a short about/version line for the binary to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - customer/transaction ledger", pkg, ver)
}

pub mod adapters;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serialize_with_plain_ids_and_camel_case_keys() {
        let tx = Transaction {
            id: TransactionId::new(3),
            amount: "42".into(),
            customer_id: CustomerId::new(1),
        };
        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            serde_json::json!({"id": 3, "amount": "42", "customerId": 1})
        );

        let back: Customer = serde_json::from_str(r#"{"id": 2, "name": "Tracy"}"#).unwrap();
        assert_eq!(back.id, CustomerId::new(2));
        assert_eq!(back.name, "Tracy");
    }

    #[test]
    fn not_found_messages_name_the_record() {
        let err = CoreError::CustomerNotFound(CustomerId::new(7));
        assert_eq!(err.to_string(), "Customer with id 7 not found");
        assert!(err.is_not_found());

        let err = CoreError::TransactionNotFound(TransactionId::new(42));
        assert_eq!(err.to_string(), "Transaction with id 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn repository_error_is_not_a_not_found() {
        let err = CoreError::Repository("mutex poisoned".into());
        assert_eq!(err.to_string(), "repository error: mutex poisoned");
        assert!(!err.is_not_found());
    }

    #[test]
    fn ids_round_trip_through_newtypes() {
        assert_eq!(CustomerId::new(3).get(), 3);
        assert_eq!(TransactionId::new(9).to_string(), "9");
    }
}
