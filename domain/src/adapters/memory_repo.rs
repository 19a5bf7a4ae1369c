use std::sync::{Mutex, MutexGuard};

use crate::seed;
use crate::{
    CoreError, Customer, CustomerId, CustomerRepository, NewCustomer, NewTransaction,
    Transaction, TransactionId, TransactionRepository,
};

/// In-memory store holding both record collections in insertion order.
///
/// Each port call takes one lock for its whole scan-and-mutate, so single
/// operations are atomic. Nothing spans more than one call.
pub struct InMemoryStore {
    customers: Mutex<Vec<Customer>>,
    transactions: Mutex<Vec<Transaction>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new(), Vec::new())
    }

    /// Store pre-populated with the sample customers and transactions.
    pub fn seeded() -> Self {
        Self::with_records(seed::customers(), seed::transactions())
    }

    pub fn with_records(customers: Vec<Customer>, transactions: Vec<Transaction>) -> Self {
        Self {
            customers: Mutex::new(customers),
            transactions: Mutex::new(transactions),
        }
    }

    fn customers(&self) -> Result<MutexGuard<'_, Vec<Customer>>, CoreError> {
        self.customers
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))
    }

    fn transactions(&self) -> Result<MutexGuard<'_, Vec<Transaction>>, CoreError> {
        self.transactions
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// Ids are `len + 1`; unique only because nothing is ever removed.
fn next_id(len: usize) -> Result<i32, CoreError> {
    len.checked_add(1)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| CoreError::Repository("id space exhausted".into()))
}

impl CustomerRepository for InMemoryStore {
    fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, CoreError> {
        let customers = self.customers()?;
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }

    fn list_customers(&self) -> Result<Vec<Customer>, CoreError> {
        Ok(self.customers()?.clone())
    }

    fn append_customer(&self, input: NewCustomer) -> Result<Customer, CoreError> {
        let mut customers = self.customers()?;
        let customer = Customer {
            id: CustomerId::new(next_id(customers.len())?),
            name: input.name,
        };
        customers.push(customer.clone());
        Ok(customer)
    }

    fn update_customer_name(
        &self,
        id: CustomerId,
        name: String,
    ) -> Result<Customer, CoreError> {
        let mut customers = self.customers()?;
        match customers.iter_mut().find(|c| c.id == id) {
            Some(customer) => {
                customer.name = name;
                Ok(customer.clone())
            }
            None => Err(CoreError::CustomerNotFound(id)),
        }
    }
}

impl TransactionRepository for InMemoryStore {
    fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, CoreError> {
        let transactions = self.transactions()?;
        Ok(transactions.iter().find(|t| t.id == id).cloned())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.transactions()?.clone())
    }

    fn list_transactions_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Transaction>, CoreError> {
        let transactions = self.transactions()?;
        Ok(transactions
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn append_transaction(&self, input: NewTransaction) -> Result<Transaction, CoreError> {
        let mut transactions = self.transactions()?;
        let transaction = Transaction {
            id: TransactionId::new(next_id(transactions.len())?),
            amount: input.amount,
            customer_id: input.customer_id,
        };
        transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn update_transaction_amount(
        &self,
        id: TransactionId,
        amount: String,
    ) -> Result<Transaction, CoreError> {
        let mut transactions = self.transactions()?;
        match transactions.iter_mut().find(|t| t.id == id) {
            Some(transaction) => {
                transaction.amount = amount;
                Ok(transaction.clone())
            }
            None => Err(CoreError::TransactionNotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tx(amount: &str, customer: i32) -> NewTransaction {
        NewTransaction {
            amount: amount.to_string(),
            customer_id: CustomerId::new(customer),
        }
    }

    #[test]
    fn append_assigns_len_plus_one() {
        let repo = InMemoryStore::new();
        let a = repo
            .append_customer(NewCustomer { name: "Ann".into() })
            .unwrap();
        let b = repo
            .append_customer(NewCustomer { name: "Bob".into() })
            .unwrap();
        assert_eq!(a.id, CustomerId::new(1));
        assert_eq!(b.id, CustomerId::new(2));

        let t = repo.append_transaction(new_tx("10", 1)).unwrap();
        assert_eq!(t.id, TransactionId::new(1));
    }

    #[test]
    fn seeded_ids_continue_after_sample_data() {
        let repo = InMemoryStore::seeded();
        let c = repo
            .append_customer(NewCustomer { name: "Alice".into() })
            .unwrap();
        assert_eq!(c.id, CustomerId::new(4));
        let t = repo.append_transaction(new_tx("7", 4)).unwrap();
        assert_eq!(t.id, TransactionId::new(9));
    }

    #[test]
    fn get_returns_first_match_or_none() {
        let repo = InMemoryStore::seeded();
        let got = repo.get_customer(CustomerId::new(2)).unwrap().unwrap();
        assert_eq!(got.name, "Tracy");
        assert!(repo.get_customer(CustomerId::new(99)).unwrap().is_none());
        assert!(repo
            .get_transaction(TransactionId::new(0))
            .unwrap()
            .is_none());
    }

    #[test]
    fn list_by_customer_keeps_insertion_order() {
        let repo = InMemoryStore::new();
        repo.append_transaction(new_tx("1", 1)).unwrap();
        repo.append_transaction(new_tx("2", 2)).unwrap();
        repo.append_transaction(new_tx("3", 1)).unwrap();

        let ids: Vec<i32> = repo
            .list_transactions_by_customer(CustomerId::new(1))
            .unwrap()
            .into_iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn unknown_customer_id_is_accepted() {
        let repo = InMemoryStore::new();
        let t = repo.append_transaction(new_tx("5", 404)).unwrap();
        assert_eq!(t.customer_id, CustomerId::new(404));
        assert_eq!(repo.list_transactions().unwrap().len(), 1);
    }

    #[test]
    fn updates_mutate_in_place() {
        let repo = InMemoryStore::seeded();
        let t = repo
            .update_transaction_amount(TransactionId::new(3), "99".into())
            .unwrap();
        assert_eq!(t.amount, "99");
        let stored = repo
            .get_transaction(TransactionId::new(3))
            .unwrap()
            .unwrap();
        assert_eq!(stored.amount, "99");
        assert_eq!(repo.list_transactions().unwrap().len(), 8);

        let c = repo
            .update_customer_name(CustomerId::new(1), "Mike".into())
            .unwrap();
        assert_eq!(c.name, "Mike");
    }

    #[test]
    fn updates_report_missing_records() {
        let repo = InMemoryStore::new();
        let err = repo
            .update_customer_name(CustomerId::new(1), "x".into())
            .unwrap_err();
        assert_eq!(err, CoreError::CustomerNotFound(CustomerId::new(1)));
        let err = repo
            .update_transaction_amount(TransactionId::new(5), "1".into())
            .unwrap_err();
        assert_eq!(err, CoreError::TransactionNotFound(TransactionId::new(5)));
    }

    #[test]
    fn next_id_guards_overflow() {
        assert_eq!(next_id(0).unwrap(), 1);
        assert!(matches!(
            next_id(i32::MAX as usize),
            Err(CoreError::Repository(_))
        ));
    }
}
