use crate::{
    CoreError, Customer, CustomerId, CustomerRepository, NewCustomer, NewTransaction,
    Transaction, TransactionId, TransactionRepository,
};

/// Application service behind every query and mutation.
///
/// It is generic over a repository that stores both record kinds. Lookups
/// and relationship traversals are recomputed on every call; nothing is
/// cached between requests.
pub struct LedgerService<R: CustomerRepository + TransactionRepository> {
    repo: R,
}

impl<R: CustomerRepository + TransactionRepository> LedgerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Look up a transaction; `None` when no record has that id.
    pub fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>, CoreError> {
        self.repo.get_transaction(id)
    }

    /// All transactions in insertion order.
    pub fn transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        self.repo.list_transactions()
    }

    /// Look up a customer; `None` when no record has that id.
    pub fn customer(&self, id: CustomerId) -> Result<Option<Customer>, CoreError> {
        self.repo.get_customer(id)
    }

    /// All customers in insertion order.
    pub fn customers(&self) -> Result<Vec<Customer>, CoreError> {
        self.repo.list_customers()
    }

    /// The customer a transaction points at, if one exists.
    pub fn customer_of(&self, transaction: &Transaction) -> Result<Option<Customer>, CoreError> {
        self.repo.get_customer(transaction.customer_id)
    }

    /// Transactions referencing this customer, in insertion order.
    pub fn transactions_of(&self, customer: &Customer) -> Result<Vec<Transaction>, CoreError> {
        self.repo.list_transactions_by_customer(customer.id)
    }

    /// Record a new transaction. The customer id is not checked.
    pub fn add_transaction(&self, input: NewTransaction) -> Result<Transaction, CoreError> {
        self.repo.append_transaction(input)
    }

    pub fn update_transaction(
        &self,
        id: TransactionId,
        amount: String,
    ) -> Result<Transaction, CoreError> {
        self.repo.update_transaction_amount(id, amount)
    }

    pub fn add_customer(&self, input: NewCustomer) -> Result<Customer, CoreError> {
        self.repo.append_customer(input)
    }

    pub fn update_customer(&self, id: CustomerId, name: String) -> Result<Customer, CoreError> {
        self.repo.update_customer_name(id, name)
    }
}
