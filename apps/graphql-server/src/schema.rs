//! GraphQL schema: object types, the root query and the root mutation.
//!
//! Resolvers only talk to [`LedgerService`]; the service travels in the
//! schema data as an `Arc<Ledger>`.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Error, ErrorExtensions, Object, Result, Schema};
use domain::adapters::memory_repo::InMemoryStore;
use domain::service::LedgerService;
use domain::{CoreError, CustomerId, NewCustomer, NewTransaction, TransactionId};
use tracing::{error, info, warn};

pub type Ledger = LedgerService<InMemoryStore>;

pub type LedgerSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(ledger: Arc<Ledger>, max_depth: usize) -> LedgerSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(ledger)
        .limit_depth(max_depth)
        .finish()
}

fn ledger<'a>(ctx: &Context<'a>) -> Result<&'a Arc<Ledger>> {
    ctx.data::<Arc<Ledger>>()
}

/// Convert a domain error into a GraphQL error carrying a `code` extension.
fn to_gql_error(err: CoreError) -> Error {
    let code = if err.is_not_found() {
        warn!(err = %err, "record not found");
        "NOT_FOUND"
    } else {
        error!(err = ?err, "repository failure");
        "INTERNAL"
    };
    Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

pub struct Transaction(domain::Transaction);

/// This represents a transaction made by a customer
#[Object(name = "Transaction")]
impl Transaction {
    async fn id(&self) -> i32 {
        self.0.id.get()
    }

    async fn amount(&self) -> &str {
        &self.0.amount
    }

    async fn customer_id(&self) -> i32 {
        self.0.customer_id.get()
    }

    /// The customer referenced by `customerId`, or null if there is none
    async fn customer(&self, ctx: &Context<'_>) -> Result<Option<Customer>> {
        let found = ledger(ctx)?.customer_of(&self.0).map_err(to_gql_error)?;
        Ok(found.map(Customer))
    }
}

pub struct Customer(domain::Customer);

/// This represents a customer of one or more transactions
#[Object(name = "Customer")]
impl Customer {
    async fn id(&self) -> i32 {
        self.0.id.get()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Transactions whose `customerId` is this customer, in insertion order
    async fn transactions(&self, ctx: &Context<'_>) -> Result<Vec<Transaction>> {
        let list = ledger(ctx)?.transactions_of(&self.0).map_err(to_gql_error)?;
        Ok(list.into_iter().map(Transaction).collect())
    }
}

#[derive(Default)]
pub struct QueryRoot;

/// Root Query
#[Object(name = "Query")]
impl QueryRoot {
    /// A single transaction
    async fn transaction(
        &self,
        ctx: &Context<'_>,
        id: Option<i32>,
    ) -> Result<Option<Transaction>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let found = ledger(ctx)?
            .transaction(TransactionId::new(id))
            .map_err(to_gql_error)?;
        Ok(found.map(Transaction))
    }

    /// List of all transactions
    async fn transactions(&self, ctx: &Context<'_>) -> Result<Vec<Transaction>> {
        let list = ledger(ctx)?.transactions().map_err(to_gql_error)?;
        Ok(list.into_iter().map(Transaction).collect())
    }

    /// A single customer
    async fn customer(&self, ctx: &Context<'_>, id: Option<i32>) -> Result<Option<Customer>> {
        let Some(id) = id else {
            return Ok(None);
        };
        let found = ledger(ctx)?
            .customer(CustomerId::new(id))
            .map_err(to_gql_error)?;
        Ok(found.map(Customer))
    }

    /// List of all customers
    async fn customers(&self, ctx: &Context<'_>) -> Result<Vec<Customer>> {
        let list = ledger(ctx)?.customers().map_err(to_gql_error)?;
        Ok(list.into_iter().map(Customer).collect())
    }
}

#[derive(Default)]
pub struct MutationRoot;

// Mutation fields are nullable: a failed mutation nulls its own field and
// leaves sibling fields of the same document intact.

/// Root Mutation
#[Object(name = "Mutation")]
impl MutationRoot {
    /// Add a transaction
    async fn add_transaction(
        &self,
        ctx: &Context<'_>,
        amount: String,
        customer_id: i32,
    ) -> Result<Option<Transaction>> {
        let created = ledger(ctx)?
            .add_transaction(NewTransaction {
                amount,
                customer_id: CustomerId::new(customer_id),
            })
            .map_err(to_gql_error)?;
        info!(id = created.id.get(), customer_id, "transaction added");
        Ok(Some(Transaction(created)))
    }

    /// Update a transaction
    async fn update_transaction(
        &self,
        ctx: &Context<'_>,
        id: i32,
        amount: String,
    ) -> Result<Option<Transaction>> {
        let updated = ledger(ctx)?
            .update_transaction(TransactionId::new(id), amount)
            .map_err(to_gql_error)?;
        info!(id, "transaction updated");
        Ok(Some(Transaction(updated)))
    }

    /// Add a customer
    async fn add_customer(&self, ctx: &Context<'_>, name: String) -> Result<Option<Customer>> {
        let created = ledger(ctx)?
            .add_customer(NewCustomer { name })
            .map_err(to_gql_error)?;
        info!(id = created.id.get(), "customer added");
        Ok(Some(Customer(created)))
    }

    /// Update a customer
    async fn update_customer(
        &self,
        ctx: &Context<'_>,
        id: i32,
        name: String,
    ) -> Result<Option<Customer>> {
        let updated = ledger(ctx)?
            .update_customer(CustomerId::new(id), name)
            .map_err(to_gql_error)?;
        info!(id, "customer updated");
        Ok(Some(Customer(updated)))
    }
}
