use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::MovieId;
use crate::KernelError;

#[async_trait::async_trait]
pub trait MovieModifier: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Adds `delta` to the stock count. Unknown ids are a no-op.
    async fn increment_stock(
        &self,
        con: &mut Self::Transaction,
        movie_id: &MovieId,
        delta: i32,
    ) -> error_stack::Result<(), KernelError>;

    /// Takes one copy out of stock if any is left.
    ///
    /// Returns `false` when the movie is unknown or out of stock.
    async fn take_stock(
        &self,
        con: &mut Self::Transaction,
        movie_id: &MovieId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnMovieModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type MovieModifier: MovieModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn movie_modifier(&self) -> &Self::MovieModifier;
}
