use std::ops::{Deref, DerefMut};

use error_stack::{Report, ResultExt};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{customer::*, movie::*, rental::*};

mod customer;
mod movie;
mod rental;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = Pool::connect(&url).await.convert_error()?;
        Ok(Self { pool })
    }

    /// Creates the pool without opening a connection until the first query.
    pub fn connect_lazy(url: &str) -> error_stack::Result<Self, KernelError> {
        let pool = PgPoolOptions::new().connect_lazy(url).convert_error()?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(transaction))
    }
}

/// Open database transaction. Rolled back on drop unless committed.
pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            Error::PoolTimedOut => Report::from(error).change_context(KernelError::Timeout),
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

#[cfg(test)]
pub(in crate::database) mod test {
    use error_stack::ResultExt;
    use uuid::Uuid;

    use kernel::KernelError;

    use crate::database::postgres::{PostgresConnection, PostgresDatabase};

    pub async fn database() -> error_stack::Result<PostgresDatabase, KernelError> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        Ok(db)
    }

    pub async fn insert_customer(
        con: &mut PostgresConnection,
        name: &str,
    ) -> error_stack::Result<Uuid, KernelError> {
        let id = Uuid::new_v4();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO customers (id, name, phone)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind("12345")
        .execute(&mut **con)
        .await
        .change_context_lazy(|| KernelError::Internal)?;
        Ok(id)
    }

    pub async fn insert_movie(
        con: &mut PostgresConnection,
        number_in_stock: i32,
        daily_rental_rate: i32,
    ) -> error_stack::Result<Uuid, KernelError> {
        let id = Uuid::new_v4();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO movies (id, title, number_in_stock, daily_rental_rate)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind("12345")
        .bind(number_in_stock)
        .bind(daily_rental_rate)
        .execute(&mut **con)
        .await
        .change_context_lazy(|| KernelError::Internal)?;
        Ok(id)
    }

    fn shared_across_tasks<T: Sync + Send + 'static>() {}

    #[test]
    fn connection_is_shareable() {
        shared_across_tasks::<PostgresConnection>();
    }
}
