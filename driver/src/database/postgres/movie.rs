use sqlx::PgConnection;
use uuid::Uuid;

use kernel::interface::query::{DependOnMovieQuery, MovieQuery};
use kernel::interface::update::{DependOnMovieModifier, MovieModifier};
use kernel::prelude::entity::{DailyRentalRate, Movie, MovieId, MovieTitle, NumberInStock};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresMovieRepository;

#[async_trait::async_trait]
impl MovieQuery for PostgresMovieRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        PgMovieInternal::find_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl MovieModifier for PostgresMovieRepository {
    type Transaction = PostgresConnection;
    async fn increment_stock(
        &self,
        con: &mut PostgresConnection,
        movie_id: &MovieId,
        delta: i32,
    ) -> error_stack::Result<(), KernelError> {
        PgMovieInternal::increment_stock(con, movie_id, delta).await
    }

    async fn take_stock(
        &self,
        con: &mut PostgresConnection,
        movie_id: &MovieId,
    ) -> error_stack::Result<bool, KernelError> {
        PgMovieInternal::take_stock(con, movie_id).await
    }
}

impl DependOnMovieQuery for PostgresDatabase {
    type MovieQuery = PostgresMovieRepository;
    fn movie_query(&self) -> &Self::MovieQuery {
        &PostgresMovieRepository
    }
}

impl DependOnMovieModifier for PostgresDatabase {
    type MovieModifier = PostgresMovieRepository;
    fn movie_modifier(&self) -> &Self::MovieModifier {
        &PostgresMovieRepository
    }
}

#[derive(sqlx::FromRow)]
struct MovieRow {
    id: Uuid,
    title: String,
    number_in_stock: i32,
    daily_rental_rate: i32,
}

impl From<MovieRow> for Movie {
    fn from(value: MovieRow) -> Self {
        Movie::new(
            MovieId::new(value.id),
            MovieTitle::new(value.title),
            NumberInStock::new(value.number_in_stock),
            DailyRentalRate::new(value.daily_rental_rate),
        )
    }
}

pub(in crate::database) struct PgMovieInternal;

impl PgMovieInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &MovieId,
    ) -> error_stack::Result<Option<Movie>, KernelError> {
        let row = sqlx::query_as::<_, MovieRow>(
            // language=postgresql
            r#"
            SELECT id, title, number_in_stock, daily_rental_rate
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Movie::from))
    }

    async fn increment_stock(
        con: &mut PgConnection,
        movie_id: &MovieId,
        delta: i32,
    ) -> error_stack::Result<(), KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE movies
            SET number_in_stock = number_in_stock + $2
            WHERE id = $1
            "#,
        )
        .bind(movie_id.as_ref())
        .bind(delta)
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            tracing::warn!(movie_id = %movie_id.as_ref(), "Stock update matched no movie");
        }
        Ok(())
    }

    async fn take_stock(
        con: &mut PgConnection,
        movie_id: &MovieId,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE movies
            SET number_in_stock = number_in_stock - 1
            WHERE id = $1 AND number_in_stock > 0
            "#,
        )
        .bind(movie_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}
