use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{DependOnRentalQuery, RentalQuery};
use kernel::interface::update::{DependOnRentalModifier, RentalModifier};
use kernel::prelude::entity::{
    CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DateOut, DateReturned, MovieId,
    MovieTitle, Rental, RentalCustomer, RentalFee, RentalId, RentalMovie, SelectLimit,
    SelectOffset,
};
use kernel::KernelError;

use crate::database::postgres::{PostgresConnection, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for PostgresRentalRepository {
    type Transaction = PostgresConnection;
    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_id(con, id).await
    }

    async fn find_by_customer_and_movie(
        &self,
        con: &mut PostgresConnection,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_customer_and_movie(con, customer_id, movie_id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl RentalModifier for PostgresRentalRepository {
    type Transaction = PostgresConnection;
    async fn create(
        &self,
        con: &mut PostgresConnection,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::create(con, rental).await
    }

    async fn mark_returned(
        &self,
        con: &mut PostgresConnection,
        rental: &Rental,
    ) -> error_stack::Result<bool, KernelError> {
        PgRentalInternal::mark_returned(con, rental).await
    }
}

impl DependOnRentalQuery for PostgresDatabase {
    type RentalQuery = PostgresRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &PostgresRentalRepository
    }
}

impl DependOnRentalModifier for PostgresDatabase {
    type RentalModifier = PostgresRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &PostgresRentalRepository
    }
}

#[derive(sqlx::FromRow)]
struct RentalRow {
    id: Uuid,
    customer_id: Uuid,
    customer_name: String,
    customer_phone: String,
    movie_id: Uuid,
    movie_title: String,
    movie_daily_rental_rate: i32,
    date_out: OffsetDateTime,
    date_returned: Option<OffsetDateTime>,
    rental_fee: Option<i64>,
}

impl From<RentalRow> for Rental {
    fn from(value: RentalRow) -> Self {
        Rental::new(
            RentalId::new(value.id),
            RentalCustomer::new(
                CustomerId::new(value.customer_id),
                CustomerName::new(value.customer_name),
                CustomerPhone::new(value.customer_phone),
            ),
            RentalMovie::new(
                MovieId::new(value.movie_id),
                MovieTitle::new(value.movie_title),
                DailyRentalRate::new(value.movie_daily_rental_rate),
            ),
            DateOut::new(value.date_out),
            value.date_returned.map(DateReturned::new),
            value.rental_fee.map(RentalFee::new),
        )
    }
}

pub(in crate::database) struct PgRentalInternal;

impl PgRentalInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, customer_name, customer_phone,
                   movie_id, movie_title, movie_daily_rental_rate,
                   date_out, date_returned, rental_fee
            FROM rentals
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn find_by_customer_and_movie(
        con: &mut PgConnection,
        customer_id: &CustomerId,
        movie_id: &MovieId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, customer_name, customer_phone,
                   movie_id, movie_title, movie_daily_rental_rate,
                   date_out, date_returned, rental_fee
            FROM rentals
            WHERE customer_id = $1 AND movie_id = $2
            ORDER BY date_returned IS NOT NULL, date_out DESC
            LIMIT 1
            "#,
        )
        .bind(customer_id.as_ref())
        .bind(movie_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT id, customer_id, customer_name, customer_phone,
                   movie_id, movie_title, movie_daily_rental_rate,
                   date_out, date_returned, rental_fee
            FROM rentals
            ORDER BY date_out DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    async fn create(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        let customer = rental.customer();
        let movie = rental.movie();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO rentals (id, customer_id, customer_name, customer_phone,
                                 movie_id, movie_title, movie_daily_rental_rate,
                                 date_out, date_returned, rental_fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(rental.id().as_ref())
        .bind(customer.id().as_ref())
        .bind(customer.name().as_ref())
        .bind(customer.phone().as_ref())
        .bind(movie.id().as_ref())
        .bind(movie.title().as_ref())
        .bind(movie.daily_rental_rate().as_ref())
        .bind(rental.date_out().as_ref())
        .bind(rental.date_returned().as_ref().map(|date| *date.as_ref()))
        .bind(rental.rental_fee().as_ref().map(|fee| *fee.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn mark_returned(
        con: &mut PgConnection,
        rental: &Rental,
    ) -> error_stack::Result<bool, KernelError> {
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE rentals
            SET date_returned = $2, rental_fee = $3
            WHERE id = $1 AND date_returned IS NULL
            "#,
        )
        .bind(rental.id().as_ref())
        .bind(rental.date_returned().as_ref().map(|date| *date.as_ref()))
        .bind(rental.rental_fee().as_ref().map(|fee| *fee.as_ref()))
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::{CustomerQuery, MovieQuery, RentalQuery};
    use kernel::interface::update::RentalModifier;
    use kernel::prelude::entity::{
        CustomerId, DateOut, DateReturned, MovieId, Rental, RentalCustomer, RentalId,
        RentalMovie,
    };
    use kernel::KernelError;

    use crate::database::postgres::test::{database, insert_customer, insert_movie};
    use crate::database::postgres::{
        PostgresConnection, PostgresCustomerRepository, PostgresMovieRepository,
        PostgresRentalRepository,
    };

    async fn open_rental(
        con: &mut PostgresConnection,
        date_out: OffsetDateTime,
    ) -> error_stack::Result<Rental, KernelError> {
        let customer_id = CustomerId::new(insert_customer(con, "customer").await?);
        let movie_id = MovieId::new(insert_movie(con, 3, 2).await?);
        let customer = PostgresCustomerRepository
            .find_by_id(con, &customer_id)
            .await?
            .expect("customer exists");
        let movie = PostgresMovieRepository
            .find_by_id(con, &movie_id)
            .await?
            .expect("movie exists");
        let rental = Rental::open(
            RentalId::new(Uuid::new_v4()),
            RentalCustomer::from(customer),
            RentalMovie::from(movie),
            DateOut::new(date_out),
        );
        PostgresRentalRepository.create(con, &rental).await?;
        Ok(rental)
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_and_find() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut con = db.transact().await?;
        let date_out = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        let rental = open_rental(&mut con, date_out).await?;

        let found = PostgresRentalRepository
            .find_by_id(&mut con, rental.id())
            .await?;
        assert_eq!(found, Some(rental.clone()));

        let by_pair = PostgresRentalRepository
            .find_by_customer_and_movie(&mut con, rental.customer().id(), rental.movie().id())
            .await?;
        assert_eq!(by_pair, Some(rental));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn mark_returned_once() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut con = db.transact().await?;
        let date_out = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        let mut rental = open_rental(&mut con, date_out).await?;
        rental.mark_returned(DateReturned::new(date_out + Duration::days(3)))?;

        assert!(PostgresRentalRepository.mark_returned(&mut con, &rental).await?);
        assert!(!PostgresRentalRepository.mark_returned(&mut con, &rental).await?);

        let stored = PostgresRentalRepository
            .find_by_id(&mut con, rental.id())
            .await?
            .expect("rental exists");
        assert_eq!(stored.rental_fee().as_ref().map(|fee| *fee.as_ref()), Some(6));
        assert!(stored.is_returned());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn open_rental_wins_over_returned() -> error_stack::Result<(), KernelError> {
        let db = database().await?;
        let mut con = db.transact().await?;
        let date_out = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap();
        let mut returned = open_rental(&mut con, date_out).await?;
        returned.mark_returned(DateReturned::new(date_out + Duration::days(1)))?;
        PostgresRentalRepository
            .mark_returned(&mut con, &returned)
            .await?;

        let open = Rental::open(
            RentalId::new(Uuid::new_v4()),
            returned.customer().clone(),
            returned.movie().clone(),
            DateOut::new(date_out - Duration::days(1)),
        );
        PostgresRentalRepository.create(&mut con, &open).await?;

        let found = PostgresRentalRepository
            .find_by_customer_and_movie(&mut con, open.customer().id(), open.movie().id())
            .await?
            .expect("rental exists");
        assert_eq!(found.id(), open.id());
        Ok(())
    }
}
