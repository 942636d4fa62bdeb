use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    CustomerQuery, DependOnCustomerQuery, DependOnMovieQuery, DependOnRentalQuery, MovieQuery,
    RentalQuery,
};
use kernel::interface::update::{
    DependOnMovieModifier, DependOnRentalModifier, MovieModifier, RentalModifier,
};
use kernel::prelude::entity::{
    CustomerId, DateOut, DateReturned, MovieId, Rental, RentalCustomer, RentalId, RentalMovie,
};
use kernel::KernelError;

use crate::transfer::{
    CreateRentalDto, GetAllRentalDto, GetRentalDto, RentalDto, ReturnRentalDto,
};

#[async_trait::async_trait]
pub trait GetRentalService: 'static + Sync + Send + DependOnRentalQuery {
    async fn get_rental(
        &self,
        dto: GetRentalDto,
    ) -> error_stack::Result<Option<RentalDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = RentalId::new(dto.id);
        let rental = self.rental_query().find_by_id(&mut connection, &id).await?;

        Ok(rental.map(RentalDto::from))
    }

    async fn get_all_rentals(
        &self,
        dto: GetAllRentalDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let rentals = self
            .rental_query()
            .find_all(&mut connection, &dto.limit, &dto.offset)
            .await?;

        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }
}

impl<T> GetRentalService for T where T: DependOnRentalQuery {}

#[async_trait::async_trait]
pub trait CreateRentalService:
    'static
    + Sync
    + Send
    + DependOnCustomerQuery
    + DependOnMovieQuery
    + DependOnMovieModifier
    + DependOnRentalModifier
{
    async fn create_rental(&self, dto: CreateRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let customer_id = CustomerId::new(dto.customer_id);
        let customer = self
            .customer_query()
            .find_by_id(&mut connection, &customer_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::InvalidRequest).attach_printable("Invalid customer.")
            })?;

        let movie_id = MovieId::new(dto.movie_id);
        let movie = self
            .movie_query()
            .find_by_id(&mut connection, &movie_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::InvalidRequest).attach_printable("Invalid movie.")
            })?;

        if movie.number_in_stock().is_empty() {
            return Err(out_of_stock());
        }

        let rental = Rental::open(
            RentalId::new(dto.id),
            RentalCustomer::from(customer),
            RentalMovie::from(movie),
            DateOut::new(dto.date_out),
        );

        // Decrement re-checks the stock atomically.
        if !self
            .movie_modifier()
            .take_stock(&mut connection, &movie_id)
            .await?
        {
            connection.roll_back().await?;
            return Err(out_of_stock());
        }
        self.rental_modifier()
            .create(&mut connection, &rental)
            .await?;
        connection.commit().await?;

        tracing::info!(
            rental_id = %dto.id,
            customer_id = %dto.customer_id,
            movie_id = %dto.movie_id,
            "Rental opened"
        );

        Ok(RentalDto::from(rental))
    }
}

impl<T> CreateRentalService for T where
    T: DependOnCustomerQuery + DependOnMovieQuery + DependOnMovieModifier + DependOnRentalModifier
{
}

#[async_trait::async_trait]
pub trait ReturnRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier + DependOnMovieModifier
{
    /// Closes the customer's rental of the movie, charges the fee and puts the copy back in stock.
    ///
    /// The return is committed before the stock is touched. A failing restock is logged and
    /// does not undo the return.
    async fn return_rental(&self, dto: ReturnRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let customer_id = CustomerId::new(dto.customer_id);
        let movie_id = MovieId::new(dto.movie_id);
        let mut rental = self
            .rental_query()
            .find_by_customer_and_movie(&mut connection, &customer_id, &movie_id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound).attach_printable("Rental not found.")
            })?;

        rental.mark_returned(DateReturned::new(dto.returned_at))?;

        if !self
            .rental_modifier()
            .mark_returned(&mut connection, &rental)
            .await?
        {
            // Another request returned it between the lookup and the update.
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable("Rental already processed."));
        }
        connection.commit().await?;

        tracing::info!(
            customer_id = %dto.customer_id,
            movie_id = %dto.movie_id,
            rental_fee = ?rental.rental_fee().map(i64::from),
            "Rental returned"
        );

        if let Err(report) = restock(self, &movie_id).await {
            tracing::error!(
                movie_id = %dto.movie_id,
                "Rental returned but the movie was not restocked: {report:?}"
            );
        }

        Ok(RentalDto::from(rental))
    }
}

impl<T> ReturnRentalService for T where
    T: DependOnRentalQuery + DependOnRentalModifier + DependOnMovieModifier
{
}

async fn restock<T>(module: &T, movie_id: &MovieId) -> error_stack::Result<(), KernelError>
where
    T: DependOnMovieModifier + ?Sized,
{
    let mut connection = module.database_connection().transact().await?;
    module
        .movie_modifier()
        .increment_stock(&mut connection, movie_id, 1)
        .await?;
    connection.commit().await
}

fn out_of_stock() -> Report<KernelError> {
    Report::new(KernelError::InvalidState).attach_printable("Movie not in stock.")
}
