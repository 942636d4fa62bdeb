use kernel::prelude::entity::{
    DestructRental, DestructRentalCustomer, DestructRentalMovie, Rental, RentalCustomer,
    RentalMovie, SelectLimit, SelectOffset,
};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RentalDto {
    pub id: Uuid,
    pub customer: RentalCustomerDto,
    pub movie: RentalMovieDto,
    pub date_out: OffsetDateTime,
    pub date_returned: Option<OffsetDateTime>,
    pub rental_fee: Option<i64>,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
            id,
            customer,
            movie,
            date_out,
            date_returned,
            rental_fee,
        } = value.into_destruct();
        Self {
            id: id.into(),
            customer: customer.into(),
            movie: movie.into(),
            date_out: date_out.into(),
            date_returned: date_returned.map(Into::into),
            rental_fee: rental_fee.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RentalCustomerDto {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

impl From<RentalCustomer> for RentalCustomerDto {
    fn from(value: RentalCustomer) -> Self {
        let DestructRentalCustomer { id, name, phone } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RentalMovieDto {
    pub id: Uuid,
    pub title: String,
    pub daily_rental_rate: i32,
}

impl From<RentalMovie> for RentalMovieDto {
    fn from(value: RentalMovie) -> Self {
        let DestructRentalMovie {
            id,
            title,
            daily_rental_rate,
        } = value.into_destruct();
        Self {
            id: id.into(),
            title: title.into(),
            daily_rental_rate: daily_rental_rate.into(),
        }
    }
}

#[derive(Debug)]
pub struct GetRentalDto {
    pub id: Uuid,
}

#[derive(Debug)]
pub struct GetAllRentalDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

#[derive(Debug)]
pub struct CreateRentalDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub movie_id: Uuid,
    pub date_out: OffsetDateTime,
}

#[derive(Debug)]
pub struct ReturnRentalDto {
    pub customer_id: Uuid,
    pub movie_id: Uuid,
    pub returned_at: OffsetDateTime,
}
