use destructure::Destructure;
use vodca::References;

use crate::entity::{
    Customer, CustomerId, CustomerName, CustomerPhone, DailyRentalRate, DestructCustomer,
    DestructMovie, Movie, MovieId, MovieTitle,
};

/// Customer details copied into a rental when it is opened.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct RentalCustomer {
    id: CustomerId,
    name: CustomerName,
    phone: CustomerPhone,
}

impl RentalCustomer {
    pub fn new(id: CustomerId, name: CustomerName, phone: CustomerPhone) -> Self {
        Self { id, name, phone }
    }
}

impl From<Customer> for RentalCustomer {
    fn from(value: Customer) -> Self {
        let DestructCustomer { id, name, phone } = value.into_destruct();
        Self::new(id, name, phone)
    }
}

/// Movie details copied into a rental when it is opened.
///
/// The fee is always charged at this rate, whatever the live movie costs at return time.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct RentalMovie {
    id: MovieId,
    title: MovieTitle,
    daily_rental_rate: DailyRentalRate,
}

impl RentalMovie {
    pub fn new(id: MovieId, title: MovieTitle, daily_rental_rate: DailyRentalRate) -> Self {
        Self {
            id,
            title,
            daily_rental_rate,
        }
    }
}

impl From<Movie> for RentalMovie {
    fn from(value: Movie) -> Self {
        let DestructMovie {
            id,
            title,
            daily_rental_rate,
            ..
        } = value.into_destruct();
        Self::new(id, title, daily_rental_rate)
    }
}
