mod daily_rental_rate;
mod id;
mod number_in_stock;
mod title;

pub use self::{daily_rental_rate::*, id::*, number_in_stock::*, title::*};
use destructure::{Destructure, Mutation};
use vodca::References;

/// Live catalogue record. Only the stock count changes during rentals and returns.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Movie {
    id: MovieId,
    title: MovieTitle,
    number_in_stock: NumberInStock,
    daily_rental_rate: DailyRentalRate,
}

impl Movie {
    pub fn new(
        id: MovieId,
        title: MovieTitle,
        number_in_stock: NumberInStock,
        daily_rental_rate: DailyRentalRate,
    ) -> Self {
        Self {
            id,
            title,
            number_in_stock,
            daily_rental_rate,
        }
    }
}
