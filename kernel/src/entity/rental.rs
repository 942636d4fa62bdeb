mod date_out;
mod date_returned;
mod id;
mod rental_days;
mod rental_fee;
mod snapshot;

pub use self::{
    date_out::*, date_returned::*, id::*, rental_days::*, rental_fee::*, snapshot::*,
};
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

use crate::KernelError;

/// A customer's rental of one movie.
///
/// `date_returned` and `rental_fee` are either both unset (open) or both set (returned).
/// A returned rental never changes again.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Rental {
    id: RentalId,
    customer: RentalCustomer,
    movie: RentalMovie,
    date_out: DateOut,
    date_returned: Option<DateReturned>,
    rental_fee: Option<RentalFee>,
}

impl Rental {
    pub fn new(
        id: RentalId,
        customer: RentalCustomer,
        movie: RentalMovie,
        date_out: DateOut,
        date_returned: Option<DateReturned>,
        rental_fee: Option<RentalFee>,
    ) -> Self {
        Self {
            id,
            customer,
            movie,
            date_out,
            date_returned,
            rental_fee,
        }
    }

    pub fn open(
        id: RentalId,
        customer: RentalCustomer,
        movie: RentalMovie,
        date_out: DateOut,
    ) -> Self {
        Self::new(id, customer, movie, date_out, None, None)
    }

    pub fn is_returned(&self) -> bool {
        self.date_returned.is_some()
    }

    /// Closes the rental and charges the rate that was in effect when it was opened.
    pub fn mark_returned(
        &mut self,
        date_returned: DateReturned,
    ) -> error_stack::Result<(), KernelError> {
        if self.is_returned() {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable("Rental already processed."));
        }
        let days = RentalDays::between(&self.date_out, &date_returned);
        let fee = RentalFee::calculate(&days, self.movie.daily_rental_rate());
        self.date_returned = Some(date_returned);
        self.rental_fee = Some(fee);
        Ok(())
    }
}
