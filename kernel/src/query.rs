mod customer;
mod movie;
mod rental;

pub use self::{customer::*, movie::*, rental::*};
