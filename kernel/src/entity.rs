mod common;
mod customer;
mod movie;
mod rental;

pub use self::{common::*, customer::*, movie::*, rental::*};
