mod id;
mod name;
mod phone;

pub use self::{id::*, name::*, phone::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Customer {
    id: CustomerId,
    name: CustomerName,
    phone: CustomerPhone,
}

impl Customer {
    pub fn new(id: CustomerId, name: CustomerName, phone: CustomerPhone) -> Self {
        Self { id, name, phone }
    }
}
