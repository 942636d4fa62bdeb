use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{DailyRentalRate, RentalDays};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct RentalFee(i64);

impl RentalFee {
    pub fn new(fee: impl Into<i64>) -> Self {
        Self(fee.into())
    }

    pub fn calculate(days: &RentalDays, rate: &DailyRentalRate) -> Self {
        Self(days.count() * i64::from(*rate.as_ref()))
    }
}
