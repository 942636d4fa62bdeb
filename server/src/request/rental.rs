use application::transfer::{CreateRentalDto, GetAllRentalDto, GetRentalDto, ReturnRentalDto};
use error_stack::Report;
use kernel::prelude::entity::{SelectLimit, SelectOffset};
use kernel::KernelError;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::{Intake, TryIntake};

/// Body shared by `POST /api/rentals` and `POST /api/returns`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRequest {
    customer_id: Option<String>,
    movie_id: Option<String>,
}

#[derive(Debug)]
pub struct CreateRentalRequest(pub RentalRequest);

#[derive(Debug)]
pub struct ReturnRentalRequest(pub RentalRequest);

#[derive(Debug, Deserialize)]
pub struct GetAllRentalRequest {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug)]
pub struct GetRentalRequest {
    id: Uuid,
}

impl GetRentalRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct RentalTransformer;

impl RentalTransformer {
    fn ids(
        RentalRequest {
            customer_id,
            movie_id,
        }: RentalRequest,
    ) -> error_stack::Result<(Uuid, Uuid), KernelError> {
        let customer_id = parse_id("customerId", customer_id)?;
        let movie_id = parse_id("movieId", movie_id)?;
        Ok((customer_id, movie_id))
    }
}

fn parse_id(field: &str, value: Option<String>) -> error_stack::Result<Uuid, KernelError> {
    let value = value.ok_or_else(|| {
        Report::new(KernelError::InvalidRequest).attach_printable(format!("\"{field}\" is required"))
    })?;
    Uuid::parse_str(&value).map_err(|_| {
        Report::new(KernelError::InvalidRequest)
            .attach_printable(format!("\"{field}\" must be a valid UUID"))
    })
}

impl TryIntake<CreateRentalRequest> for RentalTransformer {
    type To = CreateRentalDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: CreateRentalRequest) -> Result<Self::To, Self::Error> {
        let (customer_id, movie_id) = Self::ids(input.0)?;
        Ok(CreateRentalDto {
            id: Uuid::new_v4(),
            customer_id,
            movie_id,
            date_out: OffsetDateTime::now_utc(),
        })
    }
}

impl TryIntake<ReturnRentalRequest> for RentalTransformer {
    type To = ReturnRentalDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: ReturnRentalRequest) -> Result<Self::To, Self::Error> {
        let (customer_id, movie_id) = Self::ids(input.0)?;
        Ok(ReturnRentalDto {
            customer_id,
            movie_id,
            returned_at: OffsetDateTime::now_utc(),
        })
    }
}

impl Intake<GetAllRentalRequest> for RentalTransformer {
    type To = GetAllRentalDto;
    fn emit(&self, GetAllRentalRequest { limit, offset }: GetAllRentalRequest) -> Self::To {
        GetAllRentalDto {
            limit: limit.map(SelectLimit::new).unwrap_or_default(),
            offset: offset.map(SelectOffset::new).unwrap_or_default(),
        }
    }
}

impl Intake<GetRentalRequest> for RentalTransformer {
    type To = GetRentalDto;
    fn emit(&self, input: GetRentalRequest) -> Self::To {
        GetRentalDto { id: input.id }
    }
}
