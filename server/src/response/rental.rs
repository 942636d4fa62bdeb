use application::transfer::{RentalCustomerDto, RentalDto, RentalMovieDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    id: Uuid,
    customer: RentalCustomerResponse,
    movie: RentalMovieResponse,
    #[serde(with = "time::serde::rfc3339")]
    date_out: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    date_returned: Option<OffsetDateTime>,
    rental_fee: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RentalCustomerResponse {
    id: Uuid,
    name: String,
    phone: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalMovieResponse {
    id: Uuid,
    title: String,
    daily_rental_rate: i32,
}

impl From<RentalDto> for RentalResponse {
    fn from(value: RentalDto) -> Self {
        let RentalDto {
            id,
            customer,
            movie,
            date_out,
            date_returned,
            rental_fee,
        } = value;
        Self {
            id,
            customer: customer.into(),
            movie: movie.into(),
            date_out,
            date_returned,
            rental_fee,
        }
    }
}

impl From<RentalCustomerDto> for RentalCustomerResponse {
    fn from(RentalCustomerDto { id, name, phone }: RentalCustomerDto) -> Self {
        Self { id, name, phone }
    }
}

impl From<RentalMovieDto> for RentalMovieResponse {
    fn from(
        RentalMovieDto {
            id,
            title,
            daily_rental_rate,
        }: RentalMovieDto,
    ) -> Self {
        Self {
            id,
            title,
            daily_rental_rate,
        }
    }
}

impl IntoResponse for RentalResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct RentalPresenter;

impl Exhaust<RentalDto> for RentalPresenter {
    type To = RentalResponse;
    fn emit(&self, input: RentalDto) -> Self::To {
        RentalResponse::from(input)
    }
}

impl Exhaust<Vec<RentalDto>> for RentalPresenter {
    type To = Json<Vec<RentalResponse>>;
    fn emit(&self, input: Vec<RentalDto>) -> Self::To {
        Json(input.into_iter().map(RentalResponse::from).collect())
    }
}

impl Exhaust<Option<RentalDto>> for RentalPresenter {
    type To = Response;
    fn emit(&self, input: Option<RentalDto>) -> Self::To {
        match input {
            Some(rental) => RentalResponse::from(rental).into_response(),
            None => (StatusCode::NOT_FOUND, "Rental not found.").into_response(),
        }
    }
}
