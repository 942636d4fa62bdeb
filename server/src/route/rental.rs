use application::service::{CreateRentalService, GetRentalService};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    CreateRentalRequest, GetAllRentalRequest, GetRentalRequest, RentalRequest, RentalTransformer,
};
use crate::response::{RentalPresenter, RentalResponse};

pub trait RentalRouter {
    fn route_rental(self) -> Self;
}

impl RentalRouter for Router<AppModule> {
    fn route_rental(self) -> Self {
        self.route("/api/rentals", get(get_all_rentals).post(create_rental))
            .route("/api/rentals/:id", get(get_rental))
    }
}

async fn get_all_rentals(
    State(handler): State<AppModule>,
    Query(req): Query<GetAllRentalRequest>,
) -> Result<Json<Vec<RentalResponse>>, ErrorStatus> {
    Controller::new(RentalTransformer, RentalPresenter)
        .intake(req)
        .handle(|dto| handler.pgpool().get_all_rentals(dto))
        .await
        .map_err(ErrorStatus::from)
}

async fn get_rental(
    State(handler): State<AppModule>,
    Path(id): Path<Uuid>,
) -> Result<Response, ErrorStatus> {
    Controller::new(RentalTransformer, RentalPresenter)
        .intake(GetRentalRequest::new(id))
        .handle(|dto| handler.pgpool().get_rental(dto))
        .await
        .map_err(ErrorStatus::from)
}

async fn create_rental(
    State(handler): State<AppModule>,
    _: Authenticated,
    body: Result<Json<RentalRequest>, JsonRejection>,
) -> Result<RentalResponse, ErrorStatus> {
    let Json(req) = body?;
    Controller::new(RentalTransformer, RentalPresenter)
        .try_intake(CreateRentalRequest(req))?
        .handle(|dto| handler.pgpool().create_rental(dto))
        .await
        .map_err(ErrorStatus::from)
}
