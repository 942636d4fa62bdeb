use application::service::ReturnRentalService;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{RentalRequest, RentalTransformer, ReturnRentalRequest};
use crate::response::{RentalPresenter, RentalResponse};

pub trait ReturnRouter {
    fn route_return(self) -> Self;
}

impl ReturnRouter for Router<AppModule> {
    fn route_return(self) -> Self {
        self.route("/api/returns", post(return_rental))
    }
}

/// Closes the open rental of the posted customer and movie.
///
/// The token is checked before the body is read.
async fn return_rental(
    State(handler): State<AppModule>,
    _: Authenticated,
    body: Result<Json<RentalRequest>, JsonRejection>,
) -> Result<RentalResponse, ErrorStatus> {
    let Json(req) = body?;
    Controller::new(RentalTransformer, RentalPresenter)
        .try_intake(ReturnRentalRequest(req))?
        .handle(|dto| handler.pgpool().return_rental(dto))
        .await
        .map_err(ErrorStatus::from)
}

#[cfg(test)]
mod test {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use axum::Router;
    use tower::ServiceExt;

    use crate::auth::test::{token, SECRET};
    use crate::auth::AUTH_HEADER;
    use crate::route::test::module;
    use crate::route::ReturnRouter;

    async fn post(token: Option<String>, body: &'static str) -> Response {
        let app = Router::new().route_return().with_state(module());
        let mut request = Request::builder()
            .method("POST")
            .uri("/api/returns")
            .header("content-type", "application/json");
        if let Some(token) = token {
            request = request.header(AUTH_HEADER, token);
        }
        app.oneshot(request.body(Body::from(body)).expect("request"))
            .await
            .expect("response")
    }

    async fn text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let response = post(None, "{}").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(text(response).await, "Access denied. No token provided.");
    }

    #[tokio::test]
    async fn token_with_wrong_secret_is_unauthorized() {
        let response = post(Some(token("other-secret")), "{}").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_customer_id_is_bad_request() {
        let body = r#"{"movieId":"0b5d7c3e-2f4a-4e61-8a3c-9d1e7f2b6c48"}"#;
        let response = post(Some(token(SECRET)), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(text(response).await, "\"customerId\" is required");
    }

    #[tokio::test]
    async fn malformed_customer_id_is_bad_request() {
        let body = r#"{"customerId":"1234","movieId":"0b5d7c3e-2f4a-4e61-8a3c-9d1e7f2b6c48"}"#;
        let response = post(Some(token(SECRET)), body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(text(response).await, "\"customerId\" must be a valid UUID");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = post(Some(token(SECRET)), "{invalid").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
