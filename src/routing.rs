//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    loan::{
        add_loan_api, create_loan_endpoint, delete_loan_api, delete_loan_endpoint, get_loans_api,
        get_loans_page,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOANS_VIEW, get(get_loans_page))
        .route(endpoints::POST_LOAN, post(create_loan_endpoint))
        .route(endpoints::DELETE_LOAN, delete(delete_loan_endpoint));

    let api_routes = Router::new()
        .route(endpoints::API_GET, get(get_loans_api))
        .route(endpoints::API_ADD, post(add_loan_api))
        .route(endpoints::API_DELETE, delete(delete_loan_api));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the loans page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::LOANS_VIEW)
}
