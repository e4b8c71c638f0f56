// Users resource: a list controller for the collection and an item
// controller for single records, both delegating to UserService.
use axum::{
    http::Method,
    routing::get,
    Router,
};

use crate::middleware::method_not_allowed;
use crate::services::UserService;

pub mod collection;
pub mod item;

pub fn routes() -> Router<UserService> {
    Router::new()
        // Collection
        .route(
            "/api/users",
            get(collection::list)
                .post(collection::create)
                .fallback(method_not_allowed(&[Method::GET, Method::POST])),
        )
        // Item
        .route(
            "/api/users/:id",
            get(item::show)
                .patch(item::update)
                .delete(item::destroy)
                .fallback(method_not_allowed(&[Method::GET, Method::PATCH, Method::DELETE])),
        )
}
