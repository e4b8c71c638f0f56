// handlers/mod.rs - HTTP controllers
//
// Controllers only translate between HTTP and the service layer. Failures
// travel back as ApiError and are rendered by the failure listener.
pub mod system;
pub mod users;
