pub mod get_context_request;
pub mod get_context_route;
