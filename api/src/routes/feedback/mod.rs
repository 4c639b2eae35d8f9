pub mod feedback_request;
pub mod feedback_route;
