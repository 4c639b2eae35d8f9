pub mod detection_request;
pub mod detection_response;
pub mod detection_route;
