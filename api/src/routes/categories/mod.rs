pub mod categories_route;
pub mod category_response;
