pub mod history_query;
pub mod history_route;
