pub mod answer_model;
pub mod app_state;
pub mod http;
