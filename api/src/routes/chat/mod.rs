pub mod chat_request;
pub mod chat_response;
pub mod chat_route;
pub mod chat_service;
pub mod system_prompt;
