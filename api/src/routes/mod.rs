pub mod chat;
pub mod favicon_route;
pub mod status_route;
