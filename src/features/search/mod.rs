pub mod dtos;
pub mod handlers;
pub mod matcher;
pub mod routes;
pub mod services;
