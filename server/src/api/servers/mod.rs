pub mod app_state;
pub mod auth_middleware;
pub mod rest;
