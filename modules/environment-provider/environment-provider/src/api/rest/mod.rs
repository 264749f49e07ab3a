//! Spring Cloud Config compatible REST surface.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
