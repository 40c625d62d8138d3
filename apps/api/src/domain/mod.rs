// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of transport concerns

pub mod auction;
pub mod repositories;
