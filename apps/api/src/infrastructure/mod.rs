// Infrastructure layer module
// Contains adapters for external data sources
// Follows Hexagonal Architecture

pub mod roster;
