mod relations;
mod scenarios;
mod schema;
mod transaction;
mod types;
