//! Database layer (Postgres via sqlx).

pub mod postgres;

pub use postgres::Db;
