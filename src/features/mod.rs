pub mod auth;
pub mod documents;
pub mod news;
pub mod stations;
