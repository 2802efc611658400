mod validator;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgUserRepository;
pub use services::{AuthService, TokenService};
pub use validator::JwtValidator;
