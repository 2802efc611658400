pub mod auth_handler;

pub use auth_handler::{
    __path_init_admin, __path_login, __path_verify, init_admin, login, verify,
};
