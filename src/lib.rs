//! Admin-page gate with two independent credentials: a server-side session
//! established by password login, and a self-describing `tg_session` claim
//! cookie. Either one is sufficient for `/admin`.

pub mod config;
pub mod db;
pub mod routes;
pub mod services;
pub mod state;
