// Session authentication
//
// - config: secret, lifetime and cookie attributes from the environment
// - jwt: signing and verification of session tokens
// - middleware: `AuthUser` guard extractor and `AuthError`
// - routes: POST /jwt and POST /logout

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod routes;

pub use config::{AuthConfig, Environment, JwtConfig, SESSION_COOKIE};
pub use middleware::{AuthError, AuthState, AuthUser};
pub use routes::routes;
