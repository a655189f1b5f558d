//! HTTP endpoints served while an OAuth authorization is in flight.
//!
//! - [`callback`] receives the provider redirect and exchanges the
//!   authorization code for a token.
//! - [`health`] reports status and version, handy for checking that the
//!   callback server is reachable on `SERVER_ADDRESS`.

mod callback;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
