//! Calendar authorization: state codec, flow controller and redirect handling.

mod callback;
mod controller;
pub mod state;

pub use callback::{CallbackOutcome, RedirectCallback};
pub use controller::{AuthFlowController, AuthorizationProvider};
pub use state::AuthState;
