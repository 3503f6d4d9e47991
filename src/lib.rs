pub mod environment;
pub mod helper;
pub mod store;
pub mod view_model;

pub use environment::{Authenticator, Environment, Model, Repository, Toast, Toasts};
pub use store::{Action, AppState, Effect, Store};
