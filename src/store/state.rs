use crate::view_model::{EntryViewModel, UserViewModel};

/// The flat UI state. Only the reducer writes to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub current_user: Option<UserViewModel>,
    pub user_entries: im::Vector<EntryViewModel>,
    pub is_loading_current_user: bool,
    pub is_loading_sign_in: bool,
    pub is_posting_entry: bool,
    pub is_loading_user_entries: bool,
    pub checked_auth_state: bool,
    pub is_deleting_current_entry: bool,
    pub is_updating_user: bool,
    /// The most recent failure message. Not cleared by later successes.
    pub error: Option<String>,
}
