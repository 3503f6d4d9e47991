use crate::view_model::{EntryId, EntryViewModel, UserViewModel};

/// Everything that can happen in the app. Network-bound operations come in
/// pairs: the intent marks the request as started, the completion carries
/// the outcome.
#[derive(Clone, Debug)]
pub enum Action {
    /// Start the interactive sign-in through the configured provider.
    SignIn,
    SignInFinished(Result<UserViewModel, String>),

    /// Look up a previously stored session on launch.
    CheckSession,
    SessionChecked(Result<UserViewModel, String>),

    /// Submit this week's entry. Content containing "http" is posted as a link.
    SubmitEntry(String),
    EntrySubmitted(Result<EntryViewModel, String>),

    LoadEntries,
    EntriesLoaded(Result<Vec<EntryViewModel>, String>),

    DeleteCurrentEntry,
    CurrentEntryDeleted(Result<EntryId, String>),

    UpdateNickname(String),
    NicknameUpdated(Result<UserViewModel, String>),
}
