use reqwest::StatusCode;

use crate::environment::model::{ApiError, NewEntry};
use crate::environment::types::StoredUser;
use crate::environment::Environment;
use crate::view_model::{EntryId, EntryViewModel, UserViewModel};

use super::{Action, AppState, Effect};

pub fn reduce(action: Action, state: &mut AppState, environment: &Environment) -> Effect<Action> {
    log::trace!("{action:?}");
    match action {
        Action::SignIn => {
            state.is_loading_sign_in = true;
            let environment = environment.clone();
            Effect::future(
                async move { sign_in(&environment).await },
                Action::SignInFinished,
            )
        }
        Action::SignInFinished(result) => {
            state.is_loading_sign_in = false;
            match result {
                Ok(user) => state.current_user = Some(user),
                Err(error) => {
                    state.current_user = None;
                    state.error = Some(error);
                }
            }
            Effect::NONE
        }
        Action::CheckSession => {
            state.is_loading_current_user = true;
            let Some(stored) = environment.repository.current_user() else {
                return Effect::action(Action::SessionChecked(Err(
                    "No stored session".to_string()
                )));
            };
            let environment = environment.clone();
            Effect::future(
                async move { check_session(&environment, stored).await },
                Action::SessionChecked,
            )
        }
        Action::SessionChecked(result) => {
            state.is_loading_current_user = false;
            state.checked_auth_state = true;
            // A failed check only means there is no session to resume; it
            // never surfaces as an error.
            state.current_user = result.ok();
            Effect::NONE
        }
        Action::SubmitEntry(content) => {
            state.is_posting_entry = true;
            let Some(ref user) = state.current_user else {
                return Effect::action(Action::EntrySubmitted(Err(
                    "No signed in user".to_string()
                )));
            };
            let user_id = user.id.clone();
            let environment = environment.clone();
            Effect::future(
                async move { submit_entry(&environment, &user_id.0, &content).await },
                Action::EntrySubmitted,
            )
        }
        Action::EntrySubmitted(result) => {
            state.is_posting_entry = false;
            match result {
                Ok(entry) => {
                    if let Some(ref mut user) = state.current_user {
                        user.current_entry = Some(entry);
                    }
                }
                Err(error) => state.error = Some(error),
            }
            Effect::NONE
        }
        Action::LoadEntries => {
            state.is_loading_user_entries = true;
            let Some(ref user) = state.current_user else {
                return Effect::action(Action::EntriesLoaded(Err(
                    "No signed in user".to_string()
                )));
            };
            let name = user.name.clone();
            let model = environment.model.clone();
            Effect::future(
                async move {
                    model
                        .entries(&name)
                        .await
                        .map(|entries| entries.iter().map(EntryViewModel::new).collect())
                        .string_error("entries")
                },
                Action::EntriesLoaded,
            )
        }
        Action::EntriesLoaded(result) => {
            state.is_loading_user_entries = false;
            match result {
                Ok(entries) => state.user_entries = entries.into(),
                Err(error) => {
                    state.error = Some(error);
                    state.user_entries.clear();
                }
            }
            Effect::NONE
        }
        Action::DeleteCurrentEntry => {
            state.is_deleting_current_entry = true;
            let entry_id = state
                .current_user
                .as_ref()
                .and_then(|user| user.current_entry.as_ref())
                .map(|entry| entry.id);
            let Some(entry_id) = entry_id else {
                return Effect::action(Action::CurrentEntryDeleted(Err(
                    "No current entry".to_string()
                )));
            };
            let environment = environment.clone();
            Effect::future(
                async move { delete_entry(&environment, entry_id).await },
                Action::CurrentEntryDeleted,
            )
        }
        Action::CurrentEntryDeleted(result) => {
            state.is_deleting_current_entry = false;
            match result {
                Ok(_) => {
                    if let Some(ref mut user) = state.current_user {
                        user.current_entry = None;
                    }
                }
                Err(error) => state.error = Some(error),
            }
            Effect::NONE
        }
        Action::UpdateNickname(nickname) => {
            state.is_updating_user = true;
            let Some(ref user) = state.current_user else {
                return Effect::action(Action::NicknameUpdated(Err(
                    "No signed in user".to_string()
                )));
            };
            let user_id = user.id.clone();
            let environment = environment.clone();
            Effect::future(
                async move { update_nickname(&environment, &user_id.0, &nickname).await },
                Action::NicknameUpdated,
            )
        }
        Action::NicknameUpdated(result) => {
            state.is_updating_user = false;
            match result {
                Ok(user) => state.current_user = Some(user),
                Err(error) => state.error = Some(error),
            }
            Effect::NONE
        }
    }
}

/// Provider identity, then account lookup. An unknown email implicitly
/// creates the account from the provider data.
async fn sign_in(environment: &Environment) -> Result<UserViewModel, String> {
    let identity = match environment.authenticator.sign_in().await {
        Ok(identity) => identity,
        Err(error) => {
            environment.toasts.raise("Signing in failed, try again!");
            return Err(error);
        }
    };

    let user = match environment.model.user_by_email(&identity.email).await {
        Ok(user) => user,
        Err(error) if error.is_not_found() => {
            environment
                .toasts
                .raise(format!("Creating new user: {}", identity.email));
            match environment
                .model
                .create_user(&identity.name, &identity.email, identity.avatar.as_deref())
                .await
            {
                Ok(user) => user,
                Err(error) => {
                    if error.status() == Some(StatusCode::BAD_REQUEST) {
                        environment
                            .toasts
                            .raise("Creating new user failed, try another email!");
                    } else {
                        environment.toasts.raise("Creating new user failed");
                    }
                    return Err(error.to_string());
                }
            }
        }
        Err(error @ ApiError::Transport(_)) => {
            environment.toasts.raise("Couldn't reach the server...");
            return Err(error.to_string());
        }
        Err(error) => {
            environment.toasts.raise("Sign in failed, try again!");
            return Err(error.to_string());
        }
    };

    let view_model = UserViewModel::new(&user);
    if let Err(error) = environment.repository.store_user(StoredUser::new(&user)) {
        log::error!("Could not persist the session: {error}");
    }
    Ok(view_model)
}

async fn check_session(
    environment: &Environment,
    stored: StoredUser,
) -> Result<UserViewModel, String> {
    let user = environment
        .model
        .user_by_email(&stored.email)
        .await
        .string_error("check_session")?;
    let view_model = UserViewModel::new(&user);
    environment
        .toasts
        .raise(format!("Found signed in user: {}", view_model.name));
    Ok(view_model)
}

async fn submit_entry(
    environment: &Environment,
    user_id: &str,
    content: &str,
) -> Result<EntryViewModel, String> {
    let entry = environment
        .model
        .post_entry(NewEntry::classify(user_id, content))
        .await
        .string_error("post_entry")?;
    let entry = EntryViewModel::new(&entry);
    environment
        .toasts
        .raise(format!("New entry saved for week {}", entry.week));
    Ok(entry)
}

async fn delete_entry(environment: &Environment, id: EntryId) -> Result<EntryId, String> {
    let deleted = environment
        .model
        .delete_entry(id.0)
        .await
        .string_error("delete_entry")?;
    environment.toasts.raise(format!("{}: deleted", deleted.id));
    Ok(EntryId(deleted.id))
}

async fn update_nickname(
    environment: &Environment,
    user_id: &str,
    nickname: &str,
) -> Result<UserViewModel, String> {
    let user = match environment.model.update_user(user_id, nickname).await {
        Ok(user) => user,
        Err(error) => {
            environment.toasts.raise("Unable to save user... 🤔");
            return Err(error.to_string());
        }
    };

    let view_model = UserViewModel::new(&user);
    if nickname == "RANDOM" {
        environment.toasts.raise(format!(
            "Your new nickname is {}!",
            view_model.nickname.as_deref().unwrap_or_default()
        ));
    } else {
        environment.toasts.raise("User updated!");
    }
    Ok(view_model)
}

trait ResultExt {
    type Output;
    fn string_error(self, call: &'static str) -> Result<Self::Output, String>;
}

impl<T, E: std::fmt::Display> ResultExt for Result<T, E> {
    type Output = T;
    fn string_error(self, call: &'static str) -> Result<T, String> {
        self.map_err(|e| {
            let message = format!("API Error: {call} {e}");
            log::error!("{message}");
            message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::types::Identity;
    use crate::environment::{Authenticator, Model, Repository};
    use crate::view_model::UserId;
    use std::sync::Arc;

    struct NoProvider;

    #[async_trait::async_trait]
    impl Authenticator for NoProvider {
        async fn sign_in(&self) -> Result<Identity, String> {
            Err("no provider in tests".to_string())
        }
    }

    fn environment() -> (Environment, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let environment = Environment::new(
            Model::default(),
            Repository::with_directory(dir.path().to_path_buf()),
            Arc::new(NoProvider),
        );
        (environment, dir)
    }

    fn user(id: &str) -> UserViewModel {
        UserViewModel {
            id: UserId(id.to_string()),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        }
    }

    fn entry(id: u64, week: u32) -> EntryViewModel {
        EntryViewModel {
            id: EntryId(id),
            author: None,
            text: Some("notes".to_string()),
            link: None,
            created: "2023-05-02T10:00:00Z".parse().unwrap(),
            created_human: String::new(),
            week,
            month: 5,
            year: 2023,
            image: None,
            presented: false,
        }
    }

    #[test]
    fn intents_set_exactly_their_own_flag() {
        let (environment, _dir) = environment();
        let signed_in = AppState {
            current_user: Some(user("u1")),
            ..Default::default()
        };

        let table: Vec<(Action, fn(&AppState) -> bool)> = vec![
            (Action::SignIn, |s| s.is_loading_sign_in),
            (Action::CheckSession, |s| s.is_loading_current_user),
            (Action::SubmitEntry("notes".to_string()), |s| {
                s.is_posting_entry
            }),
            (Action::LoadEntries, |s| s.is_loading_user_entries),
            (Action::DeleteCurrentEntry, |s| s.is_deleting_current_entry),
            (Action::UpdateNickname("N".to_string()), |s| {
                s.is_updating_user
            }),
        ];

        for (action, flag) in table {
            let mut state = signed_in.clone();
            let _ = reduce(action, &mut state, &environment);
            assert!(flag(&state));

            // everything else is untouched
            let mut expected = signed_in.clone();
            expected.is_loading_sign_in = state.is_loading_sign_in;
            expected.is_loading_current_user = state.is_loading_current_user;
            expected.is_posting_entry = state.is_posting_entry;
            expected.is_loading_user_entries = state.is_loading_user_entries;
            expected.is_deleting_current_entry = state.is_deleting_current_entry;
            expected.is_updating_user = state.is_updating_user;
            assert_eq!(state, expected);
            assert_eq!(
                [
                    state.is_loading_sign_in,
                    state.is_loading_current_user,
                    state.is_posting_entry,
                    state.is_loading_user_entries,
                    state.is_deleting_current_entry,
                    state.is_updating_user,
                ]
                .iter()
                .filter(|on| **on)
                .count(),
                1
            );
        }
    }

    #[test]
    fn sign_in_outcomes() {
        let (environment, _dir) = environment();
        let mut state = AppState {
            is_loading_sign_in: true,
            ..Default::default()
        };

        let _ = reduce(
            Action::SignInFinished(Ok(user("u1"))),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading_sign_in);
        assert_eq!(state.current_user.as_ref().unwrap().id, UserId("u1".into()));
        assert!(state.error.is_none());

        state.is_loading_sign_in = true;
        let _ = reduce(
            Action::SignInFinished(Err("boom".to_string())),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading_sign_in);
        assert!(state.current_user.is_none());
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[test]
    fn session_check_void_records_no_error() {
        let (environment, _dir) = environment();
        let mut state = AppState::default();

        let effect = reduce(Action::CheckSession, &mut state, &environment);
        assert!(state.is_loading_current_user);
        // no stored session: the check completes as void without any request
        assert!(matches!(
            effect,
            Effect::Action(Action::SessionChecked(Err(_)))
        ));

        let _ = reduce(
            Action::SessionChecked(Err("offline".to_string())),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading_current_user);
        assert!(state.checked_auth_state);
        assert!(state.current_user.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn loaded_entries_replace_the_list() {
        let (environment, _dir) = environment();
        let mut state = AppState {
            current_user: Some(user("u1")),
            ..Default::default()
        };

        let effect = reduce(Action::LoadEntries, &mut state, &environment);
        assert!(state.is_loading_user_entries);
        assert!(matches!(effect, Effect::Future(_)));

        let _ = reduce(
            Action::EntriesLoaded(Ok(vec![entry(1, 1)])),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading_user_entries);
        assert_eq!(state.user_entries.len(), 1);
        assert_eq!(state.user_entries[0].week, 1);
    }

    #[test]
    fn failed_entry_load_clears_the_list() {
        let (environment, _dir) = environment();
        let mut state = AppState {
            current_user: Some(user("u1")),
            user_entries: im::vector![entry(1, 1)],
            is_loading_user_entries: true,
            ..Default::default()
        };

        let _ = reduce(
            Action::EntriesLoaded(Err("offline".to_string())),
            &mut state,
            &environment,
        );
        assert!(!state.is_loading_user_entries);
        assert!(state.user_entries.is_empty());
        assert_eq!(state.error.as_deref(), Some("offline"));
    }

    #[test]
    fn posted_entry_becomes_the_current_entry() {
        let (environment, _dir) = environment();
        let mut state = AppState {
            current_user: Some(user("u1")),
            is_posting_entry: true,
            ..Default::default()
        };

        let _ = reduce(
            Action::EntrySubmitted(Ok(entry(7, 18))),
            &mut state,
            &environment,
        );
        assert!(!state.is_posting_entry);
        let current = state.current_user.unwrap().current_entry.unwrap();
        assert_eq!(current.id, EntryId(7));
    }

    #[test]
    fn deleting_clears_the_current_entry() {
        let (environment, _dir) = environment();
        let mut signed_in = user("u1");
        signed_in.current_entry = Some(entry(7, 18));
        let mut state = AppState {
            current_user: Some(signed_in),
            ..Default::default()
        };

        let effect = reduce(Action::DeleteCurrentEntry, &mut state, &environment);
        assert!(state.is_deleting_current_entry);
        assert!(matches!(effect, Effect::Future(_)));

        let _ = reduce(
            Action::CurrentEntryDeleted(Ok(EntryId(7))),
            &mut state,
            &environment,
        );
        assert!(!state.is_deleting_current_entry);
        assert!(state.current_user.unwrap().current_entry.is_none());
    }

    #[test]
    fn operations_without_a_user_fail_immediately() {
        let (environment, _dir) = environment();
        let mut state = AppState::default();

        let effect = reduce(
            Action::SubmitEntry("notes".to_string()),
            &mut state,
            &environment,
        );
        assert!(matches!(
            effect,
            Effect::Action(Action::EntrySubmitted(Err(_)))
        ));

        let effect = reduce(Action::DeleteCurrentEntry, &mut state, &environment);
        assert!(matches!(
            effect,
            Effect::Action(Action::CurrentEntryDeleted(Err(_)))
        ));
    }

    #[test]
    fn stale_errors_survive_unrelated_successes() {
        let (environment, _dir) = environment();
        let mut state = AppState {
            current_user: Some(user("u1")),
            error: Some("posting failed".to_string()),
            ..Default::default()
        };

        let _ = reduce(
            Action::EntriesLoaded(Ok(vec![entry(1, 1)])),
            &mut state,
            &environment,
        );
        // the last failure sticks around until the next one replaces it
        assert_eq!(state.error.as_deref(), Some("posting failed"));
    }

    #[test]
    fn updated_user_replaces_the_current_user() {
        let (environment, _dir) = environment();
        let mut state = AppState {
            current_user: Some(user("u1")),
            is_updating_user: true,
            ..Default::default()
        };

        let mut updated = user("u1");
        updated.nickname = Some("Turbo Walrus".to_string());
        let _ = reduce(
            Action::NicknameUpdated(Ok(updated)),
            &mut state,
            &environment,
        );
        assert!(!state.is_updating_user);
        assert_eq!(
            state.current_user.unwrap().nickname.as_deref(),
            Some("Turbo Walrus")
        );
    }
}
