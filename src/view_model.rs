use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::environment::model::{Entry, EntryImage, Lobby, Role, Team, User};

#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct UserViewModel {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub current_entry: Option<EntryViewModel>,
}

impl PartialEq for UserViewModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for UserViewModel {}

impl UserViewModel {
    pub fn new(user: &User) -> Self {
        Self {
            id: UserId(user.id.clone()),
            name: user.name.clone(),
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            avatar: user.avatar.clone(),
            current_entry: user.current_entry.as_ref().map(EntryViewModel::new),
        }
    }

    /// The name the user likes to be addressed by.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryViewModel {
    pub id: EntryId,
    pub author: Option<UserId>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub created: DateTime<Utc>,
    pub created_human: String,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub image: Option<EntryImage>,
    pub presented: bool,
}

impl PartialEq for EntryViewModel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntryViewModel {}

impl EntryViewModel {
    pub fn new(entry: &Entry) -> Self {
        let created = entry.created_at;
        Self {
            id: EntryId(entry.id),
            author: entry.user.as_ref().map(|u| UserId(u.id.clone())),
            text: entry.text.clone(),
            link: entry.link.clone(),
            created,
            created_human: created.format("%A, %e %B %Y").to_string(),
            // older backend records miss the coarse buckets
            week: entry.week,
            month: entry.month.unwrap_or_else(|| created.month()),
            year: entry.year.unwrap_or_else(|| created.year()),
            image: entry.image.clone(),
            presented: entry.presented.unwrap_or(false),
        }
    }

    /// Entries carry either a text note or a link.
    pub fn content(&self) -> &str {
        self.text
            .as_deref()
            .or(self.link.as_deref())
            .unwrap_or_default()
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamViewModel {
    pub id: u64,
    pub name: String,
    pub current_entry: Option<EntryViewModel>,
    pub entries: Vec<EntryViewModel>,
    pub participants: Vec<UserViewModel>,
    pub changed_entry_at: Option<DateTime<Utc>>,
}

impl TeamViewModel {
    pub fn new(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            current_entry: team.entry.as_ref().map(EntryViewModel::new),
            entries: team.entries.iter().map(EntryViewModel::new).collect(),
            participants: team.participants.iter().map(UserViewModel::new).collect(),
            changed_entry_at: team.changed_entry_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LobbyViewModel {
    pub user: UserViewModel,
    pub team: TeamViewModel,
    pub role: Role,
}

impl LobbyViewModel {
    pub fn new(lobby: &Lobby) -> Self {
        Self {
            user: UserViewModel::new(&lobby.user),
            team: TeamViewModel::new(&lobby.team),
            role: lobby.role,
        }
    }

    pub fn is_host(&self) -> bool {
        matches!(self.role, Role::Host)
    }
}
