use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

lazy_static::lazy_static! {
    static ref DEFAULT_BASE: Url = Url::parse(DEFAULT_API_URL).expect("default API URL parses");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "currentEntry")]
    pub current_entry: Option<Entry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    #[serde(default)]
    pub user: Option<Box<User>>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub week: u32,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub image: Option<EntryImage>,
    #[serde(default)]
    pub presented: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryImage {
    pub original_url: String,
    #[serde(default)]
    pub fixed_width_url: Option<String>,
    #[serde(default)]
    pub fixed_width_webp_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub changed_entry_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub entry: Option<Entry>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub participants: Vec<User>,
}

/// A user as seen through their team lobby, including the viewer's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lobby {
    #[serde(flatten)]
    pub user: User,
    pub team: Team,
    pub role: Role,
}

use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Role {
    Participant,
    Host,
}

/// Body for entry creation. The server fills in id, timestamp and week.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl NewEntry {
    /// Content that looks like a URL is submitted as a link, anything else
    /// as a text note.
    pub fn classify(user_id: &str, content: &str) -> Self {
        let (text, link) = if content.contains("http") {
            (None, Some(content.to_string()))
        } else {
            (Some(content.to_string()), None)
        };
        Self {
            user_id: user_id.to_string(),
            text,
            link,
        }
    }
}

// The backend wraps every payload in a single-key envelope.

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: User,
}

#[derive(Debug, Deserialize)]
struct EntryEnvelope {
    entry: Entry,
}

#[derive(Debug, Deserialize)]
struct EntriesEnvelope {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// The server answered with a non-success status code.
    Status(StatusCode),
    /// The request never produced a usable response.
    Transport(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status(status) => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Status(status) => write!(f, "Request failed with status code {status}"),
            ApiError::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => ApiError::Status(status),
            None => ApiError::Transport(error.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct Model {
    base: Url,
    client: reqwest::Client,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model").finish()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DEFAULT_BASE.clone())
    }
}

impl Model {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            client: reqwest::Client::new(),
        }
    }

    /// Base URL from `SHOWTELL_API_URL` (including an `.env` file), falling
    /// back to the local development server.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base = std::env::var("SHOWTELL_API_URL")
            .ok()
            .and_then(|raw| match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(error) => {
                    log::error!("Invalid SHOWTELL_API_URL {raw:?}: {error}");
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_BASE.clone());
        Self::new(base)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn user_by_email(&self, email: &str) -> Result<User, ApiError> {
        log::trace!("User by email {email}");
        let response = self
            .client
            .get(self.endpoint(&["users", "email"]))
            .query(&[("email", email)])
            .send()
            .await?;
        Self::parse::<UserEnvelope>(response).await.map(|e| e.user)
    }

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        avatar: Option<&str>,
    ) -> Result<User, ApiError> {
        log::trace!("Create user {email}");
        let body = serde_json::json!({ "name": name, "email": email, "avatar": avatar });
        let response = self
            .client
            .post(self.endpoint(&["users"]))
            .json(&body)
            .send()
            .await?;
        Self::parse::<UserEnvelope>(response).await.map(|e| e.user)
    }

    pub async fn update_user(&self, id: &str, nickname: &str) -> Result<User, ApiError> {
        log::trace!("Update user {id}");
        let body = serde_json::json!({ "nickname": nickname });
        let response = self
            .client
            .put(self.endpoint(&["users", id]))
            .json(&body)
            .send()
            .await?;
        Self::parse::<UserEnvelope>(response).await.map(|e| e.user)
    }

    pub async fn entries(&self, user_name: &str) -> Result<Vec<Entry>, ApiError> {
        log::trace!("Entries for {user_name}");
        let response = self
            .client
            .get(self.endpoint(&["entries"]))
            .query(&[("userName", user_name)])
            .send()
            .await?;
        Self::parse::<EntriesEnvelope>(response)
            .await
            .map(|e| e.entries)
    }

    pub async fn post_entry(&self, entry: NewEntry) -> Result<Entry, ApiError> {
        log::trace!("Post entry for {}", entry.user_id);
        let response = self
            .client
            .post(self.endpoint(&["entries"]))
            .json(&entry)
            .send()
            .await?;
        Self::parse::<EntryEnvelope>(response).await.map(|e| e.entry)
    }

    pub async fn delete_entry(&self, id: u64) -> Result<Entry, ApiError> {
        log::trace!("Delete entry {id}");
        let response = self
            .client
            .delete(self.endpoint(&["entries", &id.to_string()]))
            .send()
            .await?;
        Self::parse::<EntryEnvelope>(response).await.map(|e| e.entry)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            log::error!("API Error: {status}");
            return Err(ApiError::Status(status));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}
