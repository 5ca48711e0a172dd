//! Request payloads and the validated values parsed out of them.
//!
//! Payload fields are kept as raw `serde_json::Value`s, so a field of the wrong JSON type is a
//! validation error with a precise message instead of a generic deserialization failure.

use derive_more::Deref;
use lazy_regex::regex_is_match;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use uuid::Uuid;

// ###################################
// ->   PAYLOADS
// ###################################
/// Body of `POST /api/subscribe`
#[derive(Debug, Default)]
pub struct SubscribePayload {
    pub email: Option<Value>,
}

/// Body of `POST /api/posts`
#[derive(Debug, Default)]
pub struct NewPostPayload {
    pub title: Option<Value>,
    pub content: Option<Value>,
    pub author: Option<Value>,
}

/// Fields are only ever read by name. A body that isn't a JSON object has none, so arrays
/// can't fill fields by position.
fn object_fields<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Map::new()),
    }
}

impl<'de> Deserialize<'de> for SubscribePayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = object_fields(deserializer)?;
        Ok(SubscribePayload {
            email: fields.remove("email"),
        })
    }
}

impl<'de> Deserialize<'de> for NewPostPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = object_fields(deserializer)?;
        Ok(NewPostPayload {
            title: fields.remove("title"),
            content: fields.remove("content"),
            author: fields.remove("author"),
        })
    }
}

// ###################################
// ->   EMAIL
// ###################################
/// A trimmed, lowercased email of the `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ValidEmail> for String {
    fn from(value: ValidEmail) -> Self {
        value.0
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();
        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        let value = value.trim();
        if !regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value) {
            return Err(DataParsingError::EmailInvalid);
        }

        Ok(ValidEmail(value.to_lowercase()))
    }
}

impl TryFrom<SubscribePayload> for ValidEmail {
    type Error = DataParsingError;

    fn try_from(payload: SubscribePayload) -> Result<Self, Self::Error> {
        match payload.email {
            Some(Value::String(email)) => ValidEmail::parse(email),
            _ => Err(DataParsingError::EmailMissing),
        }
    }
}

// ###################################
// ->   POST
// ###################################
/// Trimmed text that is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct PostText(String);

impl From<PostText> for String {
    fn from(value: PostText) -> Self {
        value.0
    }
}

impl PostText {
    fn parse(value: Option<Value>) -> Option<Self> {
        match value {
            Some(Value::String(text)) if !text.trim().is_empty() => {
                Some(PostText(text.trim().to_string()))
            }
            _ => None,
        }
    }
}

/// A post ready to be stored
#[derive(Debug, Clone)]
pub struct ValidPost {
    pub title: PostText,
    pub content: PostText,
    pub author: Option<String>,
}

impl TryFrom<NewPostPayload> for ValidPost {
    type Error = DataParsingError;

    fn try_from(payload: NewPostPayload) -> Result<Self, Self::Error> {
        let title = PostText::parse(payload.title).ok_or(DataParsingError::TitleMissing)?;
        let content = PostText::parse(payload.content).ok_or(DataParsingError::ContentMissing)?;

        let author = match payload.author {
            None | Some(Value::Null) => None,
            Some(Value::String(author)) => Some(author.trim().to_string()).filter(|a| !a.is_empty()),
            Some(_) => return Err(DataParsingError::AuthorInvalid),
        };

        Ok(ValidPost {
            title,
            content,
            author,
        })
    }
}

/// A post identifier in the store's format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct PostId(Uuid);

impl PostId {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();
        // Only the canonical hyphenated form, not the simple, braced or urn ones.
        if value.len() != 36 {
            return Err(DataParsingError::PostIdInvalid);
        }

        Uuid::try_parse(value)
            .map(PostId)
            .map_err(|_| DataParsingError::PostIdInvalid)
    }
}

// ###################################
// ->   ERROR
// ###################################
/// The messages double as the client-facing error text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataParsingError {
    #[error("Email is required")]
    EmailMissing,
    #[error("Invalid email format")]
    EmailInvalid,

    #[error("Title is required")]
    TitleMissing,
    #[error("Content is required")]
    ContentMissing,
    #[error("Author must be a string")]
    AuthorInvalid,

    #[error("Invalid post ID format")]
    PostIdInvalid,
}
