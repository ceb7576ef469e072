//! Kibela GraphQL API client.
//!
//! Two operations, each a plain authenticated POST with no retry:
//! - fetch: `noteFromPath` resolves the public note number to an internal ID,
//!   then `note` returns the title and markdown content
//! - update: `updateNoteContent` replaces the content, passing the fetched
//!   content as `baseContent` so concurrent edits are rejected server-side

mod note_url;

use std::time::Duration;

use kibela_toc_shared::{ApiError, KibelaConfig, KibelaTocError, Note, NoteRef, Result};
use reqwest::{Client, StatusCode, header};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub use note_url::{NoteUrl, parse_note_url};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("kibela-toc/", env!("CARGO_PKG_VERSION"));

/// Longest error body we echo back to the user.
const MAX_ERROR_BODY: usize = 500;

const NOTE_FROM_PATH_QUERY: &str = r#"
query($path: String!) {
  noteFromPath(path: $path) {
    id
  }
}
"#;

const NOTE_QUERY: &str = r#"
query($id: ID!) {
  note(id: $id) {
    id
    title
    content
  }
}
"#;

const UPDATE_NOTE_CONTENT_MUTATION: &str = r#"
mutation($input: UpdateNoteContentInput!) {
  updateNoteContent(input: $input) {
    clientMutationId
  }
}
"#;

// ---------------------------------------------------------------------------
// GraphQL envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Serialize)]
struct PathVariables<'a> {
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct IdVariables<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateVariables<'a> {
    input: UpdateNoteContentInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateNoteContentInput<'a> {
    id: &'a str,
    base_content: &'a str,
    new_content: &'a str,
    touch: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteFromPathData {
    note_from_path: Option<NodeId>,
}

#[derive(Debug, Deserialize)]
struct NodeId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct NoteData {
    note: Option<Note>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateNoteContentData {
    update_note_content: Option<IgnoredAny>,
}

// ---------------------------------------------------------------------------
// KibelaClient
// ---------------------------------------------------------------------------

/// Authenticated client for one Kibela team.
#[derive(Debug, Clone)]
pub struct KibelaClient {
    http: Client,
    config: KibelaConfig,
}

impl KibelaClient {
    /// Build a client from the runtime configuration.
    pub fn new(config: &KibelaConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KibelaTocError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Fetch a note's title and markdown content by its public number.
    #[instrument(skip_all, fields(note = %note))]
    pub async fn fetch_note(&self, note: &NoteRef) -> Result<Note> {
        let path = self.config.note_url(note.as_str());
        debug!(%path, "resolving internal note ID");

        let data: NoteFromPathData = self
            .execute(NOTE_FROM_PATH_QUERY, PathVariables { path: &path })
            .await
            .map_err(|e| KibelaTocError::fetch(note, e))?;
        let id = data
            .note_from_path
            .ok_or_else(|| KibelaTocError::fetch(note, ApiError::NotFound))?
            .id;

        debug!(%id, "fetching note content");

        let data: NoteData = self
            .execute(NOTE_QUERY, IdVariables { id: &id })
            .await
            .map_err(|e| KibelaTocError::fetch(note, e))?;
        let fetched = data
            .note
            .ok_or_else(|| KibelaTocError::fetch(note, ApiError::NotFound))?;

        info!(
            id = %fetched.id,
            title = %fetched.title,
            len = fetched.content.len(),
            "note fetched"
        );

        Ok(fetched)
    }

    /// Replace the content of a previously fetched note.
    ///
    /// `number` is the public note number `note` was fetched by; errors name it.
    #[instrument(skip_all, fields(note = %number, id = %note.id))]
    pub async fn update_note_content(
        &self,
        number: &NoteRef,
        note: &Note,
        new_content: &str,
    ) -> Result<()> {
        let variables = UpdateVariables {
            input: UpdateNoteContentInput {
                id: &note.id,
                base_content: &note.content,
                new_content,
                touch: true,
            },
        };

        let data: UpdateNoteContentData = self
            .execute(UPDATE_NOTE_CONTENT_MUTATION, variables)
            .await
            .map_err(|e| KibelaTocError::update(number, e))?;

        if data.update_note_content.is_none() {
            return Err(KibelaTocError::update(
                number,
                ApiError::GraphQl("update was not applied".into()),
            ));
        }

        info!(len = new_content.len(), "note updated");
        Ok(())
    }

    /// POST one GraphQL operation and unwrap its `data`.
    async fn execute<V, T>(&self, query: &str, variables: V) -> std::result::Result<T, ApiError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.token)
            .header(header::ACCEPT, "application/json")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        let envelope: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(ApiError::GraphQl(messages.join("; ")));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response has neither data nor errors".into()))
    }
}

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
