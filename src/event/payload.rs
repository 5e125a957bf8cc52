//! Typed GitHub webhook payload shapes
//!
//! Only the fields the normalizer derives from are modeled; everything else in
//! the delivery is ignored. Timestamps stay raw strings here and are parsed in
//! the normalizer, where a bad value is a hard error rather than a shape
//! mismatch.

use serde::Deserialize;

/// Body of a `push` delivery
#[derive(Debug, Clone, Deserialize)]
pub struct PushPayload {
    /// Full ref that was pushed, e.g. `refs/heads/main`
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub pusher: Pusher,
    pub head_commit: HeadCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pusher {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadCommit {
    pub id: String,
    pub timestamp: String,
}

/// Body of a `pull_request` delivery
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    /// Inner lifecycle action: `opened`, `synchronize`, `closed`, ...
    pub action: String,
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub user: Actor,
    pub head: BranchRef,
    pub base: BranchRef,
    pub created_at: String,
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub merged_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Actor {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub name: String,
}
