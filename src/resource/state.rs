//! Observable state of a [`Resource`](super::Resource).

use serde::Serialize;

use crate::retry::Generation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A fetch (or its automatic retry) is in flight
    Loading,
    Success,
    /// Terminal failure after the automatic retry
    Error,
}

/// What a consumer renders: the latest data, the latest error, and whether
/// a fetch is running.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub status: FetchStatus,
    /// Last successfully fetched data. Kept while reloading and after errors.
    pub data: Option<T>,
    pub error: Option<String>,
    /// Generation of the trigger this state belongs to
    pub generation: Generation,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            status: FetchStatus::Idle,
            data: None,
            error: None,
            generation: Generation::default(),
        }
    }
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    /// Finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self.status, FetchStatus::Success | FetchStatus::Error)
    }
}
