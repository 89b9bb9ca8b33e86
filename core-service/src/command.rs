//! Everything the presentation layer can ask of the catalog.

use core_library::{
    AdvancedFilter, Category, MediaDraft, MediaId, MediaPatch, MediaRecord, SortDirection, SortKey,
};
use core_metadata::{ExternalCandidate, SearchOutcome};
use serde::{Deserialize, Serialize};

/// A single user intent, handled by [`CatalogService::dispatch`](crate::CatalogService::dispatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum Command {
    /// Fetch the whole collection again.
    Reload,
    SetCategory(Category),
    /// Live local filter text.
    SetSearch(String),
    /// Search box submission; routed by the active category.
    QuickSearch(String),
    SetAdvanced(AdvancedFilter),
    ClearAdvanced,
    SelectTag(String),
    DeselectTag(String),
    ToggleTag(String),
    ClearTags,
    SetSort {
        key: SortKey,
        direction: SortDirection,
    },
    ToggleFavorite(MediaId),
    ToggleWatched(MediaId),
    IncrementViews(MediaId),
    Update {
        id: MediaId,
        patch: MediaPatch,
    },
    Delete(MediaId),
    Add(MediaDraft),
    AddFromExternal(ExternalCandidate),
    /// Replace the local collection with an exported snapshot document.
    Import(String),
}

impl Command {
    /// Whether the command goes through the remote store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::ToggleFavorite(_)
                | Command::ToggleWatched(_)
                | Command::IncrementViews(_)
                | Command::Update { .. }
                | Command::Delete(_)
                | Command::Add(_)
                | Command::AddFromExternal(_)
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Reload => "reload",
            Command::SetCategory(_) => "set_category",
            Command::SetSearch(_) => "set_search",
            Command::QuickSearch(_) => "quick_search",
            Command::SetAdvanced(_) => "set_advanced",
            Command::ClearAdvanced => "clear_advanced",
            Command::SelectTag(_) => "select_tag",
            Command::DeselectTag(_) => "deselect_tag",
            Command::ToggleTag(_) => "toggle_tag",
            Command::ClearTags => "clear_tags",
            Command::SetSort { .. } => "set_sort",
            Command::ToggleFavorite(_) => "toggle_favorite",
            Command::ToggleWatched(_) => "toggle_watched",
            Command::IncrementViews(_) => "increment_views",
            Command::Update { .. } => "update",
            Command::Delete(_) => "delete",
            Command::Add(_) => "add",
            Command::AddFromExternal(_) => "add_from_external",
            Command::Import(_) => "import",
        }
    }
}

/// What a successfully handled command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// State changed and the view was re-derived.
    Applied,
    /// Nothing to do (e.g. the tag was already selected).
    Unchanged,
    /// The remote store confirmed a new record.
    Created(MediaRecord),
    /// External search results for the caller to present.
    SearchResults(SearchOutcome),
}
