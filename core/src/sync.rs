//! Client-side state for one owner's todo list.
//!
//! # Design
//! `TodoSync` owns the list, the optimistic placeholder, the in-flight delete
//! set, the filter, the input draft and the error banner. It never performs
//! I/O: every remote operation is a `begin_*` call that returns the request
//! to send and a `finish_*` call that applies the host-reported outcome. The
//! host may keep any number of requests outstanding and finish them in any
//! order; state only changes inside these calls.
//!
//! Remote failures are never fatal. They are mapped onto the banner and also
//! returned so the caller can react (for example, keep the input text).

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::banner::{ErrorBanner, ErrorKind};
use crate::client::TodoClient;
use crate::config::SyncConfig;
use crate::error::{ApiError, ConfigError, SyncError};
use crate::filter::Filter;
use crate::http::{Exchange, HttpRequest};
use crate::types::{NewTodo, Todo, TodoId};

#[derive(Debug, Clone)]
struct PendingCreate {
    placeholder: Todo,
    from_draft: bool,
}

#[derive(Debug, Clone)]
pub struct TodoSync {
    client: TodoClient,
    todos: Vec<Todo>,
    pending: Option<PendingCreate>,
    in_flight: BTreeSet<TodoId>,
    loading: bool,
    filter: Filter,
    draft: String,
    banner: ErrorBanner,
}

impl TodoSync {
    pub fn new(client: TodoClient, error_timeout: Duration) -> Self {
        Self {
            client,
            todos: Vec::new(),
            pending: None,
            in_flight: BTreeSet::new(),
            loading: false,
            filter: Filter::default(),
            draft: String::new(),
            banner: ErrorBanner::new(error_timeout),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = TodoClient::new(&config.base_url, config.owner_id);
        Ok(Self::new(client, config.error_timeout()))
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    // -----------------------------------------------------------------------
    // View state
    // -----------------------------------------------------------------------

    /// Persisted items in server order.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Persisted items passing the current filter.
    pub fn visible(&self) -> impl Iterator<Item = &Todo> {
        self.filter.apply(&self.todos)
    }

    /// The unsaved item shown while a create is pending. Never filtered.
    pub fn placeholder(&self) -> Option<&Todo> {
        self.pending.as_ref().map(|p| &p.placeholder)
    }

    /// True while the item's delete request is outstanding.
    pub fn is_busy(&self, id: TodoId) -> bool {
        self.in_flight.contains(&id)
    }

    pub fn in_flight(&self) -> impl Iterator<Item = TodoId> + '_ {
        self.in_flight.iter().copied()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// "N items left".
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|t| t.completed)
    }

    /// The input accepts submissions only while no create is pending.
    pub fn can_submit(&self) -> bool {
        self.pending.is_none()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn error(&self) -> Option<ErrorKind> {
        self.banner.current()
    }

    pub fn error_deadline(&self) -> Option<Instant> {
        self.banner.deadline()
    }

    pub fn dismiss_error(&mut self) {
        self.banner.dismiss();
    }

    /// Advance the banner timer. Returns true when an error was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.banner.expire(now)
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Start fetching the owner's list. Re-arms the banner auto-clear.
    pub fn begin_load(&mut self, now: Instant) -> HttpRequest {
        self.loading = true;
        self.banner.rearm(now);
        tracing::debug!(owner_id = self.client.owner_id(), "loading todos");
        self.client.build_list_todos()
    }

    /// Replace the list with the fetched one. Returns the number of items.
    pub fn finish_load(&mut self, exchange: Exchange, now: Instant) -> Result<usize, ApiError> {
        self.loading = false;
        match exchange.and_then(|response| self.client.parse_list_todos(response)) {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "todos loaded");
                self.todos = todos;
                Ok(self.todos.len())
            }
            Err(err) => {
                tracing::warn!(%err, "failed to load todos");
                self.banner.raise(ErrorKind::LoadFailed, now);
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Validate `title`, show the placeholder and build the create request.
    ///
    /// A blank title raises the banner and builds nothing. A second create
    /// while one is pending is refused without touching the banner.
    pub fn begin_create(&mut self, title: &str, now: Instant) -> Result<HttpRequest, SyncError> {
        self.start_create(title, false, now)
    }

    /// `begin_create` with the current draft. The draft is cleared only when
    /// the create succeeds.
    pub fn submit(&mut self, now: Instant) -> Result<HttpRequest, SyncError> {
        let draft = self.draft.clone();
        self.start_create(&draft, true, now)
    }

    fn start_create(&mut self, title: &str, from_draft: bool, now: Instant) -> Result<HttpRequest, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            self.banner.raise(ErrorKind::EmptyTitle, now);
            return Err(SyncError::EmptyTitle);
        }
        if self.pending.is_some() {
            return Err(SyncError::CreatePending);
        }

        let input = NewTodo {
            title: title.to_string(),
            completed: false,
            user_id: self.client.owner_id(),
        };
        let request = self.client.build_create_todo(&input)?;
        self.pending = Some(PendingCreate {
            placeholder: Todo::placeholder(title, self.client.owner_id()),
            from_draft,
        });
        tracing::debug!(title, "creating todo");
        Ok(request)
    }

    /// Apply the create outcome. The placeholder is gone either way; on
    /// failure the error is returned so the caller keeps its input.
    pub fn finish_create(&mut self, exchange: Exchange, now: Instant) -> Result<Todo, ApiError> {
        let pending = self.pending.take();
        match exchange.and_then(|response| self.client.parse_create_todo(response)) {
            Ok(todo) => {
                tracing::debug!(id = todo.id, "todo created");
                self.insert(todo.clone());
                if pending.is_some_and(|p| p.from_draft) {
                    self.draft.clear();
                }
                Ok(todo)
            }
            Err(err) => {
                tracing::warn!(%err, "failed to create todo");
                self.banner.raise(ErrorKind::AddFailed, now);
                Err(err)
            }
        }
    }

    fn insert(&mut self, todo: Todo) {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => {
                tracing::warn!(id = todo.id, "server returned an id already in the list");
                *existing = todo;
            }
            None => self.todos.push(todo),
        }
    }

    // -----------------------------------------------------------------------
    // Remove
    // -----------------------------------------------------------------------

    /// Mark `id` busy and build its delete request.
    ///
    /// Returns `None` for the placeholder, for ids not in the list, and for
    /// ids whose delete is already outstanding.
    pub fn begin_remove(&mut self, id: TodoId) -> Option<HttpRequest> {
        if !self.todos.iter().any(|t| t.id == id && !t.is_placeholder()) {
            tracing::debug!(id, "ignoring delete for unknown todo");
            return None;
        }
        if !self.in_flight.insert(id) {
            return None;
        }
        tracing::debug!(id, "deleting todo");
        Some(self.client.build_delete_todo(id))
    }

    /// Apply the delete outcome. `id` leaves the in-flight set regardless.
    pub fn finish_remove(&mut self, id: TodoId, exchange: Exchange, now: Instant) -> Result<(), ApiError> {
        self.in_flight.remove(&id);
        match exchange.and_then(|response| self.client.parse_delete_todo(response)) {
            Ok(()) => {
                self.todos.retain(|t| t.id != id);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(id, %err, "failed to delete todo");
                self.banner.raise(ErrorKind::DeleteFailed, now);
                Err(err)
            }
        }
    }

    /// One independent delete per completed item. Each must be finished with
    /// `finish_remove`; there is no batch outcome.
    pub fn clear_completed(&mut self) -> Vec<(TodoId, HttpRequest)> {
        let ids: Vec<TodoId> = self
            .todos
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.begin_remove(id).map(|request| (id, request)))
            .collect()
    }
}
