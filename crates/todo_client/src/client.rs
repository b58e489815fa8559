use std::{
    collections::BTreeMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use crate::{
    alert::{Alert, Severity},
    api::TodoApi,
    config::ClientConfig,
    error::ClientError,
    types::{NewTodo, Todo, TodoId, TodoUpdate},
};

pub type SubscriptionId = u64;
type Observer = Arc<dyn Fn(&ClientState) + Send + Sync>;

/// User-facing alert texts.
pub mod messages {
    pub const LOAD_FAILED: &str = "Error loading todos. Please try again.";
    pub const TITLE_REQUIRED: &str = "Please enter a title for the todo.";
    pub const CREATED: &str = "Todo created successfully!";
    pub const CREATE_FAILED: &str = "Error creating todo";
    pub const CREATE_RETRY: &str = "Error creating todo. Please try again.";
    pub const UPDATED: &str = "Todo updated successfully!";
    pub const UPDATE_FAILED: &str = "Error updating todo";
    pub const UPDATE_RETRY: &str = "Error updating todo. Please try again.";
    pub const DELETED: &str = "Todo deleted successfully!";
    pub const DELETE_FAILED: &str = "Error deleting todo";
    pub const DELETE_RETRY: &str = "Error deleting todo. Please try again.";
    pub const CONFIRM_DELETE: &str = "Are you sure you want to delete this todo?";
}

/// Snapshot handed to observers and returned by [`TodoClient::state`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub alert: Option<Alert>,
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

struct Inner {
    state: ClientState,
    // Bumped on every new alert so a stale timer cannot clear its successor.
    alert_generation: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    observers: Mutex<BTreeMap<SubscriptionId, Observer>>,
    next_subscription_id: AtomicU64,
    alert_timeout: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut ClientState)) {
        apply(&mut self.lock().state);
        self.notify();
    }

    /// Clears the alert. With `generation`, only if that alert is still shown.
    fn clear_alert(&self, generation: Option<u64>) {
        let cleared = {
            let mut inner = self.lock();
            let current = generation.is_none_or(|generation| generation == inner.alert_generation);
            current && inner.state.alert.take().is_some()
        };
        if cleared {
            self.notify();
        }
    }

    fn notify(&self) {
        let snapshot = self.lock().state.clone();
        let observers: Vec<Observer> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for observer in observers {
            observer(&snapshot);
        }
    }
}

/// Mirrors the server's todo list and owns the single transient alert.
///
/// Every mutation is followed by a full refresh of the list; failures are
/// reported through the alert and never returned to the caller.
pub struct TodoClient<A> {
    api: Arc<A>,
    shared: Arc<Shared>,
}

impl<A> Clone for TodoClient<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: TodoApi> TodoClient<A> {
    /// The list counts as loading until the first [`TodoClient::mount`].
    pub fn new(api: A, config: &ClientConfig) -> Self {
        Self {
            api: Arc::new(api),
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: ClientState {
                        loading: true,
                        ..ClientState::default()
                    },
                    alert_generation: 0,
                }),
                observers: Mutex::new(BTreeMap::new()),
                next_subscription_id: AtomicU64::new(1),
                alert_timeout: config.alert_timeout,
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> ClientState {
        self.shared.lock().state.clone()
    }

    /// Calls `handler` with a fresh snapshot after every state change.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ClientState) + Send + Sync + 'static,
    {
        let id = self
            .shared
            .next_subscription_id
            .fetch_add(1, Ordering::Relaxed);
        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(handler));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Initial load.
    pub async fn mount(&self) -> bool {
        self.refresh().await
    }

    /// Replaces the list with the server's. On failure the previous list is
    /// kept and an alert is raised.
    pub async fn refresh(&self) -> bool {
        self.shared.update(|state| state.loading = true);

        let result = self.api.list().await;
        let loaded = match result {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "todos loaded");
                self.shared.update(|state| state.todos = todos);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading todos failed");
                self.show_alert(messages::LOAD_FAILED, Severity::Danger);
                false
            }
        };

        self.shared.update(|state| state.loading = false);
        loaded
    }

    /// Returns whether the todo was created, so a form knows to reset.
    pub async fn create(&self, title: &str, description: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            self.show_alert(messages::TITLE_REQUIRED, Severity::Warning);
            return false;
        }

        let description = description.trim();
        let new_todo = NewTodo {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            is_done: false,
        };

        match self.api.create(&new_todo).await {
            Ok(created) => {
                if let Some(todo) = created {
                    tracing::debug!(todo_id = todo.id, "todo created");
                }
                self.refresh().await;
                self.show_alert(messages::CREATED, Severity::Success);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "creating todo failed");
                let message = match &err {
                    ClientError::Status { message, .. } => match message {
                        Some(message) => format!("{}: {message}", messages::CREATE_FAILED),
                        None => messages::CREATE_FAILED.to_string(),
                    },
                    _ => messages::CREATE_RETRY.to_string(),
                };
                self.show_alert(message, Severity::Danger);
                false
            }
        }
    }

    /// Reads the todo, then writes it back with `is_done` flipped. A change
    /// made elsewhere between the two calls is overwritten.
    pub async fn toggle(&self, id: TodoId) -> bool {
        let current = match self.api.get(id).await {
            Ok(todo) => todo,
            Err(err) => {
                tracing::warn!(todo_id = id, error = %err, "reading todo before toggle failed");
                self.show_alert(messages::UPDATE_RETRY, Severity::Danger);
                return false;
            }
        };

        match self.api.update(id, &TodoUpdate::toggled(&current)).await {
            Ok(_) => {
                self.refresh().await;
                self.show_alert(messages::UPDATED, Severity::Success);
                true
            }
            Err(err) => {
                tracing::warn!(todo_id = id, error = %err, "updating todo failed");
                self.show_alert(
                    failure_message(&err, messages::UPDATE_FAILED, messages::UPDATE_RETRY),
                    Severity::Danger,
                );
                false
            }
        }
    }

    /// Does nothing unless `confirm` approves.
    pub async fn delete(&self, id: TodoId, confirm: &impl Confirm) -> bool {
        if !confirm.confirm(messages::CONFIRM_DELETE) {
            return false;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.refresh().await;
                self.show_alert(messages::DELETED, Severity::Success);
                true
            }
            Err(err) => {
                tracing::warn!(todo_id = id, error = %err, "deleting todo failed");
                self.show_alert(
                    failure_message(&err, messages::DELETE_FAILED, messages::DELETE_RETRY),
                    Severity::Danger,
                );
                false
            }
        }
    }

    /// Replaces the current alert and restarts the auto-clear countdown.
    pub fn show_alert(&self, message: impl Into<String>, severity: Severity) {
        let generation = {
            let mut inner = self.shared.lock();
            inner.alert_generation += 1;
            inner.state.alert = Some(Alert::new(message, severity));
            inner.alert_generation
        };
        self.shared.notify();

        if !self.shared.alert_timeout.is_zero() {
            self.schedule_alert_clear(generation);
        }
    }

    pub fn dismiss_alert(&self) {
        self.shared.clear_alert(None);
    }

    fn schedule_alert_clear(&self, generation: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no tokio runtime; alert stays until dismissed");
            return;
        };
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        let timeout = self.shared.alert_timeout;
        runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(shared) = shared.upgrade() {
                shared.clear_alert(Some(generation));
            }
        });
    }
}

// Non-2xx answers get the short message, failed round trips the retry hint.
fn failure_message(err: &ClientError, rejected: &str, retry: &str) -> String {
    match err {
        ClientError::Status { .. } => rejected.to_string(),
        ClientError::Transport(_) | ClientError::Decode(_) => retry.to_string(),
    }
}
