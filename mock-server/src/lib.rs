use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub user_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub user_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub user_id: Option<i64>,
}

/// In-memory collection. Ids are assigned sequentially starting at 1.
#[derive(Debug)]
pub struct Store {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            todos: BTreeMap::new(),
        }
    }

    /// Seed the store, keeping the given ids.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let mut store = Self::new();
        for todo in todos {
            store.next_id = store.next_id.max(todo.id + 1);
            store.todos.insert(todo.id, todo);
        }
        store
    }

    fn insert(&mut self, input: CreateTodo) -> Todo {
        let todo = Todo {
            id: self.next_id,
            title: input.title,
            completed: input.completed,
            user_id: input.user_id,
        };
        self.next_id += 1;
        self.todos.insert(todo.id, todo.clone());
        todo
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_store(Store::new())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    let todos: Vec<Todo> = store
        .todos
        .values()
        .filter(|todo| params.user_id.map_or(true, |owner| todo.user_id == owner))
        .cloned()
        .collect();
    tracing::debug!(user_id = ?params.user_id, count = todos.len(), "listed todos");
    Json(todos)
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    if input.title.trim().is_empty() {
        tracing::debug!("rejected todo with blank title");
        return Err(StatusCode::BAD_REQUEST);
    }
    let todo = db.write().await.insert(input);
    tracing::debug!(id = todo.id, user_id = todo.user_id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    match store.todos.remove(&id) {
        Some(_) => {
            tracing::debug!(id, "deleted todo");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}
