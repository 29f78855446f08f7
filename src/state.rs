use std::sync::Arc;

use crate::lists::ListsService;
use crate::routes::JwtKeys;
use crate::store::{ListStore, TaskStore};
use crate::tasks::TasksService;

#[derive(Clone)]
pub struct AppState {
    pub lists: ListsService,
    pub tasks: TasksService,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new<S>(store: S, keys: JwtKeys) -> Self
    where
        S: ListStore + TaskStore + 'static,
    {
        let store = Arc::new(store);
        Self {
            lists: ListsService::new(store.clone()),
            tasks: TasksService::new(store),
            keys,
        }
    }
}
