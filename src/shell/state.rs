use std::sync::Arc;

use crate::modules::tasks::service::TaskService;
use crate::modules::users::service::UserService;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskService>,
    pub users: Arc<UserService>,
}
