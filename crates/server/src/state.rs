use service::activity::ActivityService;

/// Shared handle passed to every handler through axum `State`.
#[derive(Clone)]
pub struct ServerState {
    pub activities: ActivityService,
}

impl ServerState {
    pub fn new(activities: ActivityService) -> Self {
        Self { activities }
    }
}
