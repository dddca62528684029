use service::repository::Repositories;

/// Shared router state: the repositories, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self { Self { repos } }
}
