use std::sync::Arc;

use seed::{RemoteSeed, SeedSource};

use super::{config::Config, database::UserStore, echo::ConnectionRegistry};

pub struct AppState {
    pub config: Config,
    pub store: UserStore,
    pub seed: Arc<dyn SeedSource>,
    pub connections: ConnectionRegistry,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let seed = Arc::new(RemoteSeed::new(config.seed_url.clone()));

        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: Config, seed: Arc<dyn SeedSource>) -> Arc<Self> {
        let store = UserStore::new(config.user_file_path.clone());

        Arc::new(Self {
            config,
            store,
            seed,
            connections: ConnectionRegistry::default(),
        })
    }
}
