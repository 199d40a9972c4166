// src/state.rs

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    catalog::Catalog,
    llm::{CompletionClient, GenerationSettings},
    random::RandomSource,
    soundscape::SoundscapeSelector,
    store::SessionStore,
    story::StoryGenerator,
    templates::Templates,
};

/// Shared by every request handler. Everything except the pool is read-only.
#[derive(Clone)]
pub struct AppState {
    // -------- Storage --------
    pub store: SessionStore,

    // -------- Services --------
    pub generator: StoryGenerator,
    pub selector: SoundscapeSelector,

    // -------- Static --------
    pub catalog: Arc<Catalog>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        client: Arc<dyn CompletionClient>,
        rng: Arc<dyn RandomSource>,
        settings: GenerationSettings,
    ) -> Result<Self, minijinja::Error> {
        let catalog = Arc::new(Catalog::standard());
        let generator = StoryGenerator::new(client, catalog.clone(), rng.clone(), settings);
        let selector = SoundscapeSelector::new(catalog.clone(), rng);

        Ok(Self {
            store: SessionStore::new(pool),
            generator,
            selector,
            catalog,
            templates: Arc::new(Templates::load()?),
        })
    }
}
