//! Application state for the Little Lemon terminal client.
//!
//! `App` is the composition root: it owns the configuration, the user
//! preferences, the menu store and the single background task that
//! populates it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use littlelemon_core::{
    ApiClient, CacheError, CacheManager, Config, LiveQuery, MenuEntry, MenuStore, Population,
    UserPrefs,
};

type PopulationTask = JoinHandle<Result<Population, CacheError>>;

pub struct App {
    pub config: Config,
    pub prefs: UserPrefs,
    pub menu: Arc<CacheManager<ApiClient>>,
    population: Option<PopulationTask>,
}

impl App {
    /// Create the app using the standard config directory for preferences
    pub fn new(config: Config) -> Result<Self> {
        let prefs_dir = Config::config_dir()?;
        Self::with_dirs(config, prefs_dir)
    }

    pub fn with_dirs(config: Config, prefs_dir: PathBuf) -> Result<Self> {
        let prefs = UserPrefs::load(prefs_dir)?;

        let cache_dir = config.cache_dir()?;
        debug!(?cache_dir, "Cache directory configured");
        let store = MenuStore::open(&cache_dir).context("Failed to open menu cache")?;

        let api = ApiClient::with_options(config.menu_url(), config.request_timeout())
            .context("Failed to create API client")?;

        Ok(Self {
            config,
            prefs,
            menu: Arc::new(CacheManager::new(Arc::new(store), api)),
            population: None,
        })
    }

    /// Fail unless onboarding has been completed
    pub fn require_registered(&self) -> Result<()> {
        if self.prefs.is_registered() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Onboarding not completed. Run `littlelemon register <first> <last> <email>` first."
            ))
        }
    }

    pub fn is_populating(&self) -> bool {
        self.population.is_some()
    }

    /// Spawn the background task that fills the menu cache if it is empty.
    ///
    /// Does nothing for unregistered users or when the task is already running.
    pub fn start_population(&mut self) {
        if self.population.is_some() {
            return;
        }
        if !self.prefs.is_registered() {
            debug!("User not registered, menu population skipped");
            return;
        }

        let menu = Arc::clone(&self.menu);
        self.population = Some(tokio::spawn(async move {
            let outcome = menu.ensure_populated().await;
            match &outcome {
                Ok(population) => debug!(?population, "Menu population finished"),
                Err(e) => warn!(error = %e, "Menu population failed"),
            }
            outcome
        }));
    }

    /// Resolve a query once the menu is available.
    ///
    /// Returns immediately when the cache already has rows. Otherwise waits
    /// for the first table change or for the population task to finish,
    /// whichever comes first.
    pub async fn wait_for_menu(&mut self, query: &mut LiveQuery) -> Result<Vec<MenuEntry>> {
        if !self.menu.is_empty() {
            return Ok(query.current());
        }
        let Some(task) = self.population.as_mut() else {
            return Ok(query.current());
        };

        let joined = tokio::select! {
            rows = query.changed() => return Ok(rows.unwrap_or_default()),
            joined = task => joined,
        };
        self.population = None;

        match joined {
            Ok(Ok(_)) => Ok(query.current()),
            Ok(Err(e)) => Err(anyhow::Error::new(e).context("Menu is not available")),
            Err(e) => Err(anyhow::Error::new(e).context("Menu population task failed")),
        }
    }

    /// Cancel population if it is still running
    pub async fn shutdown(&mut self) {
        if let Some(task) = self.population.take() {
            if !task.is_finished() {
                info!("Cancelling menu population");
            }
            task.abort();
            let _ = task.await;
        }
    }
}
