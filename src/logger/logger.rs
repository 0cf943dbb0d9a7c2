use anyhow::{Result, anyhow};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

const BOOTSTRAP_FILTER: &str = "info";

/// Global subscriber whose filter can be swapped once settings are loaded.
pub struct Logger {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl Logger {
    /// Installs the subscriber at `info` so settings parsing can already log.
    /// Call once per process.
    pub fn new_bootstrap() -> Self {
        let (filter_layer, filter) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_FILTER));

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().with_target(true))
            .init();

        Self { filter }
    }

    /// Replaces the active filter, e.g. with `settings.log.filter`.
    pub fn set_filter(&self, directives: &str) -> Result<()> {
        let filter = EnvFilter::try_new(directives)
            .map_err(|e| anyhow!("invalid log filter {directives:?}: {e}"))?;
        self.filter.reload(filter).map_err(|e| anyhow!(e))?;
        Ok(())
    }
}
