use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;

use crate::config::PluginOptions;
use crate::core::classifier::UrlClassifier;
use crate::core::interceptor::SearchInterceptor;
use crate::host::resolver::DelegateResolver;
use crate::host::{Plugin, PlayerManager, SearchDelegate, TrackResolver};
use crate::sources::deezer::DeezerCatalog;
use crate::sources::CatalogSource;

/// Makes a [`PlayerManager`] understand Deezer track, album and playlist URLs.
pub struct DeezerPlugin {
    options: PluginOptions,
    catalog: Arc<dyn CatalogSource>,
    classifier_host: Option<String>,
    resolver: Option<Arc<dyn TrackResolver>>,
}

impl DeezerPlugin {
    /// Validates `options` and talks to the public Deezer API.
    /// Invalid options fail here with a [`crate::error::ConfigurationError`].
    pub fn new(options: &Value) -> Result<Self> {
        let options = PluginOptions::from_value(options)?;
        let catalog = DeezerCatalog::new(&options)?;
        Ok(Self::with_catalog(options, Arc::new(catalog)))
    }

    pub fn with_catalog(options: PluginOptions, catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            options,
            catalog,
            classifier_host: None,
            resolver: None,
        }
    }

    /// Matches URLs on `host` instead of deezer.com.
    pub fn with_url_host(mut self, host: impl Into<String>) -> Self {
        self.classifier_host = Some(host.into());
        self
    }

    /// Resolver used for eager resolution. Defaults to searching the host's original search.
    pub fn with_resolver(mut self, resolver: Arc<dyn TrackResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    fn interceptor(&self, original: Arc<dyn SearchDelegate>) -> SearchInterceptor {
        let mut interceptor = SearchInterceptor::new(Arc::clone(&self.catalog), Arc::clone(&original));

        if let Some(host) = &self.classifier_host {
            interceptor = interceptor.with_classifier(UrlClassifier::new(host));
        }

        if self.options.eager_resolve {
            let resolver = self
                .resolver
                .clone()
                .unwrap_or_else(|| Arc::new(DelegateResolver::new(original)) as Arc<dyn TrackResolver>);
            interceptor = interceptor.with_eager_resolution(resolver);
        }

        interceptor
    }
}

impl Plugin for DeezerPlugin {
    fn load(&self, manager: &mut PlayerManager) {
        manager.replace_search(|original| {
            Arc::new(self.interceptor(original)) as Arc<dyn SearchDelegate>
        });
        log::info!(
            "{} plugin loaded (eager resolution {})",
            self.catalog.name(),
            if self.options.eager_resolve { "on" } else { "off" }
        );
    }
}
