//! Resolved run settings
//!
//! Merges command-line arguments (which already include `MEDOC_*`
//! environment values) with the TOML config. Store coordinates are passed
//! through unchecked; the sink validates them before any work starts.

use crate::cli::RunArgs;
use crate::models::facets::{is_selectable, UNSELECTABLE_FACETS};
use crate::models::FacetSet;
use crate::provider::http::DEFAULT_REQUESTS_PER_SECOND;
use crate::provider::{DirectoryProvider, HttpProvider, MetadataProvider};
use crate::sink::SinkConfig;
use medoc_common::config::TomlConfig;
use medoc_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where title metadata comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSettings {
    Http { base_url: String, requests_per_second: u32 },
    Directory(PathBuf),
}

impl ProviderSettings {
    pub fn build(&self) -> Result<Arc<dyn MetadataProvider>> {
        match self {
            ProviderSettings::Http {
                base_url,
                requests_per_second,
            } => {
                let provider = HttpProvider::new(base_url.clone(), *requests_per_second)
                    .map_err(|e| Error::Config(format!("HTTP provider setup failed: {}", e)))?;
                Ok(Arc::new(provider))
            }
            ProviderSettings::Directory(dir) => {
                if !dir.is_dir() {
                    return Err(Error::Config(format!(
                        "Provider directory {} does not exist",
                        dir.display()
                    )));
                }
                Ok(Arc::new(DirectoryProvider::new(dir.clone())))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub ids_file: PathBuf,
    pub facets: FacetSet,
    pub provider: ProviderSettings,
    pub sink: SinkConfig,
    /// `None` sizes the pool to the host
    pub workers: Option<usize>,
    pub error_log_dir: PathBuf,
    pub error_log_max_bytes: u64,
}

impl RunSettings {
    pub fn resolve(args: &RunArgs, root_folder: &Path, config: &TomlConfig) -> Result<Self> {
        Ok(Self {
            ids_file: args.ids.clone(),
            facets: resolve_facets(&args.facets)?,
            provider: resolve_provider(args, config)?,
            sink: SinkConfig::new(
                pick(&args.store_uri, &config.store.endpoint),
                pick(&args.namespace, &config.store.namespace),
                pick(&args.collection, &config.store.collection),
            ),
            workers: args.workers.or(config.workers),
            error_log_dir: args
                .error_log_dir
                .clone()
                .or_else(|| config.error_log.dir.clone())
                .unwrap_or_else(|| root_folder.to_path_buf()),
            error_log_max_bytes: args
                .error_log_max_bytes
                .unwrap_or_else(|| config.error_log.max_bytes_or_default()),
        })
    }
}

fn pick(cli: &Option<String>, config: &Option<String>) -> String {
    cli.clone().or_else(|| config.clone()).unwrap_or_default()
}

/// Unknown facet names are an error; `news`/`soundtrack` are warned about
/// and skipped by [`FacetSet::with_extras`]
fn resolve_facets(requested: &[String]) -> Result<FacetSet> {
    for name in requested.iter().map(|f| f.trim()).filter(|f| !f.is_empty()) {
        if !is_selectable(name) && !UNSELECTABLE_FACETS.contains(&name) {
            return Err(Error::InvalidInput(format!(
                "Unknown facet '{}' (see `medoc-ingest facets`)",
                name
            )));
        }
    }
    Ok(FacetSet::with_extras(requested))
}

fn resolve_provider(args: &RunArgs, config: &TomlConfig) -> Result<ProviderSettings> {
    let requests_per_second = args
        .requests_per_second
        .or(config.provider.requests_per_second)
        .unwrap_or(DEFAULT_REQUESTS_PER_SECOND);

    // A command-line source overrides either source from the config file
    if let Some(base_url) = &args.provider_url {
        return Ok(ProviderSettings::Http {
            base_url: base_url.clone(),
            requests_per_second,
        });
    }
    if let Some(dir) = &args.provider_dir {
        return Ok(ProviderSettings::Directory(dir.clone()));
    }
    if let Some(base_url) = &config.provider.base_url {
        return Ok(ProviderSettings::Http {
            base_url: base_url.clone(),
            requests_per_second,
        });
    }
    if let Some(dir) = &config.provider.dir {
        return Ok(ProviderSettings::Directory(dir.clone()));
    }

    Err(Error::Config(
        "No metadata provider configured (use --provider-url or --provider-dir)".to_string(),
    ))
}
