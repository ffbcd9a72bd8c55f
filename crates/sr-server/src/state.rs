//! Shared server state and its start-up loading.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use sr_graph::RoadGraph;
use sr_route::{BatchRouteOrchestrator, RoutingConfig};

/// Everything a handler needs.  Immutable after start-up.
pub struct AppState {
    pub orchestrator: Arc<BatchRouteOrchestrator>,
}

impl AppState {
    pub fn new(graph: Arc<RoadGraph>, config: RoutingConfig) -> Result<Self> {
        let orchestrator =
            BatchRouteOrchestrator::new(graph, config).context("invalid routing configuration")?;
        Ok(Self { orchestrator: Arc::new(orchestrator) })
    }

    pub fn graph(&self) -> &RoadGraph {
        self.orchestrator.graph()
    }
}

/// Read a JSON [`RoutingConfig`]; `None` gives the defaults.
pub fn load_config(path: Option<&Path>) -> Result<RoutingConfig> {
    let Some(path) = path else {
        return Ok(RoutingConfig::default());
    };
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening config {}", path.display()))?;
    let config: RoutingConfig = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate().with_context(|| format!("validating config {}", path.display()))?;
    Ok(config)
}
