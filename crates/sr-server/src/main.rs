use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sr_graph::sqlite::{load_sqlite, BBox};
use sr_graph::load_csv;
use sr_server::{build_router, load_config, AppState};

/// Multi-stop road routing service.
#[derive(Parser, Debug)]
#[command(name = "stoproute", version, about)]
struct Cli {
    /// Vertex table of a CSV snapshot (`id,lat,lon`).
    #[arg(long, requires = "ways", conflicts_with = "sqlite")]
    vertices: Option<PathBuf>,

    /// Way table of a CSV snapshot.
    #[arg(long, requires = "vertices")]
    ways: Option<PathBuf>,

    /// SQLite snapshot with `ways` and `ways_vertices_pgr` tables.
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Only load the SQLite snapshot inside `min_lat,min_lon,max_lat,max_lon`.
    #[arg(long, requires = "sqlite", value_parser = parse_bbox)]
    bbox: Option<BBox>,

    /// JSON routing configuration; defaults apply to omitted fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

fn parse_bbox(s: &str) -> Result<BBox, String> {
    let v: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match v[..] {
        [min_lat, min_lon, max_lat, max_lon] if min_lat <= max_lat && min_lon <= max_lon => {
            Ok(BBox { min_lat, min_lon, max_lat, max_lon })
        }
        _ => Err("expected min_lat,min_lon,max_lat,max_lon".into()),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(cli.config.as_deref())?;

    let graph = match (&cli.sqlite, &cli.vertices, &cli.ways) {
        (Some(db), _, _) => load_sqlite(db, cli.bbox)
            .with_context(|| format!("loading SQLite snapshot {}", db.display()))?,
        (None, Some(v), Some(w)) => load_csv(v, w)
            .with_context(|| format!("loading CSV snapshot {} + {}", v.display(), w.display()))?,
        _ => bail!("a graph snapshot is required: --vertices and --ways, or --sqlite"),
    };
    if graph.is_empty() {
        tracing::warn!("graph snapshot has no vertices; every route request will fail");
    }

    let state = Arc::new(AppState::new(Arc::new(graph), config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "stoproute listening");
    axum::serve(listener, app).await?;
    Ok(())
}
