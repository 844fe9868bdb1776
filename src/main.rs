use anyhow::Context;
use policy_crew::cli::Cli;
use policy_crew::utils::Config;
use policy_crew::{api, AppState};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // Load the environment file before reading configuration. The default
    // file may be absent; an explicitly named one must exist.
    if cli.env_file.exists() {
        dotenvy::from_path(&cli.env_file)
            .with_context(|| format!("Failed to load {}", cli.env_file.display()))?;
    } else if cli.env_file != std::path::Path::new(".env") {
        anyhow::bail!("Environment file {} not found", cli.env_file.display());
    }

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("policy_crew={default_filter},tower_http={default_filter}").into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let addr = format!("{}:{}", config.server.host, config.server.port);

    tracing::info!(
        chat_model = %config.llm.chat_model,
        rag_model = %config.llm.rag_model,
        embedding_model = %config.llm.embedding_model,
        collection = %config.qdrant.collection,
        rerank = config.rerank.url.is_some(),
        graph_rag = config.graph.url.is_some(),
        "Configuration loaded"
    );

    let state = AppState::from_config(config).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    tracing::info!(%addr, "Starting policy-crew-server");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
