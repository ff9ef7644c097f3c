// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Extension;
use mclg_ws::config::settings::Settings;
use mclg_ws::domain::repositories::record_repository::RecordRepository;
use mclg_ws::domain::services::chat_service::ChatAssistant;
use mclg_ws::domain::services::code_generation_service::CodeGenerator;
use mclg_ws::domain::services::fetch_service::ContentFetcher;
use mclg_ws::domain::services::scrape_service::WebScraper;
use mclg_ws::infrastructure::database::connection;
use mclg_ws::infrastructure::llm::perplexity_client::PerplexityClient;
use mclg_ws::infrastructure::repositories::record_repo_impl::RecordRepositoryImpl;
use mclg_ws::presentation::routes;
use mclg_ws::utils::telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting mclg-ws...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!(
        "Configuration loaded (environment: {}, debug: {})",
        settings.app.environment,
        settings.app.debug()
    );

    // 3. Connect to the document store, which is an optional collaborator:
    // a missing or unreachable database disables persistence only
    let store: Option<Arc<dyn RecordRepository>> = match &settings.database.url {
        Some(url) => match connection::create_pool(url, &settings.database).await {
            Ok(db) => {
                info!("Database connection established");
                let db = Arc::new(db);

                info!("Running database migrations...");
                Migrator::up(db.as_ref(), None).await?;
                info!("Database migrations applied");

                Some(Arc::new(RecordRepositoryImpl::new(db)))
            }
            Err(e) => {
                warn!("Error connecting to database, persistence disabled: {}", e);
                None
            }
        },
        None => {
            warn!("Database URL is not set, persistence disabled");
            None
        }
    };

    // 4. Construct the LLM endpoint client; a missing API key fails fast here
    let llm = Arc::new(PerplexityClient::new(&settings.llm)?);
    info!("Perplexity client initialized");

    // 5. Initialize pipeline services
    let scraper = Arc::new(WebScraper::new(
        ContentFetcher::new()?,
        llm.clone(),
        settings.llm.temperature,
        store.clone(),
    ));
    let generator = Arc::new(CodeGenerator::new(llm.clone(), store.clone()));
    let assistant = Arc::new(Mutex::new(ChatAssistant::new(
        llm.clone(),
        settings.llm.temperature,
        store.clone(),
    )));

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(scraper))
        .layer(Extension(generator))
        .layer(Extension(assistant))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
