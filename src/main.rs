use anyhow::Context;
use clap::Parser;
use std::io::Read;
use wireless_calc::config::Command;
use wireless_calc::core::ConfigProvider;
use wireless_calc::domain::ports::ExplanationGenerator;
use wireless_calc::utils::error::ErrorCategory;
use wireless_calc::utils::{logger, validation::Validate};
use wireless_calc::{
    AppConfig, CalculatorEngine, CliConfig, ErlangTable, GeminiExplainer, LocalStorage,
    NoopExplainer, Scenario,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入配置
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(table) = &cli.table {
        config.erlang.table_path = table.clone();
    }
    config.resolve_api_key();

    logger::init_logger(
        &config.logging.level,
        cli.verbose,
        cli.json_logs || config.logging.json,
    );
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(".".to_string());
    let table = match ErlangTable::load(&storage, config.erlang_table_path()).await {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("❌ Failed to load Erlang-B table: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.category()));
        }
    };

    let explainer: Box<dyn ExplanationGenerator> = if cli.no_explain || !config.explanation_enabled() {
        tracing::info!("💬 AI explanations disabled");
        Box::new(NoopExplainer)
    } else {
        if config.api_key().is_none() {
            tracing::warn!("⚠️ No API key configured; explanations will report the failure");
        }
        Box::new(GeminiExplainer::new(&config).context("failed to build explanation client")?)
    };

    let engine = CalculatorEngine::new(table, explainer);

    match cli.command {
        Command::Calculate {
            scenario,
            input,
            pretty,
        } => {
            let raw = match &input {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read request body '{}'", path.display()))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("failed to read request body from stdin")?;
                    buffer
                }
            };

            // 與 JSON 解析失敗同樣回傳失敗封包
            let response = match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(body) => engine.handle_route(&scenario, &body).await,
                Err(e) => {
                    tracing::error!("❌ Request body is not valid JSON: {}", e);
                    wireless_calc::CalculationResponse::failure(&e.into())
                }
            };

            let output = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", output);

            if !response.is_success() {
                std::process::exit(2);
            }
        }
        Command::Lookup { gos, traffic } => {
            match engine.table().channels_for(gos, traffic) {
                Ok(lookup) => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "gos_column": lookup.column,
                            "traffic": traffic,
                            "channels": lookup.channels,
                            "beyond_table": lookup.saturated,
                        })
                    );
                }
                Err(e) => {
                    eprintln!("❌ {}", e.user_friendly_message());
                    std::process::exit(exit_code(e.category()));
                }
            }
        }
        Command::Health => {
            let health = engine.health();
            println!(
                "{}",
                serde_json::json!({
                    "status": health.status,
                    "message": health.message,
                    "version": health.version,
                    "erlang_table": {
                        "rows": engine.table().row_count(),
                        "gos_columns": engine.table().columns().iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
                    },
                    "scenarios": Scenario::ALL.iter().map(|s| s.route()).collect::<Vec<_>>(),
                })
            );
        }
    }

    Ok(())
}

fn exit_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Input => 2,
        ErrorCategory::Configuration => 1,
        ErrorCategory::Resource => 3,
        ErrorCategory::External | ErrorCategory::Internal => 4,
    }
}
