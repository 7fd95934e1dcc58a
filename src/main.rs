use clap::Parser;
use sq_client::app::{quote_shell, symptom_shell};
use sq_client::core::{AnalysisPage, ConfigProvider, SymptomCatalog};
use sq_client::utils::error::ErrorSeverity;
use sq_client::utils::{logger, validation::Validate};
use sq_client::{
    AppError, CliConfig, Command, GameController, HttpImageProbe, HttpQuoteService,
    HttpSymptomService, ImageResolver, Settings, StaticCatalog, SymptomSelector,
};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting sq");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), AppError> {
    let settings = cli.resolve()?;
    settings.validate()?;
    let settings = &settings;

    match &cli.command {
        Command::Search { query } => {
            with_catalog(settings, |catalog| async move {
                let mut selector =
                    SymptomSelector::new(catalog, HttpSymptomService::from_config(settings)?);
                let count =
                    symptom_shell::search_once(&mut selector, query, &mut std::io::stdout()).await?;
                tracing::info!("🔍 {} symptoms match '{}'", count, query);
                Ok::<(), AppError>(())
            })
            .await
        }
        Command::Diagnose { symptoms, output } => {
            let service = HttpSymptomService::from_config(settings)?;
            let mut selector = SymptomSelector::new(service.clone(), service);
            let page = symptom_shell::diagnose(&mut selector, symptoms, &mut std::io::stdout()).await?;
            write_page(&page, output.as_deref())
        }
        Command::Select => {
            with_catalog(settings, |catalog| async move {
                let mut selector =
                    SymptomSelector::new(catalog, HttpSymptomService::from_config(settings)?);
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                let page = symptom_shell::run_select_shell(
                    &mut selector,
                    settings.search_debounce(),
                    stdin,
                    &mut std::io::stdout(),
                )
                .await?;
                match page {
                    Some(page) => write_page(&page, None),
                    None => Ok(()),
                }
            })
            .await
        }
        Command::LoadQuotes => {
            let game = game_controller(settings)?;
            let summary = game.load_quotes().await?;
            println!("✅ {} ({} quotes)", summary.message, summary.count);
            Ok(())
        }
        Command::Play => {
            let mut game = game_controller(settings)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            quote_shell::run_play_shell(&mut game, stdin, &mut std::io::stdout()).await
        }
    }
}

/// 有設定本地 CSV 就用它搜尋，否則走遠端 `/search`
async fn with_catalog<F, Fut>(settings: &Settings, f: F) -> Result<(), AppError>
where
    F: FnOnce(Box<dyn SymptomCatalog>) -> Fut,
    Fut: std::future::Future<Output = Result<(), AppError>>,
{
    let catalog: Box<dyn SymptomCatalog> = match &settings.catalog_csv {
        Some(path) => Box::new(StaticCatalog::from_training_csv(path)?),
        None => Box::new(HttpSymptomService::from_config(settings)?),
    };
    f(catalog).await
}

fn game_controller(
    settings: &Settings,
) -> Result<GameController<HttpQuoteService, HttpImageProbe>, AppError> {
    let service = HttpQuoteService::from_config(settings)?;
    let probe = HttpImageProbe::new(sq_client::adapters::http::build_client(
        settings.image_timeout(),
    )?);
    let images = ImageResolver::new(probe, settings.image_timeout(), settings.avatar_template());
    Ok(GameController::new(service, images))
}

fn write_page(page: &AnalysisPage, output: Option<&std::path::Path>) -> Result<(), AppError> {
    match output {
        Some(path) => {
            std::fs::write(path, &page.body)?;
            println!("📁 Result page saved to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(page.body.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
