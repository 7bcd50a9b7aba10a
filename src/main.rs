use car_price_lookup::adapters::vehicle_store::parse_vehicle_arg;
use car_price_lookup::core::ConfigProvider;
use car_price_lookup::utils::error::ErrorSeverity;
use car_price_lookup::utils::{logger, validation::Validate};
use car_price_lookup::{
    CliConfig, ConsolePresenter, HttpJobBackend, LocalStorage, LookupEngine, ReportExporter,
    ResultAggregator, Vehicle, VehicleStore,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting car-price-lookup");

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Make sure the config file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    if cli.verbose {
        tracing::debug!("Effective settings: {:?}", settings);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let selection: Vec<Vehicle> = if cli.vehicle.is_empty() {
        VehicleStore::new(LocalStorage::new(".".to_string()), settings.vehicles_path())
            .selected()
            .await?
    } else {
        match cli
            .vehicle
            .iter()
            .map(|v| parse_vehicle_arg(v))
            .collect::<car_price_lookup::Result<Vec<_>>>()
        {
            Ok(vehicles) => vehicles,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
    };

    let backend = HttpJobBackend::new(settings.base_url(), settings.request_timeout())?;
    let presenter = ConsolePresenter::stdout(settings.currency.clone());
    let engine = LookupEngine::new(backend, presenter)
        .poll_interval(settings.poll_interval())
        .aggregator(ResultAggregator::new(settings.grouping_mode()));

    match engine.run(&selection).await {
        Ok(view) => {
            tracing::info!("✅ Price lookup completed for {} vehicles", view.len());

            if settings.export_report {
                let exporter = ReportExporter::new(
                    LocalStorage::new(settings.output_path().to_string()),
                    settings.currency.clone(),
                );
                for file in exporter.export(&view).await? {
                    tracing::info!("📁 Report saved to: {}/{}", settings.output_path(), file);
                }
            }
        }
        Err(e) => {
            // 使用者已經透過 presenter 收到通知，這裡只記錄細節
            tracing::error!(
                "❌ Price lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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
    }

    Ok(())
}
