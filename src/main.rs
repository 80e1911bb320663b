use anyhow::Error;
use std::sync::Arc;
use teloxide::dptree;
use teloxide::prelude::*;

use broadcastbot::broadcast::{BroadcastService, FanoutDispatcher, TelegramTransport};
use broadcastbot::commands::Command;
use broadcastbot::config::{self, BotConfig};
use broadcastbot::database::{self, DatabasePool};
use broadcastbot::handlers::{callback_handler, command_handler, receive_broadcast_message};
use broadcastbot::translation::TranslationManager;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // --- Logging Setup ---
    use log::LevelFilter;
    use std::env;
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::sync::Mutex;

    // 1. Get console log level from env
    let console_level_str = env::var("CONSOLE_LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    let console_level = match console_level_str.to_uppercase().as_str() {
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        _ => LevelFilter::Info, // Default to Info
    };

    // 2. Get file log level from env
    let file_level_str = env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "OFF".to_string());
    let file_level_config = match file_level_str.to_uppercase().as_str() {
        "ERROR" => Some(LevelFilter::Error),
        "ALL" | "INFO" => Some(LevelFilter::Info),
        _ => None, // OFF
    };

    // 3. The logger has to let through whatever either sink wants
    let max_level = std::cmp::max(console_level, file_level_config.unwrap_or(LevelFilter::Off));

    // 4. Setup file handle if needed
    let log_file = if file_level_config.is_some() {
        let file = OpenOptions::new().create(true).append(true).open("broadcastbot.log")?;
        Some(Arc::new(Mutex::new(file)))
    } else {
        None
    };

    // 5. Build the logger
    let mut builder = pretty_env_logger::formatted_builder();
    builder
        .filter(None, max_level)
        .format(move |buf, record| {
            let formatted_record = format!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            );

            if record.level() <= console_level {
                writeln!(buf, "{}", formatted_record)?;
            }

            if let (Some(file_level), Some(file_handle)) = (file_level_config, &log_file) {
                if record.level() <= file_level {
                    if let Ok(mut guard) = file_handle.lock() {
                        let _ = writeln!(guard, "{}", formatted_record);
                    }
                }
            }
            Ok(())
        })
        .init();

    log::info!("Starting broadcast bot...");
    let start_time = std::time::Instant::now();

    if let Err(e) = config::load_environment() {
        log::error!("Failed to load environment: {}", e);
        return Err(e.into());
    }
    let config = BotConfig::from_env()?;

    if let Err(e) = database::init_database(&config.database_path) {
        log::error!("Failed to initialize the database: {}", e);
        return Err(e.into());
    }
    log::info!("Database initialized at {:?}", config.database_path);

    let texts = Arc::new(TranslationManager::load(&config.translations_dir, &config.default_language)?);

    let db_pool = Arc::new(DatabasePool::new(
        config.database_path.clone(),
        3, // Maximum 3 simultaneous database connections
    ));

    let bot = Bot::from_env();
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let dispatcher = FanoutDispatcher::new(
        db_pool.clone(),
        transport.clone(),
        config.broadcast_concurrency,
        config.send_timeout,
    );
    let service = Arc::new(BroadcastService::new(config.admin_id, dispatcher, transport, texts.clone()));
    log::info!(
        "Broadcasts enabled for user {} ({} concurrent sends, {:?} timeout)",
        config.admin_id.0,
        config.broadcast_concurrency,
        config.send_timeout
    );

    let handler = dptree::entry()
        .branch(Update::filter_message().filter_command::<Command>().endpoint(command_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(receive_broadcast_message));

    log::info!("Bot initialization completed in {:.2?}", start_time.elapsed());
    log::info!("Starting to dispatch updates...");

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![db_pool, texts, service])
        .enable_ctrlc_handler()
        .build();

    tokio::select! {
        _ = dispatcher.dispatch() => {},
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received Ctrl+C, shutting down...");
        }
    }

    log::info!("Bot shutdown complete");
    Ok(())
}
