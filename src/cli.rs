//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::json_store_adapter::JsonStoreAdapter;
use crate::adapters::log_notifier::LogNotifier;
use crate::adapters::paper_broker::PaperBrokerAdapter;
use crate::adapters::telegram::{TelegramNotifier, TelegramPoller};
use crate::adapters::web::{build_router, AppState};
use crate::domain::dialogue::DialogueManager;
use crate::domain::dispatch::Dispatcher;
use crate::domain::settings::Settings;
use crate::domain::store::PresetStore;
use crate::ports::notifier_port::NotifierPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Signal-driven trade execution bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the signal endpoint (plus the Telegram dialogue when configured)
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create or update a preset interactively on the terminal
    Configure {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List configured presets
    Presets {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a config file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::Configure { config } => run_configure(&config),
        Command::Presets { config } => run_presets(&config),
        Command::Validate { config } => run_validate(&config),
    }
}

fn load_settings(path: &PathBuf) -> Result<Settings, ExitCode> {
    Settings::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn open_store(settings: &Settings) -> Result<Arc<PresetStore>, ExitCode> {
    PresetStore::open(Box::new(JsonStoreAdapter::new(&settings.store_path)))
        .map(Arc::new)
        .map_err(|err| {
            eprintln!("error: {err}");
            ExitCode::from(&err)
        })
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let store = match open_store(&settings) {
        Ok(s) => s,
        Err(code) => return code,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let broker = Arc::new(PaperBrokerAdapter::new(settings.paper_buying_power));
    let notifier: Arc<dyn NotifierPort> = match &settings.telegram {
        Some(telegram) => Arc::new(TelegramNotifier::new(telegram)),
        None => Arc::new(LogNotifier),
    };
    let dispatcher = Dispatcher::new(
        store.clone(),
        broker,
        notifier,
        settings.quote_timeout,
    );
    let dialogue = Arc::new(DialogueManager::new(store));

    eprintln!("Starting signal endpoint on {}", settings.listen);

    let router = build_router(AppState { dispatcher });

    tokio::runtime::Runtime::new().unwrap().block_on(async {
        if let Some(telegram) = &settings.telegram {
            let poller = TelegramPoller::new(telegram, dialogue.clone());
            tokio::spawn(poller.run());
        }
        let listener = tokio::net::TcpListener::bind(settings.listen).await.unwrap();
        axum::serve(listener, router).await.unwrap();
    });

    ExitCode::SUCCESS
}

/// One dialogue session over stdin. Typing `cancel` aborts; the session
/// ends on its own once the preset is saved.
fn run_configure(config_path: &PathBuf) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let store = match open_store(&settings) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let dialogue = DialogueManager::new(store);
    const OPERATOR: i64 = 0;

    println!("{}", dialogue.begin(OPERATOR));
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(1);
            }
        };
        let text = line.trim();
        if text.eq_ignore_ascii_case("cancel") {
            println!("{}", dialogue.cancel(OPERATOR));
            return ExitCode::SUCCESS;
        }
        match dialogue.input(OPERATOR, text) {
            Some(reply) => {
                println!("{reply}");
                if !dialogue.is_active(OPERATOR) {
                    return ExitCode::SUCCESS;
                }
            }
            None => return ExitCode::SUCCESS,
        }
    }
    ExitCode::SUCCESS
}

fn run_presets(config_path: &PathBuf) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let store = match open_store(&settings) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let symbols = store.symbols();
    if symbols.is_empty() {
        println!("No presets configured.");
        return ExitCode::SUCCESS;
    }
    for symbol in symbols {
        if let Some(preset) = store.get(&symbol) {
            println!(
                "{symbol}: order size ${size}, min profit {profit}%",
                size = preset.order_size,
                profit = preset.min_profit_pct,
            );
        }
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match Settings::from_file(config_path) {
        Ok(settings) => {
            println!(
                "Config OK: listen {listen}, store {store}, quote timeout {timeout}s",
                listen = settings.listen,
                store = settings.store_path.display(),
                timeout = settings.quote_timeout.as_secs(),
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}
