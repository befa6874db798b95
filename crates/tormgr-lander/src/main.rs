use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use std::io;
use std::sync::{Arc, PoisonError};
use std::time::Duration;
use tokio::runtime::Runtime;
use tormgr_bridge::{BridgeHost, MenuController};
use tormgr_client::{ApiClient, Endpoints};
use tormgr_config::{AppConfig, FileBackend, SessionStore, SharedSession};

mod actions;
mod dispatcher;
mod domain_models;
mod logger;
mod middleware;
mod reducers;
mod routes;
mod state;
mod store;
mod view_models;
mod views;

use actions::{Action, AuthAction, GlobalAction};
use middleware::{
    api_middleware::ApiMiddleware, keyboard_middleware::KeyboardMiddleware,
    logging::LoggingMiddleware, navigation_middleware::NavigationMiddleware,
};
use routes::Route;
use state::AppState;
use store::Store;

/// Terminal client for tormgr torrent folders
#[derive(Debug, Parser)]
#[command(name = "tormgr", version, about)]
struct Cli {
    /// API base URL (overrides config file and TORMGR_API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Route calls through the extension bridge instead of calling the API directly
    #[arg(long)]
    bridge: bool,

    /// Start route, e.g. /folders/42
    #[arg(long, default_value = "/")]
    path: String,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Print the link context menu
    Menu,
    /// Act on a context menu item for a link, as a browser click would
    Click {
        /// Menu item id, e.g. folders.42 or signin
        item: String,
        /// Link the menu was opened on
        link: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_file = logger::init()?;
    log::info!("Starting tormgr (log: {})", log_file.display());

    let mut config = AppConfig::load();
    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.trim_end_matches('/').to_string();
    }

    let backend = FileBackend::default_location()?;
    let session = SessionStore::load(backend)
        .context("Failed to load session")?
        .shared();

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let mut store = Store::new(AppState::default());

    let sign_out_dispatcher = store.dispatcher().clone();
    let client = ApiClient::with_timeout(
        config.api.base_url.clone(),
        session.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?
    .with_sign_out_hook(Arc::new(move || {
        sign_out_dispatcher.dispatch(Action::Auth(AuthAction::SignedOut));
    }));
    let endpoints = Endpoints::http(client);
    let endpoints = if cli.bridge {
        start_bridge(&runtime, endpoints, session.clone())
    } else {
        endpoints
    };

    if let Some(command) = cli.command {
        return run_menu_command(&runtime, command, endpoints, session);
    }

    store.add_middleware(Box::new(LoggingMiddleware::new()));
    store.add_middleware(Box::new(KeyboardMiddleware::new()));
    store.add_middleware(Box::new(NavigationMiddleware::new(session.clone())));
    store.add_middleware(Box::new(ApiMiddleware::new(
        endpoints,
        runtime.handle().clone(),
    )));

    let (signed_in, email) = {
        let session = session.lock().unwrap_or_else(PoisonError::into_inner);
        let email = session
            .user()
            .and_then(|user| user.get("email"))
            .and_then(|email| email.as_str())
            .map(str::to_string);
        (session.is_signed_in(), email)
    };
    store.dispatch(Action::Auth(AuthAction::Restored { signed_in, email }));
    let start = Route::parse(&cli.path).unwrap_or_default();
    store.dispatch(Action::navigate(start));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, &mut store);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("Exiting tormgr");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, store: &mut Store) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            views::render(store.state(), area, frame);
        })?;

        if !store.state().running {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    store.dispatch(Action::Global(GlobalAction::KeyPressed(key)));
                }
            }
        }

        // completions from the runtime
        store.drain();
    }

    Ok(())
}

/// Serve `endpoints` from a bridge host and return proxies talking to it
///
/// The host also keeps the link context menu current: every successful call
/// may have changed folders or the session.
fn start_bridge(runtime: &Runtime, endpoints: Endpoints, session: SharedSession) -> Endpoints {
    let (tx, rx) = tormgr_bridge::channel(64);
    let host = BridgeHost::new(endpoints.clone());
    let mut updates = host.subscribe();
    runtime.spawn(host.serve(rx));

    let menu = MenuController::new(endpoints, session);
    runtime.spawn(async move {
        while updates.recv().await.is_ok() {
            let items = menu.refresh().await;
            log::info!("Context menu: {} items", items.len());
            for item in items {
                log::debug!("  {} -> {}", item.id, item.title);
            }
        }
    });

    log::info!("Bridge host started");
    tormgr_bridge::ApiProxy::new(tx).endpoints()
}

fn run_menu_command(
    runtime: &Runtime,
    command: CliCommand,
    endpoints: Endpoints,
    session: SharedSession,
) -> Result<()> {
    let menu = MenuController::new(endpoints, session);
    match command {
        CliCommand::Menu => {
            for item in runtime.block_on(menu.refresh()) {
                println!("{:<20} {}", item.id, item.title);
            }
        }
        CliCommand::Click { item, link } => {
            match runtime.block_on(menu.on_click(&item, &link))? {
                Some(torrent) => println!("Added {} ({})", torrent.title, torrent.id),
                None => println!("Sign in first: run tormgr and use /signin"),
            }
        }
    }
    Ok(())
}
