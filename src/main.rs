use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lazyctx::cmd::{self, Commands, ConfigAction, SearchArgs, ShowContextArgs};
use lazyctx::config::{self, Config};
use lazyctx::event::Command;
use lazyctx::friendly::FriendlyNames;
use lazyctx::handlers::input::{handle_input_event, InputAction};
use lazyctx::logging::{self, LogConfig, LogLevel};
use lazyctx::navigator::{Flow, Navigator};
use lazyctx::query::elasticsearch::ElasticsearchClient;
use lazyctx::store::LogStore;
use lazyctx::tui::{self, TerminalPresenter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// Constants
const INPUT_POLL_DURATION_MS: u64 = 100;

#[derive(Parser, Debug)]
#[command(name = "lazyctx", version)]
#[command(about = "Search logs in Elasticsearch and scroll through the context around any entry", long_about = None)]
struct Cli {
    /// Config file [default: nearest lazyctx.yaml, then ~/.config/lazyctx/config.yaml]
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write diagnostics to this file (the TUI defaults to the user cache dir)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match (&cli.log_file, &cli.command) {
        (Some(path), _) => Some(path.clone()),
        (None, Commands::Tui(_)) => logging::default_log_file(),
        (None, _) => None,
    };
    logging::init(&LogConfig {
        level: LogLevel::from_verbosity(cli.verbose),
        file: log_file,
    })
    .context("Failed to initialize logging")?;

    match &cli.command {
        Commands::Init(args) => exit_on_error(cmd::init::run(args)),
        Commands::Config { action } => match action {
            ConfigAction::Validate => exit_on_error(cmd::config::validate(cli.config.as_deref())),
            ConfigAction::Show => exit_on_error(cmd::config::show(cli.config.as_deref())),
        },
        Commands::Search(args) => {
            let config = load_config(&cli)?;
            let store = open_store(&config)?;
            let friendly = load_friendly_names(&config);
            cmd::search::search(
                &mut io::stdout().lock(),
                &store,
                &friendly,
                &args.query,
                &args.time_range(),
            )
        }
        Commands::ShowContext(args) => {
            let config = load_config(&cli)?;
            let store = open_store(&config)?;
            show_context(&config, &store, args)
        }
        Commands::Tui(args) => {
            let config = load_config(&cli)?;
            let store = open_store(&config)?;
            let friendly = load_friendly_names(&config);
            run_tui(&config, &store, friendly, args)
        }
    }
}

fn exit_on_error(result: Result<(), i32>) -> Result<()> {
    if let Err(code) = result {
        std::process::exit(code);
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let discovery = config::discover();
    debug!(searched = ?discovery.searched, "config discovery");
    match config::load_from(cli.config.as_deref(), &discovery) {
        Ok(config) => {
            info!(path = %config.path.display(), "loaded config");
            Ok(config)
        }
        Err(e) => {
            // Cargo-style message already carries location and hints
            eprint!("{}", e);
            std::process::exit(1);
        }
    }
}

fn open_store(config: &Config) -> Result<LogStore> {
    let client = ElasticsearchClient::new(config.elasticsearch_settings())
        .context("Failed to create Elasticsearch client")?;
    Ok(LogStore::new(Box::new(client), config.normalizer()))
}

/// A missing or unreadable table only costs the friendly labels.
fn load_friendly_names(config: &Config) -> FriendlyNames {
    match &config.friendly_names {
        Some(settings) => FriendlyNames::load(settings).unwrap_or_else(|e| {
            warn!(error = %e, "friendly names unavailable");
            FriendlyNames::default()
        }),
        None => FriendlyNames::default(),
    }
}

fn show_context(config: &Config, store: &LogStore, args: &ShowContextArgs) -> Result<()> {
    cmd::search::show_context(
        &mut io::stdout().lock(),
        store,
        &args.id,
        args.before.unwrap_or(config.navigator.context_before),
        args.after.unwrap_or(config.navigator.context_after),
    )
}

fn run_tui(
    config: &Config,
    store: &LogStore,
    friendly: FriendlyNames,
    args: &SearchArgs,
) -> Result<()> {
    // Search before touching the terminal so failures print plainly
    let results = store
        .search(&args.query, &args.time_range())
        .context("Search failed")?;
    info!(query = %args.query, results = results.len(), "search complete");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    let mut presenter = TerminalPresenter::new(terminal, config.context_fields.clone(), friendly);

    // Main loop
    let res = presenter.list_height().and_then(|height| {
        let mut navigator = Navigator::new(
            &args.query,
            results,
            height,
            config.navigator,
            config.context_fields.clone(),
        );
        run_app(&mut navigator, store, &mut presenter)
    });

    // Restore terminal
    disable_raw_mode()?;
    execute!(presenter.terminal_mut().backend_mut(), LeaveAlternateScreen)?;
    presenter.terminal_mut().show_cursor()?;

    res
}

fn run_app<B: Backend>(
    navigator: &mut Navigator,
    store: &LogStore,
    presenter: &mut TerminalPresenter<B>,
) -> Result<()> {
    presenter.terminal_mut().hide_cursor()?;
    navigator.render(presenter)?;

    loop {
        if !crossterm_event::poll(Duration::from_millis(INPUT_POLL_DURATION_MS))? {
            if presenter.expire_notice() {
                navigator.render(presenter)?;
            }
            continue;
        }

        let command = match crossterm_event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let page = presenter.list_height()?;
                match handle_input_event(key, presenter.help_visible(), page) {
                    Some(InputAction::Navigate(command)) => command,
                    Some(InputAction::ShowHelp) => {
                        presenter.set_help(true);
                        navigator.render(presenter)?;
                        continue;
                    }
                    Some(InputAction::HideHelp) => {
                        presenter.set_help(false);
                        navigator.render(presenter)?;
                        continue;
                    }
                    None => continue,
                }
            }
            Event::Resize(width, height) => resized(width, height),
            _ => continue,
        };

        let started = Instant::now();
        if navigator.handle(command, store, presenter)? == Flow::Quit {
            return Ok(());
        }

        // Keys typed while a fetch blocked the loop are stale
        if started.elapsed() >= Duration::from_millis(INPUT_POLL_DURATION_MS) {
            if let Some(resize) = drain_pending_input()? {
                navigator.handle(resize, store, presenter)?;
            }
        }
    }
}

fn resized(width: u16, height: u16) -> Command {
    Command::ViewportResized {
        width,
        height: tui::list_height(height) as u16,
    }
}

/// Discard queued input; returns the last resize seen, which still applies.
fn drain_pending_input() -> Result<Option<Command>> {
    let mut resize = None;
    let mut dropped = 0usize;
    while crossterm_event::poll(Duration::ZERO)? {
        match crossterm_event::read()? {
            Event::Resize(width, height) => resize = Some(resized(width, height)),
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(dropped, "discarded input queued during fetch");
    }
    Ok(resize)
}
