use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use env_logger::Env;
use ratatui::DefaultTerminal;
use tokio_util::sync::CancellationToken;

use bblsearch::app::App;
use bblsearch::config::{self, SearchConfig};
use bblsearch::lookup::HttpLookupClient;
use bblsearch::navigation::{Intent, PendingNavigation};
use bblsearch::search::{SearchState, SubmitOutcome};
use bblsearch::worker::spawn_worker;

const LOG_FILE_NAME: &str = "bblsearch.log";

/// Longest the UI sleeps between redraws while nothing happens
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Slice of time the non-interactive lookup waits per round
const LOOKUP_WAIT: Duration = Duration::from_millis(100);

/// Find a building's BBL by typing its address
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (default: ~/.config/bblsearch/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Base URL of the lookup service, overrides the config file
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Resolve ADDRESS without the interactive UI and print the building URL
    #[arg(long, value_name = "ADDRESS")]
    lookup: Option<String>,

    /// Open the building page with the review form
    #[arg(long)]
    review: bool,
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();
    init_logging();

    let mut config = match &args.config {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config(),
    };
    if let Some(base_url) = args.base_url {
        config.service.base_url = base_url;
    }

    let client = HttpLookupClient::new(&config.service.base_url, config.service.timeout())?;
    let base_url = client.base_url().to_string();

    let (request_tx, request_rx) = tokio::sync::mpsc::unbounded_channel();
    let (response_tx, response_rx) = mpsc::channel();
    let shutdown = CancellationToken::new();
    let worker = spawn_worker(client, request_rx, response_tx, shutdown.clone())?;

    let intent = if args.review {
        Intent::Review
    } else {
        Intent::View
    };
    let mut search = SearchState::new(&config.search, PendingNavigation::default());
    search.set_channels(request_tx, response_rx);
    search.set_intent(intent);

    let result = match args.lookup {
        Some(address) => run_lookup(&mut search, &address, intent, &base_url).map(Some),
        None => run_interactive(search, &config.search, &base_url),
    };

    shutdown.cancel();
    if worker.join().is_err() {
        log::warn!("Lookup worker panicked");
    }

    if let Some(url) = result? {
        println!("{}", url);
    }
    Ok(())
}

/// Log to a file in the temp dir, only when RUST_LOG is set
///
/// Writing to stderr would corrupt the TUI.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let path = std::env::temp_dir().join(LOG_FILE_NAME);
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Could not open log file {}: {}", path.display(), e);
            return;
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Resolve one address without the UI
fn run_lookup(
    search: &mut SearchState<PendingNavigation>,
    address: &str,
    intent: Intent,
    base_url: &str,
) -> Result<String> {
    search.set_query(address, Instant::now());
    let outcome = match intent {
        Intent::Review => search.submit_for_review(),
        Intent::View => search.submit(),
    };

    match outcome {
        SubmitOutcome::Requested { .. } | SubmitOutcome::Navigated => {}
        SubmitOutcome::EmptyQuery => return Err(eyre!("Nothing to look up: address is empty")),
        SubmitOutcome::Unavailable | SubmitOutcome::Busy | SubmitOutcome::NoSelection => {
            return Err(eyre!(
                "{}",
                search.message().unwrap_or("Lookup could not be started")
            ));
        }
    }

    while search.is_submitting() && search.navigator().destination().is_none() {
        if !search.is_connected() {
            return Err(eyre!("Lookup worker stopped before answering"));
        }
        search.wait_for_responses(LOOKUP_WAIT);
    }

    match search.navigator().destination() {
        Some(destination) => Ok(destination.url(base_url)),
        None => Err(eyre!(
            "{}",
            search.message().unwrap_or("Address could not be resolved")
        )),
    }
}

fn run_interactive(
    search: SearchState<PendingNavigation>,
    config: &SearchConfig,
    base_url: &str,
) -> Result<Option<String>> {
    let mut app = App::new(search, config);

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .map_err(Into::into)
        .and_then(|_| run(terminal, &mut app));

    // Restore terminal even when the loop failed
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result?;
    Ok(app.destination().map(|destination| destination.url(base_url)))
}

fn run(mut terminal: DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if app.should_quit() {
            break;
        }

        // Wake up in time for a pending debounce deadline
        let wait = app
            .search
            .next_deadline(Instant::now())
            .map_or(POLL_INTERVAL, |due| due.min(POLL_INTERVAL));

        if event::poll(wait)? {
            let event = event::read()?;
            app.handle_event(event, Instant::now());
        }

        app.tick(Instant::now());
    }

    Ok(())
}
