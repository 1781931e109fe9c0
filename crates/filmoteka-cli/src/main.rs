mod terminal;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use filmoteka_api::HttpBackend;
use filmoteka_core::config::AppConfig;
use filmoteka_core::models::{CalendarTab, FilmCardState};
use filmoteka_runtime::calendar::{CalendarBody, CancelOutcome, LoadOutcome, PlanDialog, PlanOutcome};
use filmoteka_runtime::grid::{FilmCard, GridKind};
use filmoteka_runtime::library::{AddOutcome, ReviewEntry, ReviewOutcome, SearchResult};
use filmoteka_runtime::moderation::ModerationOutcome;
use filmoteka_runtime::sync::SyncOutcome;
use filmoteka_runtime::{RuntimeError, Session};

use terminal::{answer_prompts, TerminalNavigator, ToastPrinter};

#[derive(Parser)]
#[command(name = "filmoteka", version, about = "Manage your Filmoteka library from the terminal")]
struct Cli {
    /// Config file (defaults to the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session cookie header, e.g. "sessionid=...; csrftoken=...".
    #[arg(long, global = true)]
    cookies: Option<String>,

    /// Saved page whose form carries the CSRF token.
    #[arg(long, global = true)]
    page_html: Option<PathBuf>,

    /// Confirm every dialog without asking.
    #[arg(short, long, global = true)]
    yes: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a catalog film to the library.
    Add {
        tmdb_id: u64,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Run a card action: plan, watch, favorite, unfavorite, delete, delete-watched.
    Status {
        tmdb_id: u64,
        action: String,
        #[arg(long, default_value = "")]
        title: String,
        /// The card is on the favorites page.
        #[arg(long)]
        favorites: bool,
        #[arg(long)]
        watched: bool,
        #[arg(long)]
        planned: bool,
        #[arg(long)]
        favorite: bool,
    },
    /// List planned viewings.
    Calendar {
        #[arg(long, default_value = "active")]
        view: CalendarTab,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Plan a viewing.
    Plan {
        /// Local film id.
        film: i64,
        date: NaiveDate,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long)]
        tmdb_id: Option<u64>,
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Cancel a planned viewing listed on the given calendar page.
    Cancel {
        event_id: i64,
        #[arg(long, default_value = "active")]
        view: CalendarTab,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Delete one of your reviews.
    ReviewDelete {
        review_id: i64,
        #[arg(long, default_value = "")]
        title: String,
    },
    Block {
        user_id: i64,
    },
    Unblock {
        user_id: i64,
    },
}

fn init_logging(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "filmoteka=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "filmoteka.log".into());
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        None => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_file.as_deref());

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "filmoteka failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool, RuntimeError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .map_err(|e| RuntimeError::Config(e.to_string()))?;

    let page_html = cli
        .page_html
        .as_deref()
        .map(std::fs::read_to_string)
        .transpose()
        .map_err(|e| RuntimeError::Config(e.to_string()))?;

    let session: Session<HttpBackend, TerminalNavigator> = Session::connect(
        config,
        cli.cookies,
        page_html.as_deref(),
        TerminalNavigator,
    )?;

    let prompts = answer_prompts(session.gate(), cli.yes);
    let mut toasts = ToastPrinter::new(&session.notifier());

    let ok = match cli.command {
        Command::Add { tmdb_id, title } => {
            let results = session.search_results(vec![SearchResult::new(tmdb_id, title)]);
            matches!(
                results.add_film(tmdb_id).await,
                AddOutcome::Added | AddOutcome::AlreadyInLibrary
            )
        }
        Command::Status {
            tmdb_id,
            action,
            title,
            favorites,
            watched,
            planned,
            favorite,
        } => {
            let kind = if favorites {
                GridKind::Favorites
            } else {
                GridKind::Library
            };
            let state = FilmCardState {
                is_watched: watched,
                is_planned: planned,
                is_favorite: favorite,
                ..FilmCardState::new(tmdb_id)
            };
            let grid = session.film_grid(kind, vec![FilmCard::new(title, state)]);
            let outcome = grid.dispatch(tmdb_id, &action).await;
            if let Some(card) = grid.grid().read().await.card(tmdb_id) {
                let badges: Vec<String> = card.badges.iter().map(|b| b.title()).collect();
                println!("{}", badges.join(", "));
            }
            !matches!(outcome, SyncOutcome::Failed(_) | SyncOutcome::Ignored)
        }
        Command::Calendar { view, page } => {
            let calendar = session.calendar();
            let mut outcome = calendar.switch_tab(view).await;
            if page > 1 && outcome == LoadOutcome::Loaded {
                outcome = calendar.load(page).await;
            }
            let state = calendar.snapshot().await;
            print_calendar(&state.body);
            println!(
                "Страница {} из {}",
                state.pagination.current_page, state.pagination.total_pages
            );
            outcome == LoadOutcome::Loaded
        }
        Command::Plan {
            film,
            date,
            note,
            tmdb_id,
            title,
        } => {
            let calendar = session.calendar();
            let mut dialog = PlanDialog::open(film, tmdb_id, title);
            dialog.planned_date = Some(date);
            dialog.note = note;
            match calendar.submit_plan(&mut dialog).await {
                PlanOutcome::Created(event) => {
                    println!("#{} {} {}", event.event_id, event.planned_date, event.film_title);
                    true
                }
                PlanOutcome::Invalid(message) => {
                    println!("{message}");
                    false
                }
                PlanOutcome::Failed(_) => false,
            }
        }
        Command::Cancel {
            event_id,
            view,
            page,
        } => {
            let calendar = session.calendar();
            calendar.switch_tab(view).await;
            if page > 1 {
                calendar.load(page).await;
            }
            calendar.cancel_event(event_id).await == CancelOutcome::Cancelled
        }
        Command::ReviewDelete { review_id, title } => {
            let reviews = session.reviews(vec![ReviewEntry {
                review_id,
                film_title: title,
            }]);
            reviews.delete_review(review_id).await == ReviewOutcome::Deleted
        }
        Command::Block { user_id } => moderate(&session, user_id, true).await,
        Command::Unblock { user_id } => moderate(&session, user_id, false).await,
    };

    toasts.drain();
    prompts.abort();
    Ok(ok)
}

async fn moderate(session: &Session<HttpBackend, TerminalNavigator>, user_id: i64, block: bool) -> bool {
    let panel = session.moderation();
    let outcome = if block {
        panel.block(user_id).await
    } else {
        panel.unblock(user_id).await
    };
    if outcome == ModerationOutcome::Done {
        // Let the scheduled reload fire before exiting.
        tokio::time::sleep(session.config().ui.reload_delay()).await;
        tokio::task::yield_now().await;
        return true;
    }
    false
}

fn print_calendar(body: &CalendarBody) {
    match body {
        CalendarBody::Loading => {}
        CalendarBody::Empty => println!("Нет запланированных просмотров"),
        CalendarBody::Error(message) => println!("{message}"),
        CalendarBody::Groups(groups) => {
            for group in groups {
                println!("{}", group.label);
                for event in &group.events {
                    match &event.note {
                        Some(note) => println!("  #{} {} ({note})", event.event_id, event.film_title),
                        None => println!("  #{} {}", event.event_id, event.film_title),
                    }
                }
            }
        }
    }
}
