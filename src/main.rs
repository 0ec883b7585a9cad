//! thread-ui - threaded review comments in the terminal
//!
//! Usage: thread-ui [--db path] [--thread id] [--user name] [--theme name|path]
//!
//! Comments live in a SQLite file (default `.review-thread.db` in the current
//! directory). An empty thread is seeded with a short demo conversation.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use opentui::input::ParseError;
use opentui::{InputParser, Renderer, RendererOptions, enable_raw_mode, terminal_size};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use review_thread::config::{load_ui_config, save_ui_config};
use review_thread::input::map_event_to_message;
use review_thread::model::thread_options;
use review_thread::renderer::OutletPosition;
use review_thread::theme::{load_built_in_theme, load_theme_from_path};
use review_thread::view::TextOutlet;
use review_thread::{CommentStore, Message, Model, Theme, update, view};

const DEFAULT_DB: &str = ".review-thread.db";
const DEFAULT_THREAD: &str = "th-demo";

fn main() -> Result<()> {
    let args = parse_args()?;
    let _log_guard = init_logging()?;

    let mut config = load_ui_config()?.unwrap_or_default();
    if let Some(user) = &args.user {
        config.user = Some(user.clone());
    }

    // Load theme (optional)
    let theme_override = args
        .theme
        .clone()
        .or_else(|| std::env::var("THREAD_UI_THEME").ok());
    let theme_selection = theme_override.clone().or_else(|| config.theme.clone());

    let mut selected_builtin: Option<String> = None;
    let theme = if let Some(selection) = theme_selection {
        if let Some(loaded) = load_built_in_theme(&selection) {
            selected_builtin = Some(selection);
            loaded
        } else {
            let path = Path::new(&selection);
            if path.exists() {
                load_theme_from_path(path)
                    .with_context(|| format!("Failed to load theme: {}", path.display()))?
            } else if theme_override.is_some() {
                anyhow::bail!("Unknown theme: {selection}");
            } else {
                Theme::default()
            }
        }
    } else {
        Theme::default()
    };

    if theme_override.is_some() {
        if let Some(name) = selected_builtin {
            config.theme = Some(name);
            save_ui_config(&config)?;
        }
    }

    // Open the comment store
    let author = thread_options(&config).current_user;
    let store = CommentStore::open(&args.db_path, &args.thread_id, &author)
        .with_context(|| format!("Failed to open database: {}", args.db_path.display()))?;
    if store.seed_demo()? {
        info!(thread = %args.thread_id, "seeded demo comments");
    }
    let items = store.list_comments()?;
    let status = store.thread_status()?;
    info!(
        thread = %args.thread_id,
        items = items.len(),
        read_only = args.read_only,
        "thread loaded"
    );
    let gateway = (!args.read_only).then_some(store);

    // Get terminal size
    let (term_width, term_height) = terminal_size().unwrap_or((80, 24));
    let (width, height) = (term_width as u16, term_height as u16);

    // Create model
    let mut model = Model::new(width, height, config, items, status, gateway, |rows| {
        debug!(rows, "thread height settled");
    });
    model.theme = theme;
    register_outlets(&mut model, &args, &author);

    // Enter raw mode for input handling
    let _raw_guard = enable_raw_mode().context("Failed to enable raw mode")?;

    // Initialize renderer
    let options = RendererOptions {
        use_alt_screen: true,
        hide_cursor: true,
        enable_mouse: false,
        query_capabilities: false,
    };
    let mut renderer = Renderer::new_with_options(u32::from(width), u32::from(height), options)
        .context("Failed to initialize renderer")?;
    let _wrap_guard = AutoWrapGuard::new().context("Failed to disable line wrap")?;
    renderer.set_background(model.theme.background);

    // Input parser
    let mut input = InputParser::new();

    // Main loop
    loop {
        // Detect external terminal resize even if no input events are received
        if let Ok((term_width, term_height)) = terminal_size() {
            let (term_width, term_height) = (term_width as u16, term_height as u16);
            if term_width != model.width || term_height != model.height {
                model.resize(term_width, term_height);
                renderer
                    .resize(u32::from(term_width), u32::from(term_height))
                    .context("Failed to resize renderer")?;
            }
        }

        // Force a full redraw to avoid render artifacts
        renderer.invalidate();
        model.needs_redraw = false;

        // Render
        renderer.set_background(model.theme.background);
        renderer.clear();
        view(&model, renderer.buffer());
        renderer.present().context("Failed to present frame")?;
        model
            .height_monitor
            .observe(model.content_height.get(), std::time::Instant::now());

        if model.should_quit {
            break;
        }

        // Poll for input (with timeout for potential refresh)
        let mut buf = [0u8; 32];
        if let Ok(n) = read_with_timeout(&mut buf, Duration::from_millis(100)) {
            let mut offset = 0usize;
            while offset < n {
                match input.parse(&buf[offset..n]) {
                    Ok((event, consumed)) => {
                        offset = offset.saturating_add(consumed);
                        let msg = map_event_to_message(&model, &event);
                        let resize = if let Message::Resize { width, height } = msg {
                            Some((width, height))
                        } else {
                            None
                        };
                        update(&mut model, msg);

                        if let Some((width, height)) = resize {
                            renderer
                                .resize(u32::from(width), u32::from(height))
                                .context("Failed to resize renderer")?;
                        }
                    }
                    Err(ParseError::Empty | ParseError::Incomplete) => break,
                    Err(_) => {
                        offset = offset.saturating_add(1);
                    }
                }
            }
        }

        update(&mut model, Message::Tick);
    }

    info!("exiting");
    Ok(())
}

/// Host-provided decorations around the thread.
fn register_outlets(model: &mut Model, args: &CliArgs, author: &str) {
    model.outlets.register(
        OutletPosition::Top,
        TextOutlet::new(format!(
            "Discussion {} in {}",
            args.thread_id,
            args.db_path.display()
        )),
    );
    model.outlets.register(
        OutletPosition::LeftOfReplyPlaceholder,
        TextOutlet::new(format!("@{author}")),
    );
    model.outlets.register(
        OutletPosition::BottomOfCommentEditor,
        TextOutlet::new("Markdown is kept as typed. Press > on a comment to quote it."),
    );
}

/// Log to a file so the alternate screen stays clean.
///
/// The returned guard flushes the background writer when dropped, so it must
/// live until `main` returns.
fn init_logging() -> Result<WorkerGuard> {
    let path = std::env::var_os("THREAD_UI_LOG_FILE")
        .map_or_else(|| std::env::temp_dir().join("thread-ui.log"), PathBuf::from);
    let (dir, file_name) = split_log_path(&path)?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env("THREAD_UI_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// Directory and file name for the appender. A bare file name logs to the
/// current directory.
fn split_log_path(path: &Path) -> Result<(&Path, &OsStr)> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    Ok((dir, file_name))
}

struct AutoWrapGuard;

impl AutoWrapGuard {
    fn new() -> std::io::Result<Self> {
        let mut out = std::io::stdout();
        out.write_all(b"\x1b[?7l")?; // Disable line wrap
        out.flush()?;
        Ok(Self)
    }
}

impl Drop for AutoWrapGuard {
    fn drop(&mut self) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x1b[?7h"); // Re-enable line wrap
        let _ = out.flush();
    }
}

struct CliArgs {
    db_path: PathBuf,
    thread_id: String,
    user: Option<String>,
    theme: Option<String>,
    read_only: bool,
}

fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut db_path: Option<PathBuf> = None;
    let mut thread_id: Option<String> = None;
    let mut user: Option<String> = None;
    let mut theme: Option<String> = None;
    let mut read_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Usage: thread-ui [options]");
                println!();
                println!("Options:");
                println!("  --db <path>           Comment database (default {DEFAULT_DB})");
                println!("  --thread <id>         Thread to open (default {DEFAULT_THREAD})");
                println!("  --user <name>         Author name for new comments");
                println!("  --theme <name|path>   Load theme by name or JSON path");
                println!("  --read-only           Browse without saving changes");
                println!();
                println!("Environment:");
                println!("  THREAD_UI_THEME     Theme name or JSON path");
                println!("  THREAD_UI_LOG       Log filter (default info)");
                println!("  THREAD_UI_LOG_FILE  Log file path");
                std::process::exit(0);
            }
            "--db" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--db requires a path");
                }
                db_path = Some(PathBuf::from(&args[i]));
            }
            "--thread" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--thread requires an id");
                }
                thread_id = Some(args[i].clone());
            }
            "--user" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--user requires a name");
                }
                user = Some(args[i].clone());
            }
            "--theme" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--theme requires a name or path");
                }
                theme = Some(args[i].clone());
            }
            "--read-only" => read_only = true,
            arg => {
                anyhow::bail!("Unknown option: {arg}");
            }
        }
        i += 1;
    }

    Ok(CliArgs {
        db_path: db_path.unwrap_or_else(|| PathBuf::from(DEFAULT_DB)),
        thread_id: thread_id.unwrap_or_else(|| DEFAULT_THREAD.to_string()),
        user,
        theme,
        read_only,
    })
}

/// Read from stdin with a timeout
fn read_with_timeout(buf: &mut [u8], _timeout: Duration) -> std::io::Result<usize> {
    use std::io::Read;
    // Relies on the terminal being in raw mode with VMIN=0, VTIME=1
    std::io::stdin().read(buf)
}
