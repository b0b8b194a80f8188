//! CogniBench - reaction, memory, typing and aim benchmarks in the terminal

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders},
    Terminal,
};
use std::fs::File;
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cognibench::{
    config::{self, Config},
    ui::{
        AimField, App, AppState, AppView, DigitSpanPanel, HelpPanel, ReactionPanel,
        ResultsPanel, SequenceGrid, StatusBar, TabBar, ThemeColors, TypingPassage,
    },
};

/// Width of the results column next to a test
const RESULTS_WIDTH: u16 = 42;

/// Send log output to a file; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    let path = config::config_dir()?.join("cognibench.log");
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("logging disabled: {:#}", e);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("using default config: {}", e);
            Config::default()
        }
    };
    log::info!(
        "starting cognibench {} (user: {})",
        env!("CARGO_PKG_VERSION"),
        config.results.user.as_deref().unwrap_or("none")
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing Ctrl-C handler")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let outcome = run(&mut terminal, &mut app, &interrupted);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    outcome?;

    let attempts = app.history.len();
    log::info!("session finished with {} attempt(s)", attempts);
    println!("\nCogniBench session complete.");
    println!("Attempts recorded: {}", attempts);
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, interrupted: &AtomicBool) -> Result<()> {
    let tick_rate = app.config.refresh_interval();
    let colors = ThemeColors::from_theme(app.config.ui.theme);

    loop {
        app.tick();

        let mut aim_area = None;
        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Tab bar
                    Constraint::Min(10),   // Main content
                    Constraint::Length(1), // Status bar
                ])
                .split(frame.area());

            let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
            frame.render_widget(TabBar::new(&tab_names, app.view.index()), chunks[0]);

            let results = app.current_results();
            match app.view {
                AppView::Help => frame.render_widget(HelpPanel, chunks[1]),
                AppView::Home => {
                    let panel = ResultsPanel::new(&results, " Session ").colors(colors);
                    frame.render_widget(panel, chunks[1]);
                }
                view => {
                    let columns = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Min(30), Constraint::Length(RESULTS_WIDTH)])
                        .split(chunks[1]);
                    let play = columns[0];

                    match view {
                        AppView::Reaction => {
                            frame.render_widget(ReactionPanel::new(&app.reaction, colors), play)
                        }
                        AppView::SequenceRecall => {
                            frame.render_widget(SequenceGrid::new(&app.sequence, colors), play)
                        }
                        AppView::DigitSpan => {
                            frame.render_widget(DigitSpanPanel::new(&app.digit_span, colors), play)
                        }
                        AppView::Typing => {
                            frame.render_widget(TypingPassage::new(&app.typing, colors), play)
                        }
                        _ => {
                            let block = Block::default()
                                .title(format!(" Aim - {}s ", app.aim.seconds_left()))
                                .borders(Borders::ALL)
                                .border_set(border::ROUNDED)
                                .border_style(Style::default().fg(colors.dim));
                            let inner: Rect = block.inner(play);
                            frame.render_widget(block, play);
                            frame.render_widget(AimField::new(&app.aim, colors), inner);
                            aim_area = Some(inner);
                        }
                    }

                    let panel = ResultsPanel::new(&results, view.name()).colors(colors);
                    frame.render_widget(panel, columns[1]);
                }
            }

            let phase = app.active_test().map(|t| t.phase_name()).unwrap_or("-");
            let elapsed = app.elapsed_formatted();
            let status = StatusBar::new(phase, app.view.name(), &elapsed, app.history.len())
                .message(app.get_status());
            frame.render_widget(status, chunks[2]);
        })?;
        if let Some(area) = aim_area {
            app.set_aim_area(area);
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        app.quit();
                    } else {
                        app.handle_key(key.code);
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if interrupted.load(Ordering::SeqCst) {
            log::info!("interrupted, shutting down");
            app.quit();
        }

        // Check if we should quit
        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}
