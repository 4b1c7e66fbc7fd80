mod app;
mod config;
mod cover_art;
mod keys;
mod ui;

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};
use warbler_core::{self as wc, audio::AudioOutput, warbler_state::LoftyTagReader};

use app::Tui;
use config::Config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding settings, playlists, history and the log file
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Music folder to scan, overriding (and replacing) the saved setting
    #[arg(long)]
    music_folder: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.data_dir)?;

    // The terminal is ours, so logs go to a file
    let log_file = std::fs::File::create(args.data_dir.join("warbler-tui.log"))?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warbler=info")),
        )
        .init();

    let config = Config::load(&args.data_dir);

    let core = wc::App::new(wc::AppArgs {
        storage: wc::Storage::new(&args.data_dir),
        app_root: args.data_dir.clone(),
        music_folder: args.music_folder,
        output: open_output(),
        tag_reader: Box::new(LoftyTagReader),
        rng_seed: None,
    });
    let mut tui = Tui::new(core, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(tui.config.general.tick_rate_ms);
    let result = run_app(&mut terminal, &mut tui, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Persists settings and history and stops audio
    tui.core.shutdown();

    result
}

#[cfg(feature = "audio")]
fn open_output() -> Box<dyn AudioOutput> {
    match wc::audio::RodioOutput::new() {
        Ok(output) => Box::new(output),
        Err(e) => {
            tracing::warn!("no audio device, playing silently: {e}");
            Box::new(wc::audio::NullOutput)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_output() -> Box<dyn AudioOutput> {
    tracing::info!("built without audio, playing silently");
    Box::new(wc::audio::NullOutput)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    tui: &mut Tui,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        if tui.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, tui))?;
            tui.needs_redraw = false;
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            // Drain everything queued so a burst of input costs one redraw
            let process_event = |evt: Event, tui: &mut Tui| match evt {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => tui.handle_key(&key),
                Event::Mouse(mouse) => tui.handle_mouse(&mouse),
                Event::Resize(_, _) => tui.needs_redraw = true,
                _ => {}
            };

            process_event(event::read()?, tui);
            while event::poll(Duration::ZERO)? {
                process_event(event::read()?, tui);
            }
        }

        // Input is applied on the next frame, which runs early when any is waiting
        if tui.has_pending_input() || last_tick.elapsed() >= tick_rate {
            let outcome = tui.tick(Instant::now());
            last_tick = Instant::now();
            if outcome == wc::FrameOutcome::Quit {
                return Ok(());
            }
        }

        if tui.should_quit() {
            return Ok(());
        }
    }
}
