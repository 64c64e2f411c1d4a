//! progress-hud preview
//!
//! Plays a short scripted session (spinner, progress ring, success glyph)
//! in the terminal. Set `PROGRESS_HUD_DUMP=json` to print every frame as a
//! JSON line instead of drawing it.

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::Instant;
use tracing::info;

use progress_hud::display::{ctrl, TerminalHost};
use progress_hud::{paths, Hud, HudConfig};

/// Repaint period while a fade is in flight
const FRAME_PERIOD: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Ansi,
    Json,
}

impl Output {
    fn from_env() -> Self {
        match std::env::var("PROGRESS_HUD_DUMP").as_deref() {
            Ok("json") => Output::Json,
            _ => Output::Ansi,
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Spin(&'static str),
    Progress(f64),
    Success(&'static str),
}

/// Steps and their offsets from the start of the session
fn script() -> Vec<(Duration, Step)> {
    let mut steps = vec![(Duration::ZERO, Step::Spin("Connecting"))];
    let start = Duration::from_secs(2);
    for i in 0..=20 {
        let progress = i as f64 / 20.0;
        steps.push((start + Duration::from_millis(150) * i, Step::Progress(progress)));
    }
    steps.push((Duration::from_millis(5500), Step::Success("Done")));
    steps
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

fn apply(hud: &mut Hud<TerminalHost>, step: Step, done: &Rc<Cell<bool>>) {
    match step {
        Step::Spin(status) => hud.show_status(status),
        Step::Progress(progress) => hud.show_progress_status(progress, "Downloading"),
        Step::Success(status) => {
            hud.show_success(status);
            let done = Rc::clone(done);
            hud.dismiss_after_with(Duration::from_millis(1500), move || done.set(true));
        }
    }
}

fn write_frame(hud: &mut Hud<TerminalHost>, output: Output) -> Result<()> {
    let mut stdout = std::io::stdout();
    match output {
        Output::Ansi => {
            if let Some(text) = hud.host_mut().take_output() {
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
        }
        Output::Json => {
            if let Some(frame) = hud.frame_at(Instant::now()) {
                let line = serde_json::to_string(&frame).context("failed to encode frame")?;
                writeln!(stdout, "{}", line)?;
            }
        }
    }
    Ok(())
}

/// Follow terminal resizes: rebuild the cell buffer and relayout the HUD
fn follow_resize(hud: &mut Hud<TerminalHost>, last: &mut (u16, u16)) {
    let Ok(size) = crossterm::terminal::size() else {
        return;
    };
    if size == *last {
        return;
    }
    *last = size;
    info!(cols = size.0, rows = size.1, "terminal resized");
    hud.host_mut().resize(size.0, size.1);
    hud.resize();
}

async fn run(hud: &mut Hud<TerminalHost>, output: Output, mut size: (u16, u16)) -> Result<()> {
    let done = Rc::new(Cell::new(false));
    let start = Instant::now();
    let mut steps = script().into_iter();
    let mut next_step = steps.next();
    let mut refresh = tokio::time::interval(FRAME_PERIOD);

    loop {
        let deadline = next_step.as_ref().map(|(offset, _)| start + *offset);

        tokio::select! {
            Some(event) = hud.next_event() => hud.handle_event(event),
            _ = refresh.tick(), if output == Output::Ansi => {
                follow_resize(hud, &mut size);
                hud.redraw();
            }
            _ = until(deadline) => {
                if let Some((_, step)) = next_step.take() {
                    apply(hud, step, &done);
                }
                next_step = steps.next();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }

        write_frame(hud, output)?;
        if done.get() {
            break;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("progress_hud=info".parse()?),
        )
        .init();

    paths::log_paths();
    let config = HudConfig::load(paths::config_path()).context("failed to load hud config")?;

    let output = Output::from_env();
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    info!(cols, rows, ?output, "starting preview");

    let mut hud = Hud::new(config, TerminalHost::new(cols, rows))?;

    if output == Output::Ansi {
        print!("{}{}", ctrl::clear_screen(), ctrl::hide_cursor());
    }
    let result = run(&mut hud, output, (cols, rows)).await;
    if output == Output::Ansi {
        print!("{}{}", ctrl::clear_screen(), ctrl::show_cursor());
        std::io::stdout().flush()?;
    }

    result
}
