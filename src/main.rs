use std::error::Error;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders::assets::AssetStore;
#[cfg(feature = "rodio")]
use invaders::audio::RodioSink;
#[cfg(not(feature = "rodio"))]
use invaders::audio::SilentSink;
use invaders::config::LaunchConfig;
use invaders::display::TerminalRenderer;
use invaders::game_loop::{GameLoop, LoopExit, SurfaceEvent};
use invaders::input::{KeyAction, KeyInput, HOLD_WINDOW};
use invaders::world::World;

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file; stderr would scribble over the alternate screen.
fn init_logging(config: &LaunchConfig) -> Result<(), Box<dyn Error>> {
    let file = File::create(&config.log_file)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Map a terminal event onto the game's surface events. Q, Esc and Ctrl-C
/// stand in for closing the window.
fn translate(event: Event) -> Option<SurfaceEvent> {
    let Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    }) = event
    else {
        return None;
    };

    let action = match kind {
        KeyEventKind::Press | KeyEventKind::Repeat => KeyAction::Press,
        KeyEventKind::Release => KeyAction::Release,
    };
    let quit = matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL));

    if quit && action == KeyAction::Press {
        Some(SurfaceEvent::Closed)
    } else {
        Some(SurfaceEvent::Key(KeyInput { code, action }))
    }
}

/// Blocking terminal reads live on their own thread so the loop never waits
/// on I/O; events reach it through the channel.
fn spawn_input_thread(tx: mpsc::Sender<SurfaceEvent>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if let Some(surface_event) = translate(ev) {
                    if tx.send(surface_event).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
            }
            Err(e) => {
                warn!("terminal input failed: {e}");
                let _ = tx.send(SurfaceEvent::Closed);
                break;
            }
        }
    });
}

/// Block until ENTER (play again → true) or a close request (→ false).
fn wait_for_restart(rx: &mpsc::Receiver<SurfaceEvent>) -> bool {
    loop {
        match rx.recv() {
            Ok(SurfaceEvent::Key(KeyInput {
                code: KeyCode::Enter,
                action: KeyAction::Press,
            })) => return true,
            Ok(SurfaceEvent::Closed) | Err(_) => return false,
            Ok(_) => {}
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn Error>> {
    let config = LaunchConfig::from_env()?;
    init_logging(&config)?;
    info!("loading assets from {}", config.asset_dir.display());

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events need the kitty keyboard protocol; elsewhere releases
    // are synthesised from key-repeat silence.
    let keyboard_enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    info!("keyboard release events: {keyboard_enhanced}");

    let (tx, rx) = mpsc::channel::<SurfaceEvent>();
    spawn_input_thread(tx);

    let result = run(&mut out, &rx, &config, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<SurfaceEvent>,
    config: &LaunchConfig,
    keyboard_enhanced: bool,
) -> Result<(), Box<dyn Error>> {
    let mut assets = AssetStore::new(config.asset_dir.clone());
    let result = play_rounds(out, rx, config, keyboard_enhanced, &mut assets);
    assets.cleanup();
    result
}

/// Play rounds until the player quits or declines a restart.
fn play_rounds<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<SurfaceEvent>,
    config: &LaunchConfig,
    keyboard_enhanced: bool,
    assets: &mut AssetStore,
) -> Result<(), Box<dyn Error>> {
    let mut round: u64 = 0;

    loop {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(round)),
            None => StdRng::from_entropy(),
        };
        round += 1;

        let mut game = GameLoop::new(World::new(), assets, rng);
        if !keyboard_enhanced {
            game = game.with_hold_window(HOLD_WINDOW);
        }

        out.execute(terminal::Clear(terminal::ClearType::All))?;
        let (cols, rows) = terminal::size()?;
        let mut renderer = TerminalRenderer::new(&mut *out, cols, rows);

        let exit = game.run(&mut renderer, rx, music_sink())?;
        if exit == LoopExit::Closed || !wait_for_restart(rx) {
            return Ok(());
        }
    }
}

#[cfg(feature = "rodio")]
fn music_sink() -> RodioSink {
    RodioSink::default()
}

#[cfg(not(feature = "rodio"))]
fn music_sink() -> SilentSink {
    SilentSink
}
