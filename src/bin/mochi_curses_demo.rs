//! Mochi Curses Demo
//!
//! Takes over the terminal, draws a bordered panel and reports every key and
//! mouse event until `q` is pressed.
//!
//! # Usage
//!
//! ```bash
//! MOCHI_CURSES_LOG=/tmp/demo.log RUST_LOG=debug mochi-curses-demo
//! mochi-curses-demo --config demo.json
//! ```

use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use mochi_curses::attr::{A_BOLD, A_REVERSE, COLOR_BLACK, COLOR_CYAN, COLOR_YELLOW};
use mochi_curses::key::{key_name, ERR, KEY_MOUSE};
use mochi_curses::mouse::{ALL_MOUSE_EVENTS, REPORT_MOUSE_POSITION};
use mochi_curses::{CursesError, CursesResult, MousePoll, Session, SessionConfig, Window};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to the file named by `MOCHI_CURSES_LOG`; the terminal itself is busy
fn init_logging() {
    let Ok(path) = std::env::var("MOCHI_CURSES_LOG") else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        Err(e) => eprintln!("Cannot open log file {}: {}", path, e),
    }
}

fn print_help() {
    println!("mochi-curses-demo - curses window and mouse demo");
    println!();
    println!("USAGE:");
    println!("    mochi-curses-demo [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>    Load a JSON session configuration");
    println!("    -h, --help             Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    MOCHI_CURSES_LOG       Write logs to this file");
    println!("    RUST_LOG               Log filter (default: info)");
    println!("    ESCDELAY               Escape sequence timeout in milliseconds");
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                i += 1;
                config_path = args.get(i).cloned();
            }
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match SessionConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => SessionConfig::default(),
    };

    match run(config.with_env_overrides()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("demo failed: {e}");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Write a status line inside the panel; text too long for it is cut off
fn show(panel: &Window, y: usize, text: &str) -> CursesResult<()> {
    match panel.write_line_at(2, y, text) {
        Err(CursesError::WriteOverflow(_)) | Ok(()) => Ok(()),
        Err(e) => Err(e),
    }
}

fn run(config: SessionConfig) -> CursesResult<()> {
    let (session, root) = Session::init_with(config)?;
    session.no_echo();
    session.half_delay(5)?;
    session.enable_special_keys(&root, true)?;
    let mut mouse = session.init_mouse(ALL_MOUSE_EVENTS | REPORT_MOUSE_POSITION)?;

    let mut title_attr = A_BOLD;
    if session.supports_color() {
        session.enable_colors()?;
        session.define_pair(1, COLOR_YELLOW, COLOR_BLACK)?;
        session.define_pair(2, COLOR_CYAN, COLOR_BLACK)?;
        title_attr |= session.pair_attribute(1);
    }

    let (width, height) = root.bounds()?;
    root.set_attribute(title_attr)?;
    root.write_line_at(0, 0, "mochi-curses demo: press q to quit")?;
    root.set_attribute(0)?;
    root.refresh()?;

    let panel = root.create_child(height.saturating_sub(2).min(8), width.min(50), 0, 1)?;
    panel.draw_border('|', '-')?;
    panel.set_attribute(session.pair_attribute(2))?;
    show(&panel, 1, "waiting for input")?;
    panel.refresh()?;
    session.commit_all()?;

    loop {
        let key = panel.read_char()?;
        if key == ERR {
            continue;
        }
        if key == b'q' as i32 {
            break;
        }
        if key == KEY_MOUSE {
            if let MousePoll::Event(event) = mouse.poll() {
                let inside = panel.to_local(event.x, event.y)?;
                let text = format!(
                    "mouse {:#x} at ({}, {}) local {:?}",
                    event.state, event.x, event.y, inside
                );
                show(&panel, 2, &text)?;
            }
        } else {
            panel.enable_attribute(A_REVERSE)?;
            show(&panel, 1, &format!("key {}", key_name(key)))?;
            panel.disable_attribute(A_REVERSE)?;
        }
        panel.draw_border('|', '-')?;
        panel.refresh()?;
        session.commit_all()?;
    }

    panel.destroy()?;
    session.end()
}
