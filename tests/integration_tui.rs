// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the menu, playing, and pause boundaries without internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_tui -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn menu_start_pause_and_quit() -> Result<(), Box<dyn std::error::Error>> {
    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("jumble");
    let cmd = bin.display().to_string();

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Start a game from the menu
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(200));

    // Type a throwaway guess and submit it (wrong answers just flash)
    p.send("zzz\r")?;
    std::thread::sleep(Duration::from_millis(200));

    // Pause, then resume
    p.send("\x1b")?; // ESC
    std::thread::sleep(Duration::from_millis(100));
    p.send("\x1b")?;
    std::thread::sleep(Duration::from_millis(100));

    // Quit from anywhere
    p.send("\x03")?; // Ctrl+C

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}
