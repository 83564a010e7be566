/// orbview Terminal - the viewer rendered as ASCII art
///
/// Controls:
///   - Mouse: Orbit
///   - W/S, K/J, Up/Down: Dolly
///   - [ / ]: Narrow / widen stereo eye separation
///   - 1-9: Menu entries (shapes, mono, stereo)
///   - Q/ESC: Quit

use std::io;
use orbview_core::ViewerConfig;
use orbview_terminal::TerminalApp;

fn main() -> io::Result<()> {
    let mut app = TerminalApp::new(ViewerConfig::default())?;
    app.run()?;

    println!("Thank you for using orbview!");
    Ok(())
}
