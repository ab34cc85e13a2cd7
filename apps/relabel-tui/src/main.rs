//! relabel TUI - annotation review console
//!
//! Terminal table view over the live row listing: edit one row in place
//! while background refreshes keep the rest of the table current, and play
//! each row's audio clip with seek control.

mod app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use relabel_client::{Viewer, ViewerConfig};

use app::App;

fn main() -> anyhow::Result<()> {
    // Setup logging
    tracing_subscriber::fmt::init();

    // Start the sync client (needs the runtime for its background tasks)
    let runtime = tokio::runtime::Runtime::new()?;
    let config = ViewerConfig::from_env();
    let viewer = {
        let _guard = runtime.enter();
        Viewer::start(config)?
    };
    let mut app = App::new(viewer, runtime.handle().clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Tear down the poll timer and push listener together
    runtime.block_on(app.shutdown());

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        // Short poll timeout so background refreshes and playback progress
        // repaint without a keypress.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code) {
                    return Ok(());
                }
            }
        }
    }
}
