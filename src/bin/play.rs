//! Play 2048 in the terminal against the local engine.
//!
//! Uses crossterm for input and the framebuffer renderer from `grid2048::term`.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};

use grid2048::input::handle_key_event;
use grid2048::term::{FrameBuffer, GameView, Hud, Session, TerminalRenderer, Viewport};
use grid2048::types::{is_valid_size, DEFAULT_SIZE};

#[derive(Parser, Debug)]
#[command(name = "grid2048-play", version, about = "Play 2048 in the terminal")]
struct Args {
    /// Board size (3-8)
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Seed for reproducible tile spawns
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !is_valid_size(args.size) {
        anyhow::bail!("board size must be between 3 and 8, got {}", args.size);
    }
    let mut session = Session::new(args.size, args.seed)?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, session: &mut Session) -> Result<()> {
    let view = GameView::default();
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut viewport = Viewport::new(w, h);
    let mut fb = FrameBuffer::new(w, h);
    let mut dirty = true;

    while !session.should_quit() {
        if dirty {
            let status = session.status();
            let hud = Hud {
                theme: session.theme(),
                status: status.as_deref(),
            };
            view.render_into(&session.snapshot(), hud, viewport, &mut fb);
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if let Some(action) = handle_key_event(key) {
                    dirty = session.apply(action)?;
                }
            }
            Event::Resize(w, h) => {
                viewport = Viewport::new(w, h);
                term.invalidate();
                dirty = true;
            }
            _ => {}
        }
    }

    Ok(())
}
