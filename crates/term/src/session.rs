//! Session: the terminal client's view-model.
//!
//! Owns the game, its random source and the display theme. Key presses come
//! in as [`ClientAction`]s; the renderer reads everything back through
//! [`Session::snapshot`] and [`Session::status`].

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::{rng, Clock, EngineError, GameSnapshot, GameState, MoveOutcome, SystemClock};
use crate::input::ClientAction;
use crate::types::{Direction, Theme};

pub struct Session<C: Clock = SystemClock> {
    size: usize,
    state: GameState,
    rng: StdRng,
    clock: C,
    theme: Theme,
    last: Option<MoveOutcome>,
    quit: bool,
}

impl Session<SystemClock> {
    /// New session on an NxN board; `seed` makes tile spawns reproducible.
    pub fn new(size: usize, seed: Option<u64>) -> Result<Self, EngineError> {
        let rng = match seed {
            Some(seed) => rng::seeded(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_parts(size, rng, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_parts(size: usize, mut rng: StdRng, clock: C) -> Result<Self, EngineError> {
        let state = GameState::new(size, &mut rng, &clock)?;
        Ok(Self {
            size,
            state,
            rng,
            clock,
            theme: Theme::default(),
            last: None,
            quit: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn last_outcome(&self) -> Option<&MoveOutcome> {
        self.last.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Apply one action. Returns true when the screen needs a redraw.
    pub fn apply(&mut self, action: ClientAction) -> Result<bool, EngineError> {
        match action {
            ClientAction::Move(direction) => Ok(self.play(direction)),
            ClientAction::NewGame => {
                self.state = GameState::new(self.size, &mut self.rng, &self.clock)?;
                self.last = None;
                Ok(true)
            }
            ClientAction::ToggleTheme => {
                self.theme = self.theme.toggled();
                Ok(true)
            }
            ClientAction::Quit => {
                self.quit = true;
                Ok(false)
            }
        }
    }

    fn play(&mut self, direction: Direction) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        let outcome = self.state.apply_move(direction, &mut self.rng, &self.clock);
        self.last = Some(outcome);
        true
    }

    /// One-line status for the footer, if there is something to say.
    pub fn status(&self) -> Option<String> {
        if self.state.is_game_over() {
            return Some(format!(
                "Game over with {} points. Press n for a new game.",
                self.state.score()
            ));
        }
        match self.last {
            Some(MoveOutcome { moved: false, .. }) => Some("Nothing moved.".to_string()),
            Some(MoveOutcome { gained, .. }) if gained > 0 => Some(format!("+{gained}")),
            _ => None,
        }
    }
}
