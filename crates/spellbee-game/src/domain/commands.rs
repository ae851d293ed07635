//! Commands for the game session context.

use spellbee_core::command::Command;
use uuid::Uuid;

/// Command to start a new game under a fresh session id.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "game.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to show the selected definition of the current word.
#[derive(Debug, Clone)]
pub struct ShowDefinition {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player's session.
    pub session_id: String,
}

impl Command for ShowDefinition {
    fn command_type(&self) -> &'static str {
        "game.show_definition"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to advance to the next definition of the current word.
#[derive(Debug, Clone)]
pub struct CycleDefinition {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player's session.
    pub session_id: String,
}

impl Command for CycleDefinition {
    fn command_type(&self) -> &'static str {
        "game.cycle_definition"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to submit a spelling guess.
#[derive(Debug, Clone)]
pub struct SubmitGuess {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player's session.
    pub session_id: String,
    /// The spelling the player typed.
    pub guess: String,
}

impl Command for SubmitGuess {
    fn command_type(&self) -> &'static str {
        "game.submit_guess"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace a session's game with a fresh one.
#[derive(Debug, Clone)]
pub struct ResetGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player's session.
    pub session_id: String,
}

impl Command for ResetGame {
    fn command_type(&self) -> &'static str {
        "game.reset"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
