use crate::payload::Payload;
use crate::rules::{self, ValidationError};
use std::fmt;
use tracing::debug;

/// Where the collector is in the key / value / confirm cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// The next line names a key.
    AwaitingKey,
    /// The next line is the value for `key`.
    AwaitingValue { key: String },
    /// Both required keys are present and the user was asked whether to go on.
    AwaitingContinueConfirmation,
}

/// What the collector wants shown to the user after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Ask for the key with the given 1-based number.
    EnterKey(usize),
    /// Ask for the value of a named key.
    EnterValue(String),
    /// The value was rejected; the same key is still pending.
    Invalid(ValidationError),
    /// Both required keys are present; ask whether to keep going.
    Continue,
    /// The answer was neither `y` nor `n`.
    RetryContinue,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::EnterKey(n) => write!(f, "Enter key {n}"),
            Reply::EnterValue(key) => write!(f, "Enter {key}"),
            Reply::Invalid(err) => write!(f, "{err}"),
            Reply::Continue => f.write_str("Continue? (y/n)"),
            Reply::RetryContinue => f.write_str("Try again. Continue? (y/n)"),
        }
    }
}

/// Result of feeding one line to a [`Collector`].
#[derive(Debug)]
pub enum Step {
    /// Keep reading; show `reply` first.
    Next { collector: Collector, reply: Reply },
    /// The user declined to continue; the payload is ready to encode.
    Finish(Payload),
}

/// Input state machine that accumulates a [`Payload`] one line at a time.
///
/// Transitions consume the collector and hand back the next one, so a driver
/// owns exactly one session state at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collector {
    payload: Payload,
    state: State,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        Self {
            payload: Payload::new(),
            state: State::AwaitingKey,
        }
    }

    /// The prompt shown before the first line is read.
    pub fn first_prompt(&self) -> Reply {
        self.next_key_prompt()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn asked_to_continue(&self) -> bool {
        matches!(self.state, State::AwaitingContinueConfirmation)
    }

    /// Interpret `line` according to the current state.
    pub fn step(self, line: &str) -> Step {
        let Collector { mut payload, state } = self;
        debug!(?state, line, "collector step");

        let (state, reply) = match state {
            State::AwaitingKey => {
                let key = line.to_string();
                (State::AwaitingValue { key: key.clone() }, Reply::EnterValue(key))
            }
            State::AwaitingValue { key } => match rules::validate(&key, line) {
                Err(err) => {
                    debug!(%key, "value rejected");
                    (State::AwaitingValue { key }, Reply::Invalid(err))
                }
                Ok(()) => {
                    payload.insert(key, line);
                    if rules::required_present(&payload) {
                        (State::AwaitingContinueConfirmation, Reply::Continue)
                    } else {
                        (State::AwaitingKey, Reply::EnterKey(payload.len() + 1))
                    }
                }
            },
            State::AwaitingContinueConfirmation => match line {
                "y" => (State::AwaitingKey, Reply::EnterKey(payload.len() + 1)),
                "n" => return Step::Finish(payload),
                _ => (State::AwaitingContinueConfirmation, Reply::RetryContinue),
            },
        };

        Step::Next {
            collector: Collector { payload, state },
            reply,
        }
    }

    fn next_key_prompt(&self) -> Reply {
        Reply::EnterKey(self.payload.len() + 1)
    }
}
