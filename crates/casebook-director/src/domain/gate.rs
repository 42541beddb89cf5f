//! Startup environment gate.
//!
//! Checked before a director is created. A refused client never reaches the
//! game; it gets the refusal message instead.

use thiserror::Error;

/// What the host knows about the connecting client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientEnvironment {
    /// The client's `User-Agent`, if it sent one.
    pub user_agent: Option<String>,
}

/// A fatal, player-facing refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GateRefusal {
    /// Message shown instead of the game.
    pub message: String,
}

/// Decides whether a client may start a game.
pub trait EnvironmentGate: Send + Sync {
    /// Admit or refuse `client`.
    ///
    /// # Errors
    ///
    /// Returns a [`GateRefusal`] for disallowed environments.
    fn check(&self, client: &ClientEnvironment) -> Result<(), GateRefusal>;
}

/// Refuses clients whose `User-Agent` contains any blocked fragment,
/// case-insensitively. Clients without a `User-Agent` are admitted.
#[derive(Debug, Clone, Default)]
pub struct UserAgentGate {
    blocked: Vec<String>,
}

impl UserAgentGate {
    /// Creates a gate from blocked fragments. Empty fragments are dropped.
    #[must_use]
    pub fn new<I, S>(blocked: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked: blocked
                .into_iter()
                .map(|fragment| fragment.as_ref().trim().to_lowercase())
                .filter(|fragment| !fragment.is_empty())
                .collect(),
        }
    }
}

impl EnvironmentGate for UserAgentGate {
    fn check(&self, client: &ClientEnvironment) -> Result<(), GateRefusal> {
        let Some(agent) = client.user_agent.as_deref() else {
            return Ok(());
        };
        let agent = agent.to_lowercase();
        match self.blocked.iter().find(|fragment| agent.contains(fragment.as_str())) {
            Some(fragment) => Err(GateRefusal {
                message: format!(
                    "This browser is not supported ({fragment}). Please switch to a supported browser to play."
                ),
            }),
            None => Ok(()),
        }
    }
}
