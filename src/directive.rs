//! Dynamic routing: what a state tells the scheduler to run next.
//!
//! A state's return value is a [`Directive`]. Unlike the static dependency
//! graph, which the engine computes once before the run starts, a directive
//! is evaluated after each state completes, letting a state decide its own
//! successors from data it only has at runtime (see the crate-level docs
//! on dynamic routing alongside static dependencies).

use serde::{Deserialize, Serialize};

/// What a state asks the scheduler to do after it returns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// No explicit routing; the scheduler falls through to whichever
    /// statically-dependent states just became ready.
    #[default]
    None,
    /// Activate a single named state, regardless of whether its static
    /// dependencies are all satisfied yet (it waits until they are).
    Goto(String),
    /// Activate every named state.
    GotoAll(Vec<String>),
}

impl Directive {
    /// Build a [`Directive::Goto`].
    pub fn goto(state: impl Into<String>) -> Self {
        Self::Goto(state.into())
    }

    /// Build a [`Directive::GotoAll`].
    pub fn goto_all<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::GotoAll(states.into_iter().map(Into::into).collect())
    }

    /// The state names this directive names, in order.
    pub fn targets(&self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::Goto(name) => vec![name.clone()],
            Self::GotoAll(names) => names.clone(),
        }
    }
}
