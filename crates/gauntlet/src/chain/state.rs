//! Run-state machine of a chain.
//!
//! The chain can be halted per-label (`Skipped`, via `optional` on an absent
//! value), per-branch (`Suspended`, via `branch_if`), or for the rest of the
//! run (`Bailed`). The three strengths nest: bail outranks suspend outranks
//! skip. Suspension and bailing remember the state to restore on resume, so
//! lifting the stronger halt never forgets a weaker one that was active
//! underneath it.
//!
//! All precedence lives in the transition methods below. Callers ask for a
//! transition unconditionally; a transition that a stronger halt forbids is a
//! no-op.

/// Where execution stands, stronger halts carrying the state to resume into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Checks and transforms execute normally.
    #[default]
    Active,
    /// The current label is being skipped; cleared by the next declaration.
    Skipped,
    /// A `branch_if` condition failed; cleared by `end_branch`.
    Suspended {
        /// State to restore when the branch ends.
        resume: Resume,
    },
    /// The chain stopped after recorded failures; cleared by `unbail`.
    Bailed {
        /// State to restore when the bail is lifted.
        resume: Resume,
    },
}

/// The state a halt resumes into. Only the two weakest states can be
/// underneath a suspend or a bail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Active,
    Skipped,
}

impl From<Resume> for RunState {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::Active => Self::Active,
            Resume::Skipped => Self::Skipped,
        }
    }
}

impl RunState {
    /// Whether checks and transforms may execute.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the chain is halted by a bail.
    pub fn is_bailed(self) -> bool {
        matches!(self, Self::Bailed { .. })
    }

    /// Whether the chain is halted by a failed branch condition.
    pub fn is_suspended(self) -> bool {
        matches!(self, Self::Suspended { .. })
    }

    /// Whether the current label is being skipped.
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::Skipped)
    }

    /// Whether a bail or suspension gates the structural operations
    /// (`optional`, `not`, `branch_if`).
    pub fn is_halted(self) -> bool {
        self.is_bailed() || self.is_suspended()
    }

    /// Skips the current label. Only takes effect while active.
    #[must_use]
    pub fn skip(self) -> Self {
        match self {
            Self::Active => Self::Skipped,
            other => other,
        }
    }

    /// Clears a per-label skip when a new label is declared. Stronger halts
    /// are untouched.
    #[must_use]
    pub fn clear_skip(self) -> Self {
        match self {
            Self::Skipped => Self::Active,
            other => other,
        }
    }

    /// Suspends execution for a branch, remembering whether a skip was
    /// active. A bail or an existing suspension wins.
    #[must_use]
    pub fn suspend(self) -> Self {
        match self {
            Self::Active => Self::Suspended {
                resume: Resume::Active,
            },
            Self::Skipped => Self::Suspended {
                resume: Resume::Skipped,
            },
            other => other,
        }
    }

    /// Ends a branch, restoring whatever the suspension covered. A no-op in
    /// every other state, including bailed.
    #[must_use]
    pub fn resume_branch(self) -> Self {
        match self {
            Self::Suspended { resume } => resume.into(),
            other => other,
        }
    }

    /// Bails. Works from any state: bailing while suspended collapses the
    /// suspension but keeps its resume state, so a later `unbail` still lands
    /// where the suspension would have.
    #[must_use]
    pub fn bail(self) -> Self {
        match self {
            Self::Active => Self::Bailed {
                resume: Resume::Active,
            },
            Self::Skipped => Self::Bailed {
                resume: Resume::Skipped,
            },
            Self::Suspended { resume } => Self::Bailed { resume },
            bailed @ Self::Bailed { .. } => bailed,
        }
    }

    /// Lifts a bail, restoring the remembered state. A no-op when not
    /// bailed.
    #[must_use]
    pub fn unbail(self) -> Self {
        match self {
            Self::Bailed { resume } => resume.into(),
            other => other,
        }
    }
}
