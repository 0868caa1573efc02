/// Line-ending handling for text-mode sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Newline {
    /// Translate `\n` to the platform line separator.
    #[default]
    Native,
    /// Write text exactly as given.
    Untranslated,
    Lf,
    CrLf,
    Cr,
}

impl Newline {
    /// The sequence `\n` is rewritten to, or `None` when no translation applies.
    #[must_use]
    pub const fn replacement(self) -> Option<&'static str> {
        match self {
            Newline::Native => {
                if cfg!(windows) {
                    Some("\r\n")
                } else {
                    None
                }
            }
            Newline::Untranslated | Newline::Lf => None,
            Newline::CrLf => Some("\r\n"),
            Newline::Cr => Some("\r"),
        }
    }
}

/// Per-call options for a write session.
#[derive(Clone, Debug, Default)]
pub struct WriteOptions {
    /// Commit even when the session ends abnormally.
    ///
    /// This trades crash-safety for keeping partial results: a session that
    /// fails halfway still replaces the destination with whatever was written.
    /// Leave it off unless partial output is genuinely more useful than the
    /// previous file.
    pub force: bool,
    pub newline: Newline,
    /// Write buffer size; `Some(0)` disables buffering, `None` uses the default.
    pub buffer_capacity: Option<usize>,
}

impl WriteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn newline(mut self, newline: Newline) -> Self {
        self.newline = newline;
        self
    }

    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }
}
