//! Open modes accepted by the atomic writer.
//!
//! Modes use the familiar `open()` letters so call sites read the same as
//! their plain-file counterparts: `"w"`, `"wb"`, `"wt"`, `"w+"`, `"w+b"`.
//! Parsing accepts every well-formed letter combination; only modes that
//! carry write intent (`w`) pass [`Mode::require_write`].
use std::fmt;
use std::str::FromStr;

use super::errors::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Append,
    Exclusive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Content {
    #[default]
    Text,
    Binary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mode {
    pub access: Access,
    pub content: Content,
    /// `+`: the handle may also be read from.
    pub update: bool,
}

impl Mode {
    pub const TEXT: Mode = Mode {
        access: Access::Write,
        content: Content::Text,
        update: false,
    };

    pub const BINARY: Mode = Mode {
        access: Access::Write,
        content: Content::Binary,
        update: false,
    };

    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self.access, Access::Write)
    }

    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self.content, Content::Binary)
    }

    /// Reject modes without write intent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMode` for read, append and exclusive-create modes.
    pub fn require_write(self) -> Result<Self> {
        if self.is_write() {
            Ok(self)
        } else {
            Err(Error::invalid_mode(format!(
                "mode {self} does not request write access"
            )))
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut access = None;
        let mut content = None;
        let mut update = false;
        for c in s.chars() {
            match c {
                'r' | 'w' | 'a' | 'x' => {
                    if access.is_some() {
                        return Err(Error::invalid_mode(format!(
                            "mode {s:?} names more than one access kind"
                        )));
                    }
                    access = Some(match c {
                        'r' => Access::Read,
                        'w' => Access::Write,
                        'a' => Access::Append,
                        _ => Access::Exclusive,
                    });
                }
                'b' | 't' => {
                    if content.is_some() {
                        return Err(Error::invalid_mode(format!(
                            "mode {s:?} mixes text and binary"
                        )));
                    }
                    content = Some(if c == 'b' {
                        Content::Binary
                    } else {
                        Content::Text
                    });
                }
                '+' if !update => update = true,
                _ => {
                    return Err(Error::invalid_mode(format!(
                        "mode {s:?} contains invalid character {c:?}"
                    )))
                }
            }
        }
        let access =
            access.ok_or_else(|| Error::invalid_mode(format!("mode {s:?} names no access kind")))?;
        Ok(Mode {
            access,
            content: content.unwrap_or_default(),
            update,
        })
    }
}

/// Anything a session mode can be given as: a [`Mode`] or a mode string.
pub trait IntoMode {
    /// # Errors
    ///
    /// Returns `InvalidMode` for strings that do not parse.
    fn into_mode(self) -> Result<Mode>;
}

impl IntoMode for Mode {
    fn into_mode(self) -> Result<Mode> {
        Ok(self)
    }
}

impl IntoMode for &str {
    fn into_mode(self) -> Result<Mode> {
        self.parse()
    }
}

impl IntoMode for &String {
    fn into_mode(self) -> Result<Mode> {
        self.parse()
    }
}

impl TryFrom<&str> for Mode {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = match self.access {
            Access::Read => "r",
            Access::Write => "w",
            Access::Append => "a",
            Access::Exclusive => "x",
        };
        f.write_str(a)?;
        if self.update {
            f.write_str("+")?;
        }
        if self.is_binary() {
            f.write_str("b")?;
        }
        Ok(())
    }
}
