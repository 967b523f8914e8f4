use crate::core_command::lister::name_from_bytes;
use crate::helpers::tokenize;
use std::ffi::OsString;

/// Stands in for a data port that could not be read. Nothing listens on
/// port 0, so the data connection for such a request always fails.
pub const UNREADABLE_PORT: u16 = 0;

/// A decoded control-channel request: `<verb> <dataPort> [<file>]`.
///
/// Only a get carries a file name, so the variant shape enforces that
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get { data_port: u16, file: OsString },
    List { data_port: u16 },
}

impl Command {
    /// Parses one control message.
    ///
    /// The verb alone decides the request; `None` means neither `g` nor `l`
    /// was sent. The port and file are read in order and stop at the first
    /// one that fails: a missing or non-numeric port becomes
    /// [`UNREADABLE_PORT`] and leaves the file name empty, which is never
    /// found. Tokens after the expected ones are ignored.
    pub fn parse(message: &[u8]) -> Option<Command> {
        let tokens = tokenize(message);
        let mut tokens = tokens.into_iter();

        let verb = tokens.next()?;
        let data_port = tokens.next().and_then(parse_port);

        match verb {
            b"g" => Some(Command::Get {
                data_port: data_port.unwrap_or(UNREADABLE_PORT),
                file: data_port
                    .and_then(|_| tokens.next())
                    .map(name_from_bytes)
                    .unwrap_or_default(),
            }),
            b"l" => Some(Command::List {
                data_port: data_port.unwrap_or(UNREADABLE_PORT),
            }),
            _ => None,
        }
    }

    pub fn data_port(&self) -> u16 {
        match self {
            Command::Get { data_port, .. } | Command::List { data_port } => *data_port,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Command::Get { .. } => "get",
            Command::List { .. } => "list",
        }
    }
}

fn parse_port(token: &[u8]) -> Option<u16> {
    std::str::from_utf8(token).ok()?.parse().ok()
}
