use std::process::{Child, Command};

use crate::error::Error;

/// Render a command the way it would be typed into a shell. Used in logs and error messages only,
/// the process itself always receives its arguments unquoted.
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| {
            let part = part.to_string_lossy();
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("\"{part}\"")
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn spawn(command: &mut Command) -> Result<Child, Error> {
    tracing::debug!(command = %describe(command), "spawning");
    command
        .spawn()
        .map_err(|err| Error::spawn(command.get_program(), err))
}
