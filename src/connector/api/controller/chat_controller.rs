use std::io::{BufRead, Write};

use tracing::debug;

use crate::{ChatSessionUseCase, DomainError, UserInput, UserMessages};

use super::super::Container;

/// Whether the loop keeps reading after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Line-oriented read/eval/print loop over one chat session.
///
/// Replies go to `out`; failed turns are reported on `err` and the loop keeps
/// going. Lines that are not valid UTF-8 are decoded lossily. End of input
/// behaves like `exit`.
pub struct ChatController {
    session: ChatSessionUseCase,
    messages: UserMessages,
}

impl ChatController {
    pub fn new(container: &Container) -> Self {
        Self {
            session: container.chat_session_use_case(),
            messages: container.messages().clone(),
        }
    }

    pub fn session(&self) -> &ChatSessionUseCase {
        &self.session
    }

    pub async fn run<R, W, E>(
        &mut self,
        mut input: R,
        out: &mut W,
        err: &mut E,
    ) -> Result<(), DomainError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        writeln!(out, "{}", self.messages.greeting)?;

        let mut buf = Vec::new();
        loop {
            writeln!(out, "{}", self.messages.prompt)?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                debug!("End of input reached");
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            if self.handle_line(&line, out, err).await? == LoopControl::Exit {
                break;
            }
        }

        writeln!(out, "{}", self.messages.exit)?;
        out.flush()?;
        Ok(())
    }

    /// Process one raw input line. Only I/O failures on `out`/`err` are returned.
    pub async fn handle_line<W, E>(
        &mut self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> Result<LoopControl, DomainError>
    where
        W: Write,
        E: Write,
    {
        match UserInput::parse(line) {
            UserInput::Empty => {
                writeln!(out, "{}", self.messages.empty_input)?;
                Ok(LoopControl::Continue)
            }
            UserInput::Exit => Ok(LoopControl::Exit),
            UserInput::Query(query) => {
                match self.session.execute(&query).await {
                    Ok(reply) => {
                        writeln!(out, "{}", reply)?;
                        writeln!(out)?;
                    }
                    Err(e) => {
                        writeln!(err, "Error: {}", e)?;
                        err.flush()?;
                    }
                }
                Ok(LoopControl::Continue)
            }
        }
    }
}
