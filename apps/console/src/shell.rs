//! Interactive line-oriented front end over an [`AppContext`].
//!
//! Each input line is one command. After every command any open notice on
//! the error signal is printed and closed, the way a dialog would be shown
//! and dismissed.

use crate::commands::{self, ConsoleCommand, HELP_TEXT};
use crate::error::ConsoleError;

use session_core::AppContext;
use session_core::login::{LoginFlowController, LoginStepKind};
use session_core::navigation::Route;

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(Option<String>),
    Quit,
}

pub struct Shell {
    ctx: AppContext,
    login: LoginFlowController,
}

impl Shell {
    pub fn new(ctx: AppContext) -> Self {
        let login = ctx.login_flow();
        Self { ctx, login }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn login(&self) -> &LoginFlowController {
        &self.login
    }

    /// Prompt reflecting the login step or the current screen.
    pub fn prompt(&self) -> String {
        match (self.ctx.router.current(), self.login.step_kind()) {
            (Route::Login, LoginStepKind::AwaitingPin) => "login:pin> ".to_string(),
            (Route::Login, LoginStepKind::AwaitingPassword) => "login:password> ".to_string(),
            (route, _) => format!("{} {}> ", self.ctx.session.user_initials(), route),
        }
    }

    pub async fn execute(&self, command: ConsoleCommand) -> Result<Flow, ConsoleError> {
        debug!("Executing {:?}", redacted(&command));

        let reply = match command {
            ConsoleCommand::Pin(pin) => commands::login::submit_pin(&self.login, &pin).await,
            ConsoleCommand::Password(password) => {
                commands::login::submit_password(&self.login, &password).await
            }
            ConsoleCommand::Back => Some(commands::login::go_back(&self.login)),
            ConsoleCommand::Reset => Some(commands::login::reset(&self.login)),
            ConsoleCommand::Open(path) => Some(commands::navigation::open(&self.ctx, &path).await),
            ConsoleCommand::Get(path) => commands::navigation::get(&self.ctx, &path).await?,
            ConsoleCommand::WhoAmI => Some(commands::session::whoami(&self.ctx)),
            ConsoleCommand::Status => Some(commands::session::status(&self.ctx, &self.login)),
            ConsoleCommand::SetOnline(online) => {
                Some(commands::session::set_online(&self.ctx, online))
            }
            ConsoleCommand::Logout => Some(commands::session::logout(&self.ctx, &self.login).await?),
            ConsoleCommand::Help => Some(HELP_TEXT.to_string()),
            ConsoleCommand::Quit => return Ok(Flow::Quit),
            ConsoleCommand::Empty => None,
        };

        Ok(Flow::Continue(reply))
    }

    /// Print and dismiss the current error notice, if one is open.
    pub fn take_notice(&self) -> Option<String> {
        if !self.ctx.errors.is_open() {
            return None;
        }

        let notice = self.ctx.errors.current();
        self.ctx.errors.close();
        Some(format!("{}: {}", notice.title, notice.message))
    }

    /// Read commands from `input` until it ends or `quit` is entered.
    pub async fn run<R, W>(&self, input: R, output: &mut W) -> Result<(), ConsoleError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        write_text(output, &format!("{}\n", self.ctx.environment.app_name)).await?;

        loop {
            write_text(output, &self.prompt()).await?;

            let line = match lines.next_line().await.map_err(io_error)? {
                Some(line) => line,
                None => break,
            };

            let flow = match ConsoleCommand::parse(&line) {
                Ok(command) => self.execute(command).await,
                Err(e) => Err(e),
            };

            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue(Some(reply))) => {
                    write_text(output, &format!("{reply}\n")).await?;
                }
                Ok(Flow::Continue(None)) => {}
                Err(ConsoleError::Usage { message, .. }) => {
                    write_text(output, &format!("{message}\n")).await?;
                }
                Err(e) => {
                    write_text(output, &format!("{e}\n")).await?;
                }
            }

            if let Some(notice) = self.take_notice() {
                write_text(output, &format!("{notice}\n")).await?;
            }
        }

        info!("Console session ended");
        Ok(())
    }
}

/// Debug view of a command with secrets masked.
fn redacted(command: &ConsoleCommand) -> ConsoleCommand {
    match command {
        ConsoleCommand::Pin(_) => ConsoleCommand::Pin("****".to_string()),
        ConsoleCommand::Password(_) => ConsoleCommand::Password("****".to_string()),
        other => other.clone(),
    }
}

async fn write_text<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), ConsoleError> {
    output.write_all(text.as_bytes()).await.map_err(io_error)?;
    output.flush().await.map_err(io_error)
}

#[track_caller]
fn io_error(e: std::io::Error) -> ConsoleError {
    ConsoleError::Console {
        message: format!("Terminal I/O failed: {e}"),
        location: ErrorLocation::from(Location::caller()),
    }
}
