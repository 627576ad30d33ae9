use crate::model::statement::{Statement, StatementResult};

use super::table::table::ApplyErrors;

/// Database commands are how we interact with the database thread
///
/// Almost every interaction is a statement (e.g. add, update, remove, alert queries), the remaining
/// commands control the database itself (e.g. shutdown).
#[derive(Debug)]
pub enum DatabaseCommand {
    /// Runs a single statement against the current snapshot of the tables
    Statement(Statement),

    /// Commands that control the database
    Control(Control),
}

impl DatabaseCommand {
    /// Prints complex logs in a more readable format
    pub fn log_format(&self) -> String {
        match self {
            DatabaseCommand::Statement(Statement::Flood(stations)) if stations.len() > 1 => {
                format!("{:#?}", self)
            }
            _ => format!("{:?}", self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Stops the command loop, requests received before the shutdown are still answered
    Shutdown,
}

pub type DatabaseCommandResponse = Result<StatementResult, ApplyErrors>;

pub struct DatabaseCommandRequest {
    pub resolver: oneshot::Sender<DatabaseCommandResponse>,
    pub command: DatabaseCommand,
}
