//! External sources behind a narrow, time-bounded query capability.
//!
//! Providers never call tools or the OS directly: they hold an [`ExternalQuery`]
//! and parse its typed output. Tests swap in fakes.

use std::future::Future;
use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0} not installed")]
    Missing(String),
    #[error("{program} exited with {code}")]
    Failed { program: String, code: String },
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("unexpected output: {0}")]
    Parse(String),
    #[error("not running")]
    NotRunning,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl QueryError {
    pub fn parse(msg: impl Into<String>) -> Self {
        QueryError::Parse(msg.into())
    }
}

#[async_trait]
pub trait ExternalQuery: Send + Sync {
    type Output: Send;

    async fn query(&self) -> Result<Self::Output, QueryError>;
}

/// Await `fut` for at most `limit`.
pub async fn bounded<T, F>(limit: Duration, fut: F) -> Result<T, QueryError>
where
    F: Future<Output = Result<T, QueryError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(QueryError::TimedOut(limit)),
    }
}

/// Runs a command and returns its stdout. The child is killed if the wait is abandoned.
#[derive(Debug, Clone)]
pub struct CommandQuery {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandQuery {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    pub async fn run(&self) -> Result<String, QueryError> {
        bounded(self.timeout, async {
            let out = Command::new(&self.program)
                .args(&self.args)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await
                .map_err(|e| match e.kind() {
                    io::ErrorKind::NotFound => QueryError::Missing(self.program.clone()),
                    _ => QueryError::Io(e),
                })?;
            if !out.status.success() {
                return Err(QueryError::Failed {
                    program: self.program.clone(),
                    code: out
                        .status
                        .code()
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "signal".into()),
                });
            }
            Ok(String::from_utf8_lossy(&out.stdout).into_owned())
        })
        .await
    }
}

#[async_trait]
impl ExternalQuery for CommandQuery {
    type Output = String;

    async fn query(&self) -> Result<String, QueryError> {
        self.run().await
    }
}
