//! Watches one containerized service through the container runtime's `ps` listing.

use std::time::Duration;

use async_trait::async_trait;

use crate::providers::{degrade, MetricProvider};
use crate::query::{CommandQuery, ExternalQuery, QueryError};
use crate::types::{ContainerRule, Fields, MetricReading, ProviderId, ProviderKind, Value};

pub const ID: &str = "id";
pub const STATUS: &str = "status";

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSample {
    pub id: String,
    pub status: String,
}

/// First running container of an image, from one `ps` listing.
pub struct ContainerQuery<Q = CommandQuery> {
    listing: Q,
}

impl ContainerQuery<CommandQuery> {
    pub fn cli(runtime: &str, image: &str, timeout: Duration) -> Self {
        Self::new(CommandQuery::new(
            runtime,
            [
                "ps".to_string(),
                "--filter".into(),
                format!("ancestor={image}"),
                "--filter".into(),
                "status=running".into(),
                "--format".into(),
                "{{.ID}}\t{{.Status}}".into(),
            ],
            timeout,
        ))
    }
}

impl<Q> ContainerQuery<Q>
where
    Q: ExternalQuery<Output = String>,
{
    pub fn new(listing: Q) -> Self {
        Self { listing }
    }
}

#[async_trait]
impl<Q> ExternalQuery for ContainerQuery<Q>
where
    Q: ExternalQuery<Output = String>,
{
    type Output = ContainerSample;

    async fn query(&self) -> Result<ContainerSample, QueryError> {
        let (id, status) = parse_ps(&self.listing.query().await?)?;
        Ok(ContainerSample { id, status })
    }
}

/// First `ID<TAB>Status` row; no rows means nothing is running.
pub fn parse_ps(out: &str) -> Result<(String, String), QueryError> {
    let line = out
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(QueryError::NotRunning)?;
    let (id, status) = line.split_once('\t').unwrap_or((line, ""));
    let id = id.trim();
    if id.is_empty() {
        return Err(QueryError::parse(format!("container row: {line:?}")));
    }
    Ok((id.to_string(), status.trim().to_string()))
}

pub struct ContainerWatcher<Q = ContainerQuery> {
    id: ProviderId,
    rule: ContainerRule,
    query: Q,
}

impl ContainerWatcher<ContainerQuery> {
    pub fn cli(rule: ContainerRule, timeout: Duration) -> Self {
        let query = ContainerQuery::cli(&rule.runtime, &rule.image, timeout);
        Self::new(rule, query)
    }
}

impl<Q> ContainerWatcher<Q>
where
    Q: ExternalQuery<Output = ContainerSample>,
{
    pub fn new(rule: ContainerRule, query: Q) -> Self {
        Self {
            id: ProviderId::new(rule.label.clone()),
            rule,
            query,
        }
    }
}

#[async_trait]
impl<Q> MetricProvider for ContainerWatcher<Q>
where
    Q: ExternalQuery<Output = ContainerSample>,
{
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Container {
            color: self.rule.color,
        }
    }

    async fn poll(&self) -> MetricReading {
        match self.query.query().await {
            Ok(s) => MetricReading::Available(
                Fields::new()
                    .with(ID, Value::Label(s.id))
                    .with(STATUS, Value::Label(s.status)),
            ),
            Err(QueryError::NotRunning) => {
                MetricReading::unavailable(crate::providers::process::NOT_RUNNING)
            }
            Err(e) => degrade(&self.id, e),
        }
    }
}
