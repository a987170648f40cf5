//! [`Store`] backed by a Cassandra-compatible cluster.
//!
//! Expects the benchmark keyspace to hold:
//!
//! ```cql
//! CREATE TABLE "SerieId" ("SerieId" uuid PRIMARY KEY);
//! CREATE TABLE "Timeserie" (
//!     "SerieId" uuid,
//!     "Day" timestamp,
//!     "UtcDate" timestamp,
//!     "Value" double,
//!     PRIMARY KEY (("SerieId", "Day"), "UtcDate")
//! );
//! ```

use crate::bench::config::ConnectionConfig;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{TryStreamExt, future};
use scylla::client::execution_profile::ExecutionProfile;
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use scylla::policies::load_balancing::DefaultPolicy;
use scylla::statement::Consistency;
use scylla::statement::prepared::PreparedStatement;
use scylla::value::CqlTimestamp;
use seriesbench::{PointRow, SeriesId, Store, StoreError, Table};
use uuid::Uuid;

const INSERT_SERIES: &str = r#"INSERT INTO "SerieId" ("SerieId") VALUES (?)"#;
const INSERT_POINT: &str = concat!(
    r#"INSERT INTO "Timeserie" ("SerieId", "Day", "UtcDate", "Value") "#,
    "VALUES (?, ?, ?, ?) USING TTL ?"
);
const SELECT_SERIES: &str = r#"SELECT "SerieId" FROM "SerieId""#;
const SELECT_DAY: &str = concat!(
    r#"SELECT "UtcDate", "Value" FROM "Timeserie" "#,
    r#"WHERE "SerieId" = ? AND "Day" = ? LIMIT 86400"#
);

pub struct ScyllaStore {
    session: Session,
    insert_series: PreparedStatement,
    insert_point: PreparedStatement,
    select_day: PreparedStatement,
}

impl ScyllaStore {
    /// Opens a session on the benchmark keyspace and prepares every
    /// statement. Requests run at `LOCAL_ONE` through a token-aware policy.
    pub async fn connect(config: &ConnectionConfig) -> anyhow::Result<Self> {
        let mut policy = DefaultPolicy::builder().token_aware(true);
        if let Some(datacenter) = &config.datacenter {
            policy = policy.prefer_datacenter(datacenter.clone());
        }

        let profile = ExecutionProfile::builder()
            .load_balancing_policy(policy.build())
            .consistency(Consistency::LocalOne)
            .request_timeout(Some(config.request_timeout))
            .build();

        let session = SessionBuilder::new()
            .known_nodes(&config.contact_points)
            .default_execution_profile_handle(profile.into_handle())
            .use_keyspace(&config.keyspace, true)
            .build()
            .await
            .with_context(|| format!("failed to connect to {:?}", config.contact_points))?;

        tracing::info!(
            "Connected to {:?}, keyspace {}",
            config.contact_points,
            config.keyspace
        );

        let insert_series = session
            .prepare(INSERT_SERIES)
            .await
            .context("failed to prepare series insert")?;
        let insert_point = session
            .prepare(INSERT_POINT)
            .await
            .context("failed to prepare point insert")?;
        let mut select_day = session
            .prepare(SELECT_DAY)
            .await
            .context("failed to prepare day select")?;
        select_day.set_page_size(config.page_size);

        Ok(Self {
            session,
            insert_series,
            insert_point,
            select_day,
        })
    }
}

fn timestamp(ts: DateTime<Utc>) -> CqlTimestamp {
    CqlTimestamp(ts.timestamp_millis())
}

/// TTL binds as a CQL `int`.
fn ttl(secs: u32) -> i32 {
    i32::try_from(secs).unwrap_or(i32::MAX)
}

#[async_trait]
impl Store for ScyllaStore {
    async fn truncate(&self, table: Table) -> Result<(), StoreError> {
        self.session
            .query_unpaged(format!("TRUNCATE {table}"), ())
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn register_series(&self, id: SeriesId) -> Result<(), StoreError> {
        self.session
            .execute_unpaged(&self.insert_series, (id.as_uuid(),))
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn write_point(&self, row: &PointRow) -> Result<(), StoreError> {
        let values = (
            row.series_id.as_uuid(),
            timestamp(row.day),
            timestamp(row.timestamp),
            row.value,
            ttl(row.ttl_secs),
        );
        self.session
            .execute_unpaged(&self.insert_point, values)
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        let rows = self
            .session
            .query_iter(SELECT_SERIES, ())
            .await
            .map_err(StoreError::backend)?
            .rows_stream::<(Uuid,)>()
            .map_err(StoreError::backend)?;

        rows.map_ok(|(id,)| SeriesId::from(id))
            .try_collect()
            .await
            .map_err(StoreError::backend)
    }

    async fn read_day(&self, id: SeriesId, day: DateTime<Utc>) -> Result<u64, StoreError> {
        let rows = self
            .session
            .execute_iter(self.select_day.clone(), (id.as_uuid(), timestamp(day)))
            .await
            .map_err(StoreError::backend)?
            .rows_stream::<(CqlTimestamp, f64)>()
            .map_err(StoreError::backend)?;

        rows.try_fold(0_u64, |count, _| future::ready(Ok(count + 1)))
            .await
            .map_err(StoreError::backend)
    }
}
