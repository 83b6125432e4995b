use crate::context::AppContext;
use crate::dto::ReadMessagesResponse;
use crate::error::AppError;
use crate::query::Query;
use crate::query_handler::QueryHandler;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use relay_domain::broker::PartitionedLogClient;
use relay_domain::message::EventGridMessage;
use relay_domain::reading::{PartitionReader, ReadWindow};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

/// 按入队时间读取消息
#[derive(Debug, Clone)]
pub struct ReadMessagesByTime {
    pub window: ReadWindow,
}

impl Query for ReadMessagesByTime {
    const NAME: &'static str = "ReadMessagesByTime";

    type Dto = ReadMessagesResponse;
}

/// 按入队时间读取经分区日志转存的 Event Grid 事件
#[derive(Debug, Clone)]
pub struct ReadEventGridMessagesByTime {
    pub window: ReadWindow,
}

impl Query for ReadEventGridMessagesByTime {
    const NAME: &'static str = "ReadEventGridMessagesByTime";

    type Dto = ReadMessagesResponse<EventGridMessage>;
}

/// 查询参数（字段名与外部接口一致）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadQueryParams {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub max_messages: Option<usize>,
    pub partition_id: Option<String>,
}

impl ReadQueryParams {
    pub fn into_query(self) -> Result<ReadMessagesByTime, AppError> {
        Ok(ReadMessagesByTime {
            window: self.into_window()?,
        })
    }

    pub fn into_event_grid_query(self) -> Result<ReadEventGridMessagesByTime, AppError> {
        Ok(ReadEventGridMessagesByTime {
            window: self.into_window()?,
        })
    }

    fn into_window(self) -> Result<ReadWindow, AppError> {
        let start_time = self
            .start_time
            .as_deref()
            .ok_or_else(|| AppError::Validation("startTime is required".to_string()))
            .and_then(|s| parse_timestamp("startTime", s))?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|s| parse_timestamp("endTime", s))
            .transpose()?;

        Ok(ReadWindow::builder()
            .start_time(start_time)
            .maybe_end_time(end_time)
            .maybe_max_results(self.max_messages)
            .maybe_partition_id(self.partition_id)
            .build())
    }
}

/// 解析 ISO-8601 时间；不带时区偏移的按 UTC 处理
fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::Validation(format!("{field} is not a valid ISO-8601 timestamp: {e}")))
}

pub struct ReadMessagesByTimeHandler<L> {
    reader: PartitionReader<L>,
}

impl<L> ReadMessagesByTimeHandler<L>
where
    L: PartitionedLogClient + 'static,
{
    pub fn new(reader: PartitionReader<L>) -> Self {
        Self { reader }
    }

    async fn read<T>(
        &self,
        query: &'static str,
        ctx: &AppContext,
        window: &ReadWindow,
    ) -> Result<ReadMessagesResponse<T>, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let outcome = match self
            .reader
            .read_by_time_as::<T>(window, &ctx.cancellation)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(
                    query,
                            error = %err,
                    "Error retrieving messages by enqueue time"
                );
                return Err(err.into());
            }
        };

        match outcome.message() {
            Some(message) => info!(query, "{message}"),
            None => info!(
                query,
                count = outcome.records.len(),
                "Retrieved messages based on enqueue time criteria"
            ),
        }
        Ok(outcome.into())
    }
}

#[async_trait]
impl<L> QueryHandler<ReadMessagesByTime> for ReadMessagesByTimeHandler<L>
where
    L: PartitionedLogClient + 'static,
{
    async fn handle(
        &self,
        ctx: &AppContext,
        q: ReadMessagesByTime,
    ) -> Result<ReadMessagesResponse, AppError> {
        self.read(ReadMessagesByTime::NAME, ctx, &q.window).await
    }
}

#[async_trait]
impl<L> QueryHandler<ReadEventGridMessagesByTime> for ReadMessagesByTimeHandler<L>
where
    L: PartitionedLogClient + 'static,
{
    async fn handle(
        &self,
        ctx: &AppContext,
        q: ReadEventGridMessagesByTime,
    ) -> Result<ReadMessagesResponse<EventGridMessage>, AppError> {
        self.read(ReadEventGridMessagesByTime::NAME, ctx, &q.window).await
    }
}
