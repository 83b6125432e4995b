use crate::{context::AppContext, error::AppError, query::Query};
use async_trait::async_trait;
use tracing::{Instrument, info_span};

/// 查询处理器
///
/// 处理器直接持有领域读取器；`dispatch` 为入口，在携带查询名与关联 ID 的 span 中调用 `handle`。
#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &AppContext, query: Q) -> Result<Q::Dto, AppError>;

    async fn dispatch(&self, ctx: &AppContext, query: Q) -> Result<Q::Dto, AppError> {
        let span = info_span!(
            "query",
            query = Q::NAME,
            correlation_id = ctx.correlation_id.as_deref().unwrap_or("-")
        );
        self.handle(ctx, query).instrument(span).await
    }
}
