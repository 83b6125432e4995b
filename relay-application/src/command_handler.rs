use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;
use tracing::{Instrument, info_span};

/// 命令处理器：返回 `C::Output` 执行摘要
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>;

    /// 在携带命令名与关联 ID 的 span 中执行 `handle`
    async fn dispatch(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError> {
        let span = info_span!(
            "command",
            command = C::NAME,
            correlation_id = ctx.correlation_id.as_deref().unwrap_or("-")
        );
        self.handle(ctx, cmd).instrument(span).await
    }
}
