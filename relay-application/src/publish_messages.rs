use crate::command::Command;
use crate::command_handler::CommandHandler;
use crate::context::AppContext;
use crate::dto::PublishResponse;
use crate::error::AppError;
use async_trait::async_trait;
use relay_domain::broker::BrokerClient;
use relay_domain::message::PublishRequest;
use relay_domain::publishing::BatchPublisher;
use tracing::{error, info};

/// 批量发布命令
#[derive(Debug, Clone)]
pub struct PublishMessages {
    pub request: PublishRequest,
}

impl Command for PublishMessages {
    const NAME: &'static str = "PublishMessages";

    type Output = PublishResponse;
}

impl PublishMessages {
    /// 从请求体 JSON 解析；空请求体或格式错误均为校验错误
    pub fn from_json(body: &str) -> Result<Self, AppError> {
        if body.trim().is_empty() {
            return Err(AppError::Validation(
                "Message body cannot be empty".to_string(),
            ));
        }
        let request: PublishRequest = serde_json::from_str(body)
            .map_err(|e| AppError::Validation(format!("invalid message format: {e}")))?;
        Ok(Self { request })
    }
}

pub struct PublishMessagesHandler<B> {
    publisher: BatchPublisher<B>,
}

impl<B> PublishMessagesHandler<B>
where
    B: BrokerClient,
{
    pub fn new(publisher: BatchPublisher<B>) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl<B> CommandHandler<PublishMessages> for PublishMessagesHandler<B>
where
    B: BrokerClient + 'static,
{
    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: PublishMessages,
    ) -> Result<PublishResponse, AppError> {
        info!(
            command = PublishMessages::NAME,
            count = cmd.request.count(),
            "Publishing messages"
        );

        match self.publisher.publish(&cmd.request, &ctx.cancellation).await {
            Ok(outcome) => Ok(outcome.into()),
            Err(err) => {
                error!(
                    command = PublishMessages::NAME,
                            error = %err,
                    "Error publishing messages"
                );
                Err(err.into())
            }
        }
    }
}
