use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

// 超出 Instant 表示范围的截止时长按“约 30 年”处理
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// 协作式截止：到达截止时刻或外部令牌被取消即视为到期
///
/// 仅在循环边界处检查，不会打断进行中的网络调用。
#[derive(Debug, Clone)]
pub struct Deadline {
    at: Instant,
    timeout: Duration,
    token: CancellationToken,
}

impl Deadline {
    pub fn after(timeout: Duration, token: &CancellationToken) -> Self {
        let now = Instant::now();
        Self {
            at: now.checked_add(timeout).unwrap_or(now + FAR_FUTURE),
            timeout,
            token: token.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn expired(&self) -> bool {
        self.token.is_cancelled() || Instant::now() >= self.at
    }
}
