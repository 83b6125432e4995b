use relay_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("infra: {0}")]
    Infra(String),
}

impl AppError {
    /// 是否为调用方输入问题（未发生任何 I/O）
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::Domain(e) => e.is_client_error(),
            AppError::Validation(_) => true,
            AppError::Infra(_) => false,
        }
    }

    /// 对外映射的 HTTP 状态码：客户端错误 400，其余 500
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(AppError::Validation("empty".into()).status_code(), 400);
        assert_eq!(
            AppError::from(DomainError::validation("future start")).status_code(),
            400
        );
        assert_eq!(
            AppError::from(DomainError::OversizedMessage { index: 1, sent: 1 }).status_code(),
            500
        );
        assert_eq!(
            AppError::from(DomainError::transport("down")).status_code(),
            500
        );
        assert_eq!(AppError::Infra("logger".into()).status_code(), 500);
    }
}
