//! Per-invocation execution metadata.

use std::env;

/// Metadata attached to every invocation.
///
/// Only the request id is guaranteed; the remaining fields mirror the
/// `AWS_LAMBDA_*` environment variables and stay `None` outside a managed
/// environment. The core pipeline never reads them, they exist for handlers
/// and logging.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub aws_request_id: String,
    pub function_name: Option<String>,
    pub invoked_function_arn: Option<String>,
    pub log_group_name: Option<String>,
    pub log_stream_name: Option<String>,
    pub memory_limit_in_mb: Option<String>,
}

impl ExecutionContext {
    pub fn from_env(aws_request_id: impl Into<String>) -> Self {
        Self {
            aws_request_id: aws_request_id.into(),
            function_name: env::var("AWS_LAMBDA_FUNCTION_NAME").ok(),
            invoked_function_arn: env::var("AWS_LAMBDA_FUNCTION_ARN").ok(),
            log_group_name: env::var("AWS_LAMBDA_LOG_GROUP_NAME").ok(),
            log_stream_name: env::var("AWS_LAMBDA_LOG_STREAM_NAME").ok(),
            memory_limit_in_mb: env::var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE").ok(),
        }
    }
}
