//! Function invocation middleware
//!
//! Middleware wraps every tool call as an ordered chain. Each link receives
//! the invocation context and a [`Next`] handle, and must run `next` exactly
//! once and return what it produced. `Next` is consumed when run, so a link
//! cannot forward twice; the pipeline rejects a chain that never forwarded.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::agent::tool::{Tool, ToolDefinition};
use crate::error::ToolError;

/// State of one tool invocation as it passes through the chain
#[derive(Debug)]
pub struct FunctionInvocationContext {
    /// The tool being called
    pub function: ToolDefinition,

    pub arguments: Value,

    /// Filled in once the tool has run
    pub result: Option<Result<String, ToolError>>,
}

impl FunctionInvocationContext {
    pub fn new(function: ToolDefinition, arguments: Value) -> Self {
        Self {
            function,
            arguments,
            result: None,
        }
    }
}

/// A link in the invocation chain
#[async_trait]
pub trait FunctionMiddleware: Send + Sync {
    async fn process(
        &self,
        context: FunctionInvocationContext,
        next: Next<'_>,
    ) -> FunctionInvocationContext;
}

/// The rest of the chain, ending in the tool itself
pub struct Next<'a> {
    remaining: &'a [Arc<dyn FunctionMiddleware>],
    tool: &'a dyn Tool,
}

impl<'a> Next<'a> {
    /// Run the rest of the chain
    pub async fn run(self, mut context: FunctionInvocationContext) -> FunctionInvocationContext {
        match self.remaining.split_first() {
            Some((middleware, remaining)) => {
                let next = Next {
                    remaining,
                    tool: self.tool,
                };
                middleware.process(context, next).await
            }
            None => {
                let outcome = self.tool.invoke(context.arguments.clone()).await;
                context.result = Some(outcome);
                context
            }
        }
    }
}

/// Ordered middleware around tool invocation
#[derive(Default, Clone)]
pub struct MiddlewarePipeline {
    middleware: Vec<Arc<dyn FunctionMiddleware>>,
}

impl MiddlewarePipeline {
    pub fn new(middleware: Vec<Arc<dyn FunctionMiddleware>>) -> Self {
        Self { middleware }
    }

    /// Invoke `tool` through every middleware, first registered outermost
    pub async fn invoke(&self, tool: &dyn Tool, arguments: Value) -> Result<String, ToolError> {
        let function = tool.definition();
        let name = function.name.clone();

        let next = Next {
            remaining: &self.middleware,
            tool,
        };
        let context = next
            .run(FunctionInvocationContext::new(function, arguments))
            .await;

        context
            .result
            .unwrap_or(Err(ToolError::NotForwarded { function: name }))
    }
}

/// Logs each tool call and its raw result
pub struct LoggingMiddleware;

#[async_trait]
impl FunctionMiddleware for LoggingMiddleware {
    async fn process(
        &self,
        context: FunctionInvocationContext,
        next: Next<'_>,
    ) -> FunctionInvocationContext {
        tracing::info!("Calling function: {}", context.function.name);
        let context = next.run(context).await;
        match &context.result {
            Some(Ok(result)) => tracing::info!("Function result: {}", result),
            Some(Err(e)) => tracing::warn!("Function error: {}", e),
            None => {}
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl Tool for Counting {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "counting".to_string(),
                description: "counts calls".to_string(),
                input_schema: json!({"type": "object"}),
            }
        }

        async fn invoke(&self, arguments: Value) -> Result<String, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ToolError::InvalidArguments {
                    tool: "counting".to_string(),
                    message: "boom".to_string(),
                })
            } else {
                Ok(format!("got {}", arguments))
            }
        }
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl FunctionMiddleware for Recorder {
        async fn process(
            &self,
            context: FunctionInvocationContext,
            next: Next<'_>,
        ) -> FunctionInvocationContext {
            self.log.lock().unwrap().push(format!("{} before", self.label));
            let context = next.run(context).await;
            self.log.lock().unwrap().push(format!("{} after", self.label));
            context
        }
    }

    struct Swallow;

    #[async_trait]
    impl FunctionMiddleware for Swallow {
        async fn process(
            &self,
            context: FunctionInvocationContext,
            _next: Next<'_>,
        ) -> FunctionInvocationContext {
            context
        }
    }

    #[tokio::test]
    async fn test_no_middleware_calls_tool() {
        let tool = Counting::new(false);
        let result = MiddlewarePipeline::default()
            .invoke(&tool, json!({"x": 1}))
            .await;
        assert_eq!(result.unwrap(), r#"got {"x":1}"#);
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chain_order_and_single_forward() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = MiddlewarePipeline::new(vec![
            Arc::new(Recorder {
                label: "outer",
                log: log.clone(),
            }),
            Arc::new(LoggingMiddleware),
            Arc::new(Recorder {
                label: "inner",
                log: log.clone(),
            }),
        ]);

        let tool = Counting::new(false);
        let result = pipeline.invoke(&tool, json!({})).await;

        assert!(result.is_ok());
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer before", "inner before", "inner after", "outer after"]
        );
    }

    #[tokio::test]
    async fn test_errors_propagate_unchanged() {
        let pipeline = MiddlewarePipeline::new(vec![Arc::new(LoggingMiddleware)]);
        let tool = Counting::new(true);

        let err = pipeline.invoke(&tool, json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { ref message, .. } if message == "boom"));
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_swallowing_middleware_is_rejected() {
        let pipeline = MiddlewarePipeline::new(vec![Arc::new(Swallow)]);
        let tool = Counting::new(false);

        let err = pipeline.invoke(&tool, json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotForwarded { ref function } if function == "counting"));
        assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
    }
}
