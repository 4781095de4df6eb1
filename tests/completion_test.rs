//! Tests for best-effort text completion.

use std::sync::Arc;
use std::time::Duration;

use equation_challengers::{
    CannedCompletion, FallbackCompletion, LlmError, OfflineCompletion, TextCompletion,
};

#[derive(Debug)]
struct SlowCompletion;

#[async_trait::async_trait]
impl TextCompletion for SlowCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

fn wrap(inner: impl TextCompletion + 'static) -> FallbackCompletion {
    FallbackCompletion::new(Arc::new(inner), Duration::from_millis(50))
}

#[tokio::test]
async fn test_reply_is_trimmed() {
    let completion = wrap(CannedCompletion::new("  Try adding the tens first.\n"));
    assert_eq!(
        completion.complete_or("hint", "fallback").await,
        "Try adding the tens first."
    );
}

#[tokio::test]
async fn test_failures_use_fallback() {
    assert_eq!(
        wrap(OfflineCompletion).complete_or("hint", "fallback").await,
        "fallback"
    );
    assert_eq!(
        wrap(CannedCompletion::new("   ")).complete_or("hint", "fallback").await,
        "fallback"
    );
    assert_eq!(
        FallbackCompletion::offline().complete_or("hint", "fallback").await,
        "fallback"
    );
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let completion = wrap(SlowCompletion);
    let started = std::time::Instant::now();
    assert_eq!(completion.complete_or("hint", "fallback").await, "fallback");
    assert!(started.elapsed() < Duration::from_secs(5));
}
