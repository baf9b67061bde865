//! # aggregator 模块
//!
//! 并发抓取 N 条代理并汇总结果。
//!
//! - 每条代理对应一个独立的 tokio 任务，不设并发上限（N 由调用方控制）；
//! - 每个任务通过同一个容量为 N 的通道回传一对（代理，错误）；
//! - 按到达顺序收集结果，失败不会中断整批流程；
//! - 所有失败信息最终合并为一条多行错误，仅用于展示。

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::error::{AggregateError, FetchError};
use crate::fetcher::{FetchOutcome, ProxySource};
use crate::model::ProxySettings;

/// 一批抓取的汇总结果。
pub struct ProxyList {
    /// 有效代理（`curl` 非空）的数量
    pub success: usize,
    pub countries: Vec<String>,
    /// 与 `entries` 一一对应，成功的槽位为 `None`
    pub failure: Vec<Option<FetchError>>,
    /// 全部结果，包括失败占位，渲染时再过滤
    pub entries: Vec<ProxySettings>,
    source: Arc<dyn ProxySource>,
}

impl ProxyList {
    pub fn new(source: Arc<dyn ProxySource>, countries: Vec<String>) -> Self {
        Self {
            success: 0,
            countries,
            failure: Vec::new(),
            entries: Vec::new(),
            source,
        }
    }

    /// 并发抓取 `n` 条代理。
    ///
    /// 总会等待全部 `n` 个槽位完成后才返回。只要有任意槽位失败就返回
    /// [`AggregateError`]，但已拿到的代理不受影响，是否有可用数据应看
    /// [`ProxyList::success`]。
    pub async fn execute(&mut self, n: usize) -> Result<(), AggregateError> {
        if n == 0 {
            return Ok(());
        }

        info!("🚀 开始抓取代理，共 {} 条", n);
        let start = Instant::now();
        let (tx, mut rx) = mpsc::channel::<FetchOutcome>(channel_capacity(n));

        for i in 0..n {
            let tx = tx.clone();
            let source = Arc::clone(&self.source);
            tokio::spawn(async move {
                let outcome = source.fetch().await;
                debug!("[#{}] 抓取结束", i + 1);
                // 接收端只会在收满 n 条后丢弃，这里发送失败可忽略
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let mut received = 0;
        let batch_start = self.failure.len();
        while received < n {
            let outcome = match rx.recv().await {
                Some(outcome) => outcome,
                // 所有发送端都已释放仍不足 n 条，说明有任务异常退出
                None => FetchOutcome::failure(FetchError::TaskAborted),
            };
            received += 1;
            self.accumulate(outcome);
        }

        let failed = self.failure[batch_start..]
            .iter()
            .filter(|e| e.is_some())
            .count();
        info!(
            "✅ 抓取完成：总计 {} 条，成功 {} 条，失败 {} 条，耗时 {}ms",
            n,
            n - failed,
            failed,
            start.elapsed().as_millis()
        );

        match join_failures(&self.failure) {
            Some(msg) => Err(AggregateError(msg)),
            None => Ok(()),
        }
    }

    fn accumulate(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { proxy, error } = outcome;
        match &error {
            Some(e) => warn!("🔴 抓取失败：{}", e),
            None => debug!("🟢 {} {}", proxy.country, proxy.curl),
        }
        if !proxy.is_sentinel() {
            self.success += 1;
        }
        self.failure.push(error);
        self.entries.push(proxy);
    }

    /// 国家代码是否在允许列表中（精确匹配，区分大小写）。
    pub fn check_country(&self, country: &str) -> bool {
        self.countries.iter().any(|c| c == country)
    }
}

/// tokio 通道容量不能超过 `Semaphore::MAX_PERMITS`，超出时截断。
fn channel_capacity(n: usize) -> usize {
    n.min(Semaphore::MAX_PERMITS)
}

/// 把所有非空错误拼成 `• 错误\n` 形式的多行文本，全部为空时返回 `None`。
fn join_failures(failures: &[Option<FetchError>]) -> Option<String> {
    let msg: String = failures
        .iter()
        .flatten()
        .map(|e| format!("\u{2022} {}\n", e))
        .collect();

    if msg.is_empty() { None } else { Some(msg) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn proxy(curl: &str, country: &str) -> ProxySettings {
        ProxySettings {
            curl: curl.to_string(),
            country: country.to_string(),
            ..Default::default()
        }
    }

    /// 按调用次序循环返回预设结果的数据源。
    struct Scripted {
        calls: AtomicUsize,
        script: Vec<Option<&'static str>>,
    }

    impl Scripted {
        fn new(script: Vec<Option<&'static str>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script,
            })
        }
    }

    #[async_trait]
    impl ProxySource for Scripted {
        async fn fetch(&self) -> FetchOutcome {
            let i = self.calls.fetch_add(1, Ordering::SeqCst);
            // 让完成顺序与发起顺序不同
            let delay = (self.script.len() - i % self.script.len()) as u64;
            tokio::time::sleep(Duration::from_millis(delay * 5)).await;
            match self.script[i % self.script.len()] {
                Some(curl) => FetchOutcome::success(proxy(curl, "US")),
                None => FetchOutcome::failure(FetchError::RateLimited(format!("slot {}", i))),
            }
        }
    }

    /// 所有调用都到齐后才返回，只有并发执行时才能完成。
    struct Gathered {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl ProxySource for Gathered {
        async fn fetch(&self) -> FetchOutcome {
            self.barrier.wait().await;
            FetchOutcome::success(proxy("http://10.0.0.1:80", "US"))
        }
    }

    struct Panicking;

    #[async_trait]
    impl ProxySource for Panicking {
        async fn fetch(&self) -> FetchOutcome {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn test_execute_zero() {
        let mut list = ProxyList::new(Scripted::new(vec![Some("a")]), vec![]);
        assert!(list.execute(0).await.is_ok());
        assert_eq!(list.success, 0);
        assert!(list.entries.is_empty());
        assert!(list.failure.is_empty());
    }

    #[tokio::test]
    async fn test_execute_all_success() {
        let source = Scripted::new(vec![Some("http://1.1.1.1:80")]);
        let mut list = ProxyList::new(source.clone(), vec!["US".to_string()]);

        assert!(list.execute(6).await.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 6);
        assert_eq!(list.success, 6);
        assert_eq!(list.entries.len(), 6);
        assert_eq!(list.failure.len(), 6);
        assert!(list.failure.iter().all(|e| e.is_none()));
    }

    #[tokio::test]
    async fn test_execute_all_fail() {
        let mut list = ProxyList::new(Scripted::new(vec![None]), vec![]);

        let err = list.execute(4).await.unwrap_err();
        assert_eq!(list.success, 0);
        assert_eq!(list.entries.len(), 4);
        assert!(list.entries.iter().all(|p| p.is_sentinel()));
        assert_eq!(err.0.lines().count(), 4);
        assert!(err.0.lines().all(|l| l.starts_with("\u{2022} slot ")));
        assert!(err.0.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_execute_partial() {
        let source = Scripted::new(vec![Some("http://a:1"), None, Some("http://b:2")]);
        let mut list = ProxyList::new(source, vec![]);

        let err = list.execute(6).await.unwrap_err();
        assert_eq!(list.entries.len(), 6);
        assert_eq!(list.failure.len(), 6);
        assert_eq!(list.success, 4);
        assert_eq!(
            list.success,
            list.entries.iter().filter(|p| !p.is_sentinel()).count()
        );
        assert_eq!(err.0.lines().count(), 2);

        // 同一槽位的代理与错误必须成对出现
        for (p, e) in list.entries.iter().zip(&list.failure) {
            assert_eq!(p.is_sentinel(), e.is_some());
        }
    }

    #[tokio::test]
    async fn test_execute_accumulates_across_calls() {
        let mut list = ProxyList::new(Scripted::new(vec![Some("http://a:1")]), vec![]);
        list.execute(2).await.unwrap();
        list.execute(3).await.unwrap();
        assert_eq!(list.entries.len(), 5);
        assert_eq!(list.success, 5);
    }

    #[tokio::test]
    async fn test_execute_survives_panicking_task() {
        let mut list = ProxyList::new(Arc::new(Panicking), vec![]);

        let err = list.execute(3).await.unwrap_err();
        assert_eq!(list.entries.len(), 3);
        assert_eq!(list.success, 0);
        assert!(
            list.failure
                .iter()
                .all(|e| matches!(e, Some(FetchError::TaskAborted)))
        );
        assert_eq!(err.0.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_execute_runs_fetches_concurrently() {
        let n = 8;
        let source = Arc::new(Gathered {
            barrier: tokio::sync::Barrier::new(n),
        });
        let mut list = ProxyList::new(source, vec![]);

        let result = tokio::time::timeout(Duration::from_secs(5), list.execute(n))
            .await
            .expect("fetches did not run concurrently");
        assert!(result.is_ok());
        assert_eq!(list.success, n);
        assert_eq!(list.entries.len(), n);
    }

    #[test]
    fn test_channel_capacity() {
        assert_eq!(channel_capacity(1), 1);
        assert_eq!(channel_capacity(10), 10);
        assert_eq!(channel_capacity(usize::MAX >> 2), Semaphore::MAX_PERMITS);
        assert_eq!(channel_capacity(usize::MAX), Semaphore::MAX_PERMITS);
    }

    #[test]
    fn test_check_country() {
        let list = ProxyList::new(
            Scripted::new(vec![None]),
            vec!["US".to_string(), "UK".to_string()],
        );
        assert!(list.check_country("US"));
        assert!(list.check_country("UK"));
        assert!(!list.check_country("DE"));
        assert!(!list.check_country("us"));
        assert!(!list.check_country(""));
    }

    #[test]
    fn test_join_failures() {
        assert_eq!(join_failures(&[None, None]), None);
        let joined = join_failures(&[
            Some(FetchError::RateLimited("first".to_string())),
            None,
            Some(FetchError::TaskAborted),
        ])
        .unwrap();
        assert_eq!(joined, "\u{2022} first\n\u{2022} 抓取任务异常退出\n");
    }
}
