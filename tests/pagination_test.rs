//! 分页稳定性轮询测试
//!
//! 用模拟采样序列驱动轮询器，不需要真实浏览器

use html_to_pdf::services::pagination::{
    wait_for_stable_count, PollOptions, REQUIRED_STABLE_SAMPLES,
};
use std::time::Duration;
use tokio_test::assert_ok;

fn options(max_wait_ms: u64, poll_interval_ms: u64) -> PollOptions {
    PollOptions {
        max_wait: Duration::from_millis(max_wait_ms),
        poll_interval: Duration::from_millis(poll_interval_ms),
        required_stable_samples: REQUIRED_STABLE_SAMPLES,
    }
}

#[tokio::test(start_paused = true)]
async fn sequence_3_5_5_5_declares_stability_at_five() {
    let sequence = [3u32, 5, 5, 5];
    let mut index = 0usize;

    let outcome = assert_ok!(
        wait_for_stable_count(
            || {
                let count = sequence[index.min(sequence.len() - 1)];
                index += 1;
                async move { anyhow::Ok(count) }
            },
            &options(30_000, 500),
        )
        .await
    );

    assert!(outcome.stable, "计数在 5 上保持三次后应稳定");
    assert_eq!(outcome.count, 5);
    assert_eq!(outcome.samples, 4, "首个 3 加上三个 5，共四次采样");
}

#[tokio::test(start_paused = true)]
async fn growing_page_count_times_out_without_stability() {
    let mut counter = 0u32;

    let outcome = assert_ok!(
        wait_for_stable_count(
            || {
                counter += 1;
                let count = counter;
                async move { anyhow::Ok(count) }
            },
            &options(2_000, 500),
        )
        .await
    );

    assert!(!outcome.stable, "持续变化的页数不应稳定");
    assert!(outcome.count > 0, "超时结果应携带最后一次采样值");
}
