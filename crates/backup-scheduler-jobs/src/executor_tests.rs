use super::*;
use backup_scheduler_config::JobSpec;
use std::time::Duration;

fn executor_for(specs: Vec<JobSpec>) -> Executor {
    executor_with_config(specs, ExecutorConfig::default())
}

fn executor_with_config(specs: Vec<JobSpec>, config: ExecutorConfig) -> Executor {
    let registry = Arc::new(JobRegistry::load(&specs).unwrap());
    Executor::new(registry, config)
}

fn rclone_config(binary: &str) -> ExecutorConfig {
    ExecutorConfig {
        rclone_binary: binary.to_string(),
        ..Default::default()
    }
}

async fn wait_idle(executor: &Executor, index: usize) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while executor.is_running(index) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("job should finish");
}

#[test]
fn test_executor_config_from_rclone_config() {
    let rclone = RcloneConfig {
        binary: "/opt/rclone".to_string(),
        config_file: Some("/etc/rclone.conf".to_string()),
        extra_args: vec!["-v".to_string()],
    };
    let config = ExecutorConfig::from(&rclone);
    assert_eq!(config.rclone_binary, "/opt/rclone");
    assert_eq!(config.rclone_config.as_deref(), Some("/etc/rclone.conf"));
    assert_eq!(config.rclone_extra_args, vec!["-v"]);
}

#[test]
fn test_sync_command_line() {
    let executor = executor_with_config(
        vec![JobSpec::rclone("sync", "sync /data remote:")],
        ExecutorConfig {
            rclone_binary: "rclone".to_string(),
            rclone_config: Some("/etc/rclone.conf".to_string()),
            rclone_extra_args: vec!["-v".to_string()],
        },
    );
    let job = executor.registry().get(0).unwrap();
    let cmd = executor.inner.command_for(&job.action);
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), "rclone");
    let args: Vec<_> = std_cmd.get_args().collect();
    assert_eq!(
        args,
        vec!["--config", "/etc/rclone.conf", "-v", "sync", "/data", "remote:"]
    );
}

#[cfg(unix)]
#[test]
fn test_shell_command_line() {
    let executor = executor_for(vec![JobSpec::shell("shell", "echo a && echo b")]);
    let job = executor.registry().get(0).unwrap();
    let cmd = executor.inner.command_for(&job.action);
    let std_cmd = cmd.as_std();
    assert_eq!(std_cmd.get_program(), "sh");
    let args: Vec<_> = std_cmd.get_args().collect();
    assert_eq!(args, vec!["-c", "echo a && echo b"]);
}

#[tokio::test]
async fn test_forward_lines_counts_lines() {
    let output: &[u8] = b"first\nsecond\r\nlast without newline";
    assert_eq!(forward_lines(Some(output), "test", "stdout").await, 3);
    assert_eq!(forward_lines(None::<&[u8]>, "test", "stdout").await, 0);
}

#[tokio::test]
async fn test_forward_lines_tolerates_invalid_utf8() {
    let output: &[u8] = b"ok\n\xff\xfe\nok\n";
    assert_eq!(forward_lines(Some(output), "test", "stderr").await, 3);
}

#[tokio::test]
async fn test_forward_lines_splits_carriage_returns() {
    let output: &[u8] = b"Transferred: 10%\rTransferred: 55%\rTransferred: 100%\r\ndone\n";
    assert_eq!(forward_lines(Some(output), "test", "stderr").await, 4);
}

#[tokio::test]
async fn test_forward_lines_caps_line_length() {
    let output = vec![b'x'; MAX_LINE_BYTES * 2 + 10];
    assert_eq!(forward_lines(Some(output.as_slice()), "test", "stdout").await, 3);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_action_success() {
    let executor = executor_for(vec![JobSpec::shell("ok", "echo hello; echo oops >&2")]);
    let job = executor.registry().get(0).unwrap().clone();
    assert_eq!(executor.run_action(&job).await, RunOutcome::Succeeded);
}

#[cfg(unix)]
#[tokio::test]
async fn test_run_action_non_zero_exit() {
    let executor = executor_for(vec![JobSpec::shell("fail", "exit 3")]);
    let job = executor.registry().get(0).unwrap().clone();
    let outcome = executor.run_action(&job).await;
    assert_eq!(outcome, RunOutcome::Failed { code: Some(3) });
    assert!(!outcome.is_success());
}

#[cfg(unix)]
#[tokio::test]
async fn test_sync_job_uses_rclone_binary() {
    let ok = executor_with_config(vec![JobSpec::rclone("sync", "sync a b")], rclone_config("true"));
    let job = ok.registry().get(0).unwrap().clone();
    assert_eq!(ok.run_action(&job).await, RunOutcome::Succeeded);

    let failing = executor_with_config(vec![JobSpec::rclone("sync", "sync a b")], rclone_config("false"));
    let job = failing.registry().get(0).unwrap().clone();
    assert_eq!(failing.run_action(&job).await, RunOutcome::Failed { code: Some(1) });
}

#[tokio::test]
async fn test_missing_binary_is_spawn_failure() {
    let executor = executor_with_config(
        vec![JobSpec::rclone("sync", "sync a b")],
        rclone_config("/nonexistent/bin/rclone-backup-test"),
    );
    let job = executor.registry().get(0).unwrap().clone();
    assert!(matches!(
        executor.run_action(&job).await,
        RunOutcome::SpawnFailed(_)
    ));
}

#[tokio::test]
async fn test_trigger_unknown_index() {
    let executor = executor_for(vec![JobSpec::shell("one", "true")]);
    assert!(matches!(executor.trigger(1), Err(JobError::NotFound(1))));
    assert!(!executor.is_running(1));
}

#[cfg(unix)]
#[tokio::test]
async fn test_second_trigger_is_busy_until_run_completes() {
    let executor = executor_for(vec![JobSpec::shell("slow", "sleep 1")]);

    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    assert!(executor.is_running(0));
    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Busy);
    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Busy);

    wait_idle(&executor, 0).await;
    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    wait_idle(&executor, 0).await;
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_triggers_accept_exactly_one() {
    let executor = executor_for(vec![JobSpec::shell("slow", "sleep 1")]);
    let barrier = Arc::new(tokio::sync::Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let executor = executor.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                executor.trigger(0).unwrap()
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        if handle.await.unwrap() == TriggerResult::Accepted {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    wait_idle(&executor, 0).await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_different_jobs_run_in_parallel() {
    let executor = executor_for(vec![
        JobSpec::shell("a", "sleep 1"),
        JobSpec::shell("b", "sleep 1"),
    ]);

    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    assert_eq!(executor.trigger(1).unwrap(), TriggerResult::Accepted);
    assert!(executor.is_running(0));
    assert!(executor.is_running(1));

    wait_idle(&executor, 0).await;
    wait_idle(&executor, 1).await;
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_run_releases_job() {
    let executor = executor_for(vec![JobSpec::shell("fail", "exit 1")]);

    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    wait_idle(&executor, 0).await;
    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    wait_idle(&executor, 0).await;
}

#[tokio::test]
async fn test_spawn_failure_releases_job() {
    let executor = executor_with_config(
        vec![JobSpec::rclone("sync", "sync a b")],
        rclone_config("/nonexistent/bin/rclone-backup-test"),
    );

    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    wait_idle(&executor, 0).await;
    assert_eq!(executor.trigger(0).unwrap(), TriggerResult::Accepted);
    wait_idle(&executor, 0).await;
}
