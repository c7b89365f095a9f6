use crate::error::CommandError;
use log::{debug, warn};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 輪詢子程序狀態的間隔
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 外部程式執行結果
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// 以阻塞方式執行外部程式，並在逾時後終止
///
/// stdout / stderr 由背景執行緒讀取，避免管線緩衝區塞滿造成死結。
/// 非零結束碼會轉為 `CommandError::Failed`。
pub fn run_with_timeout(
    mut command: Command,
    timeout: Duration,
) -> Result<CommandOutput, CommandError> {
    let program = command.get_program().to_string_lossy().to_string();
    debug!(
        "執行: {} {}",
        program,
        command
            .get_args()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    );

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // 終端機的 Ctrl-C 只送到前景程序群組，子程序獨立成群組才不會被一起中斷
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut child = command.spawn().map_err(|source| CommandError::Spawn {
        program: program.clone(),
        source,
    })?;

    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = match wait_with_deadline(&mut child, timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            warn!("{program} 超過 {} 秒未結束，強制終止", timeout.as_secs());
            let _ = child.kill();
            let _ = child.wait();
            // 孫程序可能仍持有管線，讀取執行緒不等待直接分離
            drop(stdout_reader);
            drop(stderr_reader);
            return Err(CommandError::Timeout {
                program,
                seconds: timeout.as_secs(),
            });
        }
        Err(source) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(CommandError::Io { program, source });
        }
    };

    let stdout = join_reader(stdout_reader);
    let stderr = String::from_utf8_lossy(&join_reader(stderr_reader))
        .trim()
        .to_string();

    if !status.success() {
        return Err(CommandError::Failed {
            program,
            code: status.code(),
            stderr,
        });
    }

    Ok(CommandOutput { stdout, stderr })
}

fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
