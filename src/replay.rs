//! 关键点流回放
//!
//! 读取 JSON Lines（每行一个事件），送入估计器，逐帧输出 JSON 结果。
//! 读取端与处理端通过有界通道解耦：读取任务只负责按行转发，
//! 处理端独占估计器并严格按顺序处理。

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::estimator::{DrowsinessEstimator, FrameResult, ImageSize, Landmark};
use crate::overlay::{Highlight, HighlightTracker};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 输入事件
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReplayEvent {
    #[serde(rename_all = "camelCase")]
    Frame {
        timestamp_ms: u64,
        image_width: u32,
        image_height: u32,
        #[serde(default)]
        landmarks: Option<Vec<Landmark>>,
    },
    /// 关键点流为空：会话结束，计数清零
    Empty,
    Reset {
        #[serde(default)]
        hard: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutput {
    pub timestamp_ms: u64,
    pub result: FrameResult,
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub frames: u64,
    pub events: u64,
    pub malformed_frames: u64,
    pub skipped_frames: u64,
    pub undecodable_lines: u64,
}

pub struct ReplaySession {
    estimator: DrowsinessEstimator,
    highlight: HighlightTracker,
    summary: ReplaySummary,
    last_timestamp: u64,
}

impl ReplaySession {
    pub fn new(estimator: DrowsinessEstimator, highlight_hold_ms: u64) -> Self {
        Self {
            estimator,
            highlight: HighlightTracker::new(highlight_hold_ms),
            summary: ReplaySummary::default(),
            last_timestamp: 0,
        }
    }

    pub fn estimator(&self) -> &DrowsinessEstimator {
        &self.estimator
    }

    pub fn summary(&self) -> ReplaySummary {
        self.summary
    }

    /// 处理一行原始字节；非 UTF-8 的行计入无法解码并跳过
    pub fn handle_bytes(&mut self, raw: &[u8]) -> Option<ReplayOutput> {
        match std::str::from_utf8(raw) {
            Ok(line) => self.handle_line(line),
            Err(e) => {
                self.summary.undecodable_lines += 1;
                tracing::warn!(error = %e, "Skipping undecodable replay line");
                None
            }
        }
    }

    /// 处理一行输入；只有帧事件会产生输出
    pub fn handle_line(&mut self, line: &str) -> Option<ReplayOutput> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<ReplayEvent>(line) {
            Ok(event) => self.handle_event(event),
            Err(e) => {
                self.summary.undecodable_lines += 1;
                tracing::warn!(error = %e, "Skipping undecodable replay line");
                None
            }
        }
    }

    pub fn handle_event(&mut self, event: ReplayEvent) -> Option<ReplayOutput> {
        match event {
            ReplayEvent::Frame {
                timestamp_ms,
                image_width,
                image_height,
                landmarks,
            } => self.handle_frame(
                timestamp_ms,
                ImageSize::new(image_width, image_height),
                landmarks.as_deref(),
            ),
            ReplayEvent::Empty => {
                self.estimator.reset(true);
                self.highlight.clear(true, self.last_timestamp);
                None
            }
            ReplayEvent::Reset { hard } => {
                self.estimator.reset(hard);
                None
            }
        }
    }

    fn handle_frame(
        &mut self,
        timestamp_ms: u64,
        image: ImageSize,
        landmarks: Option<&[Landmark]>,
    ) -> Option<ReplayOutput> {
        self.summary.frames += 1;
        self.last_timestamp = timestamp_ms;

        let result = match self.estimator.observe(landmarks, image, timestamp_ms) {
            Ok(result) => result,
            Err(e) if e.is_malformed() => {
                // 关键点不完整时按无人脸处理
                self.summary.malformed_frames += 1;
                tracing::warn!(timestamp_ms, error = %e, "Malformed frame treated as no face");
                match self.estimator.observe(None, image, timestamp_ms) {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!(timestamp_ms, error = %e, "Absent frame rejected");
                        return None;
                    }
                }
            }
            Err(e) => {
                self.summary.skipped_frames += 1;
                tracing::warn!(timestamp_ms, error = %e, "Skipping invalid frame");
                return None;
            }
        };

        if result.label.is_some() {
            self.summary.events += 1;
        }
        let highlight = self.highlight.update(&result, timestamp_ms);

        Some(ReplayOutput {
            timestamp_ms,
            result,
            highlight,
        })
    }
}

/// 读取端：按行转发原始字节，编码校验留给处理端；接收端关闭时提前结束
pub async fn pump_lines<R>(mut reader: R, tx: mpsc::Sender<Vec<u8>>) -> std::io::Result<u64>
where
    R: AsyncBufRead + Unpin,
{
    let mut sent = 0_u64;
    loop {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if tx.send(line).await.is_err() {
            tracing::debug!(sent, "Replay consumer closed, stopping reader");
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

/// 处理端：按顺序消费所有行并写出结果
pub async fn drain<W>(
    mut rx: mpsc::Receiver<Vec<u8>>,
    session: &mut ReplaySession,
    mut writer: W,
) -> Result<ReplaySummary, ReplayError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        if let Some(output) = session.handle_bytes(&line) {
            let mut encoded = serde_json::to_vec(&output)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
        }
    }
    writer.flush().await?;
    Ok(session.summary())
}

/// 完整回放：读取任务与处理循环并发运行
pub async fn run<R, W>(
    reader: R,
    writer: W,
    session: &mut ReplaySession,
    channel_capacity: usize,
) -> Result<ReplaySummary, ReplayError>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let (tx, rx) = mpsc::channel(channel_capacity.max(1));
    let reader_handle = tokio::spawn(pump_lines(reader, tx));

    let summary = drain(rx, session, writer).await?;

    match reader_handle.await {
        Ok(Ok(lines)) => tracing::debug!(lines, "Replay reader finished"),
        Ok(Err(e)) => return Err(ReplayError::Io(e)),
        Err(e) => tracing::error!(error = %e, "Replay reader task panicked"),
    }
    Ok(summary)
}

/// 打开输入源：指定路径时读文件，否则读标准输入
pub async fn open_input(
    path: Option<&str>,
) -> std::io::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}
