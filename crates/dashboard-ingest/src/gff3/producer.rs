//! Turns a byte stream into newline-terminated lines

use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, error, info_span, Instrument};

use super::error::IngestError;
use super::pipeline::{spawn_stage, ErrorSignal};
use super::{Line, DEFAULT_MAX_LINE_LENGTH, LINE_CHANNEL_CAPACITY};

/// First pipeline stage: frames the input into lines.
pub struct LineProducer<R> {
    reader: R,
    max_line_length: usize,
}

impl<R> LineProducer<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Start reading in a background task.
    ///
    /// Lines are handed over one at a time, so the producer never runs more
    /// than one line ahead of its reader. A read failure ends the stream and is
    /// reported on the returned signal.
    pub fn spawn(self) -> (mpsc::Receiver<Line>, ErrorSignal) {
        let (out, lines) = mpsc::channel(LINE_CHANNEL_CAPACITY);

        let task = async move {
            let mut framed = FramedRead::new(
                self.reader,
                LinesCodec::new_with_max_length(self.max_line_length),
            );
            let mut count = 0usize;

            while let Some(next) = framed.next().await {
                match next {
                    Ok(mut line) => {
                        line.push('\n');
                        count += 1;
                        if out.send(Line::from(line)).await.is_err() {
                            debug!(lines = count, "Line receiver dropped, stopping producer");
                            return Ok(());
                        }
                    },
                    Err(e) => {
                        error!(line = count + 1, error = %e, "Failed to read gff3 input");
                        return Err(IngestError::Scan(e));
                    },
                }
            }

            debug!(lines = count, "Finished reading gff3 input");
            Ok(())
        };

        let signal = spawn_stage("producer", task.instrument(info_span!("gff3_producer")));
        (lines, signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(mut lines: mpsc::Receiver<Line>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = lines.recv().await {
            out.push(line.to_string());
        }
        out
    }

    #[tokio::test]
    async fn test_lines_are_newline_terminated_in_order() {
        let input: &[u8] = b"##gff-version 3\nchr1\t.\tgene\nlast line without newline";
        let (lines, mut signal) = LineProducer::new(input).spawn();

        assert_eq!(
            collect(lines).await,
            vec![
                "##gff-version 3\n".to_string(),
                "chr1\t.\tgene\n".to_string(),
                "last line without newline\n".to_string(),
            ]
        );
        assert!(signal.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_crlf_input_is_normalized() {
        let input: &[u8] = b"a\r\nb\r\n";
        let (lines, _signal) = LineProducer::new(input).spawn();
        assert_eq!(collect(lines).await, vec!["a\n".to_string(), "b\n".to_string()]);
    }

    #[tokio::test]
    async fn test_overlong_line_is_a_scan_error() {
        let input = format!("short\n{}\nnever seen\n", "x".repeat(64));
        let (lines, mut signal) = LineProducer::new(std::io::Cursor::new(input.into_bytes()))
            .with_max_line_length(16)
            .spawn();

        assert_eq!(collect(lines).await, vec!["short\n".to_string()]);
        let err = signal.recv().await.expect("scan error");
        assert!(matches!(err, IngestError::Scan(_)));
        assert!(signal.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_a_scan_error() {
        let input: &[u8] = b"ok\n\xff\xfe\n";
        let (lines, mut signal) = LineProducer::new(input).spawn();

        assert_eq!(collect(lines).await, vec!["ok\n".to_string()]);
        assert!(matches!(signal.recv().await, Some(IngestError::Scan(_))));
    }
}
