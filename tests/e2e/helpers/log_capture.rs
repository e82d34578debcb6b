use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink. Installed as the thread's default subscriber, so it
/// sees everything emitted by a current-thread test runtime.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    /// `(level, rest of line)` for every captured line
    pub fn lines(&self) -> Vec<(String, String)> {
        let buffer = self.buffer.lock();
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter_map(|line| {
                let line = line.trim_start();
                line.split_once(' ')
                    .map(|(level, rest)| (level.to_string(), rest.trim().to_string()))
            })
            .collect()
    }

    /// Captured lines whose text contains `needle`
    pub fn matching(&self, needle: &str) -> Vec<(String, String)> {
        self.lines()
            .into_iter()
            .filter(|(_, text)| text.contains(needle))
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
