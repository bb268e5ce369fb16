use core::num::ParseIntError;
use crossbeam_channel::{Receiver, TryRecvError};
use std::io::BufRead;
use thiserror::Error;

/// A line that failed base-10 integer parsing.
///
/// Carries enough context for the side-channel log: the 1-based line number
/// and the offending text (line endings already trimmed).
#[derive(Debug, Error)]
#[error("line {line}: {text:?} is not a base-10 integer")]
pub struct MalformedLine {
    /// 1-based position of the line in the input.
    pub line: usize,
    /// The offending line, with `\n`/`\r` trimmed.
    pub text: String,
    #[source]
    source: ParseIntError,
}

/// One pull from a [`TaskSource`].
#[derive(Debug)]
pub enum SourceItem {
    /// The next task to dispatch.
    Task(i64),
    /// Clean end of input. Terminal.
    Exhausted,
    /// A line failed integer parsing. Terminal: the source produces no
    /// further tasks, mirroring exhaustion for downstream purposes.
    Malformed(MalformedLine),
}

/// Abstract producer of the work sequence.
///
/// Sources are lazy, finite, and non-restartable: after `Exhausted` or
/// `Malformed` has been returned once, every subsequent call must return
/// `Exhausted`.
pub trait TaskSource {
    /// Pull the next item.
    fn next_task(&mut self) -> SourceItem;
}

/// Task source over newline-delimited integers.
///
/// Each line, after trimming `\n` and `\r`, must parse as a base-10 `i64`.
/// The first unparsable line or physical end-of-input terminates the
/// sequence. A read error is treated like end-of-input.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    line: usize,
    buf: String,
    done: bool,
}

impl<R: BufRead> LineSource<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
            done: false,
        }
    }
}

impl<R: BufRead> TaskSource for LineSource<R> {
    fn next_task(&mut self) -> SourceItem {
        if self.done {
            return SourceItem::Exhausted;
        }
        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => {
                self.done = true;
                return SourceItem::Exhausted;
            }
            Ok(_) => {}
            Err(err) => {
                self.done = true;
                tracing::warn!(%err, line = self.line + 1, "task source read failed");
                return SourceItem::Exhausted;
            }
        }
        self.line += 1;
        let text = self.buf.trim_end_matches(['\n', '\r']);
        match text.parse::<i64>() {
            Ok(task) => SourceItem::Task(task),
            Err(source) => {
                self.done = true;
                SourceItem::Malformed(MalformedLine {
                    line: self.line,
                    text: text.to_owned(),
                    source,
                })
            }
        }
    }
}

/// Task source over an in-memory sequence.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I: Iterator<Item = i64>> IterSource<I> {
    /// Wrap any iterable of tasks.
    pub fn new<T>(tasks: T) -> Self
    where
        T: IntoIterator<Item = i64, IntoIter = I>,
    {
        Self {
            iter: tasks.into_iter(),
        }
    }
}

impl<I: Iterator<Item = i64>> TaskSource for IterSource<I> {
    fn next_task(&mut self) -> SourceItem {
        self.iter.next().map_or(SourceItem::Exhausted, SourceItem::Task)
    }
}

/// Wraps a source with an external cancellation signal.
///
/// Once the signal fires (a message arrives on the channel, or its sender is
/// dropped — both count, matching deadline channels and drop-to-cancel
/// handles), `next_task` returns `Exhausted` without touching the inner
/// source. Cancellation only stops new admissions; work already dispatched
/// is unaffected.
#[derive(Debug)]
pub struct CancellableSource<S, T = ()> {
    inner: S,
    cancel: Receiver<T>,
    cancelled: bool,
}

impl<S: TaskSource, T> CancellableSource<S, T> {
    /// Wrap `inner` so that it stops producing once `cancel` fires.
    ///
    /// The message type is irrelevant; `crossbeam_channel::after` deadline
    /// channels (`Receiver<Instant>`) work directly.
    pub fn new(inner: S, cancel: Receiver<T>) -> Self {
        Self {
            inner,
            cancel,
            cancelled: false,
        }
    }
}

impl<S: TaskSource, T> TaskSource for CancellableSource<S, T> {
    fn next_task(&mut self) -> SourceItem {
        if self.cancelled {
            return SourceItem::Exhausted;
        }
        match self.cancel.try_recv() {
            Ok(_) | Err(TryRecvError::Disconnected) => {
                self.cancelled = true;
                tracing::debug!("task source cancelled");
                SourceItem::Exhausted
            }
            Err(TryRecvError::Empty) => self.inner.next_task(),
        }
    }
}
