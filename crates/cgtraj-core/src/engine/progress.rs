/// Advisory progress events emitted by workflows and block workers.
///
/// Reporting is a side channel: no event carries data the run result depends
/// on, and a reporter without a callback swallows everything.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    /// The dispatcher is about to fan out this many blocks.
    RunStart { blocks: u64 },
    BlockStart {
        block_id: usize,
        start: usize,
        stop: usize,
        stride: usize,
    },
    BlockFinish { block_id: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
