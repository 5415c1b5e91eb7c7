use std::{
    cell::RefCell,
    io,
    path::PathBuf,
    rc::Rc,
    sync::{Mutex, MutexGuard, OnceLock},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use autolang_core::LanguageLabel;

use crate::{
    errors::{ChannelError, HandoffError},
    notify::ExternalSignal,
    protocol::{Channel, Request, Response},
    store::{MemoryStore, SharedStore},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("autolang-tests-{prefix}-{ts}"))
}

/// Keeps a typed handle to the memory store next to the shared one.
pub fn memory_store() -> (Rc<RefCell<MemoryStore>>, SharedStore) {
    let mem = Rc::new(RefCell::new(MemoryStore::new()));
    let shared: SharedStore = mem.clone();
    (mem, shared)
}

pub fn shared_from(store: MemoryStore) -> (Rc<RefCell<MemoryStore>>, SharedStore) {
    let mem = Rc::new(RefCell::new(store));
    let shared: SharedStore = mem.clone();
    (mem, shared)
}

/// Records every signalled label.
#[derive(Clone, Default)]
pub struct RecordingSignal {
    pub sent: Rc<RefCell<Vec<LanguageLabel>>>,
}

impl RecordingSignal {
    pub fn new() -> (Self, Rc<RefCell<Vec<LanguageLabel>>>) {
        let signal = Self::default();
        let sent = signal.sent.clone();
        (signal, sent)
    }
}

impl ExternalSignal for RecordingSignal {
    fn signal(&mut self, label: LanguageLabel, _now: Instant) -> Result<(), HandoffError> {
        self.sent.borrow_mut().push(label);
        Ok(())
    }
}

pub struct FailingSignal;

impl ExternalSignal for FailingSignal {
    fn signal(&mut self, _label: LanguageLabel, _now: Instant) -> Result<(), HandoffError> {
        Err(HandoffError::Artifact {
            path: PathBuf::from("/nonexistent/trigger"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

/// Channel that records requests and answers from a fixed script.
pub struct ScriptedChannel {
    pub requests: Vec<Request>,
    pub failures_left: usize,
    pub language: LanguageLabel,
}

impl ScriptedChannel {
    pub fn ok() -> Self {
        Self {
            requests: Vec::new(),
            failures_left: 0,
            language: LanguageLabel::English,
        }
    }

    pub fn failing(times: usize) -> Self {
        Self {
            failures_left: times,
            ..Self::ok()
        }
    }

    pub fn answering(language: LanguageLabel) -> Self {
        Self {
            language,
            ..Self::ok()
        }
    }

    pub fn updates(&self) -> Vec<(LanguageLabel, bool)> {
        self.requests
            .iter()
            .filter_map(|r| match r {
                Request::UpdateLanguage {
                    language,
                    trigger_switch,
                } => Some((*language, *trigger_switch)),
                _ => None,
            })
            .collect()
    }
}

impl Channel for ScriptedChannel {
    fn send(&mut self, request: Request) -> Result<Response, ChannelError> {
        self.requests.push(request.clone());
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(ChannelError::Disconnected);
        }
        Ok(match request {
            Request::GetLanguage | Request::GetLanguageForScope { .. } => Response::Language {
                language: self.language,
            },
            _ => Response::ok(),
        })
    }
}
