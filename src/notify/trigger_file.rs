use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use autolang_core::LanguageLabel;

use super::ExternalSignal;
use crate::errors::HandoffError;

pub fn trigger_file_name(label: LanguageLabel) -> String {
    format!("autolang_switch_to_{}.trigger", label.as_str())
}

/// Writes `autolang_switch_to_<label>.trigger` into a watched directory and
/// removes it again after a grace delay.
#[derive(Debug)]
pub struct TriggerFileSignal {
    dir: PathBuf,
    grace: Duration,
    pending: Vec<(Instant, PathBuf)>,
}

impl TriggerFileSignal {
    pub fn new(dir: impl Into<PathBuf>, grace: Duration) -> Self {
        Self {
            dir: dir.into(),
            grace,
            pending: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn pending_cleanups(&self) -> usize {
        self.pending.len()
    }

    fn write_artifact(&self, path: &Path, label: LanguageLabel) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(path, label.as_str())
    }
}

impl ExternalSignal for TriggerFileSignal {
    fn signal(&mut self, label: LanguageLabel, now: Instant) -> Result<(), HandoffError> {
        let path = self.dir.join(trigger_file_name(label));
        self.write_artifact(&path, label)
            .map_err(|source| HandoffError::Artifact {
                path: path.clone(),
                source,
            })?;

        // A rewrite of the same artifact restarts its grace period.
        self.pending.retain(|(_, p)| p != &path);
        self.pending.push((now + self.grace, path));
        tracing::debug!(dir = %self.dir.display(), language = %label, "trigger artifact written");
        Ok(())
    }

    fn poll(&mut self, now: Instant) {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;
        remove_artifacts(due);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!(count = self.pending.len(), "removing pending trigger artifacts");
        }
        remove_artifacts(std::mem::take(&mut self.pending));
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }
}

fn remove_artifacts(due: Vec<(Instant, PathBuf)>) {
    for (_, path) in due {
        match fs::remove_file(&path) {
            Ok(()) => tracing::trace!(path = %path.display(), "trigger artifact removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "trigger cleanup failed");
            }
        }
    }
}
