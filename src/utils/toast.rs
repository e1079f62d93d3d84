//! Transient terminal notifications
//!
//! Each toast is one line in an `indicatif` display root. It stays for
//! [`VISIBLE_FOR`], is dimmed for [`FADE_FOR`], then is cleared and removed.
//! Toasts are independent: none is queued, deduplicated or cancellable.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

pub const VISIBLE_FOR: Duration = Duration::from_millis(3000);
pub const FADE_FOR: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Success,
    Error,
    Info,
}

impl Severity {
    /// Map a severity name; anything unrecognised is shown as `Info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Severity::Success,
            "error" => Severity::Error,
            _ => Severity::Info,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Severity::Success => "✔",
            Severity::Error => "✖",
            Severity::Info => "ℹ",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Severity::Success => "{prefix:.bold.green} {msg:.green}",
            Severity::Error => "{prefix:.bold.red} {msg:.red}",
            Severity::Info => "{prefix:.bold.cyan} {msg:.cyan}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub phase: ToastPhase,
}

/// Owns the display root that toasts are drawn into.
#[derive(Clone)]
pub struct Toaster {
    root: MultiProgress,
    live: Arc<Mutex<Vec<Toast>>>,
    timers: Arc<Mutex<Vec<JoinHandle<()>>>>,
    next_id: Arc<AtomicU64>,
}

impl Toaster {
    /// Draw toasts on stderr.
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// A display root that tracks toasts without drawing them.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            root: MultiProgress::with_draw_target(target),
            live: Arc::new(Mutex::new(Vec::new())),
            timers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Show `message` now and schedule its fade and removal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show_toast(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let bar = self.root.add(ProgressBar::new_spinner());
        bar.set_style(style(severity.template()));
        bar.set_prefix(severity.symbol());
        bar.set_message(message.clone());
        bar.tick();

        debug!("Toast {} ({:?}): {}", id, severity, message);
        lock(&self.live).push(Toast {
            id,
            message,
            severity,
            phase: ToastPhase::Visible,
        });

        let root = self.root.clone();
        let live = Arc::clone(&self.live);
        let timer = tokio::spawn(async move {
            sleep(VISIBLE_FOR).await;
            if let Some(toast) = lock(&live).iter_mut().find(|t| t.id == id) {
                toast.phase = ToastPhase::Fading;
            }
            bar.set_style(style("{prefix:.dim} {msg:.dim}"));
            bar.tick();

            sleep(FADE_FOR).await;
            bar.finish_and_clear();
            root.remove(&bar);
            lock(&live).retain(|t| t.id != id);
        });

        let mut timers = lock(&self.timers);
        timers.retain(|t| !t.is_finished());
        timers.push(timer);
    }

    /// The display root, for output that must not tear a live toast.
    pub fn display_root(&self) -> MultiProgress {
        self.root.clone()
    }

    /// Toasts currently in the display root, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        lock(&self.live).clone()
    }

    /// Wait until every toast shown so far has been removed.
    pub async fn drain(&self) {
        for toast in self.active() {
            debug!(
                "Waiting on toast {} ({:?}, {:?}): {}",
                toast.id, toast.severity, toast.phase, toast.message
            );
        }
        let timers: Vec<JoinHandle<()>> = lock(&self.timers).drain(..).collect();
        for timer in timers {
            let _ = timer.await;
        }
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_severity_falls_back_to_info() {
        assert_eq!(Severity::from_name("success"), Severity::Success);
        assert_eq!(Severity::from_name("error"), Severity::Error);
        assert_eq!(Severity::from_name("info"), Severity::Info);
        assert_eq!(Severity::from_name("warning"), Severity::Info);
        assert_eq!(Severity::default(), Severity::Success);
    }

    #[test]
    fn templates_parse() {
        for severity in [Severity::Success, Severity::Error, Severity::Info] {
            assert!(ProgressStyle::with_template(severity.template()).is_ok());
        }
        assert!(ProgressStyle::with_template("{prefix:.dim} {msg:.dim}").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn toast_lifecycle() {
        let toaster = Toaster::hidden();
        toaster.show_toast("Saved", Severity::Success);

        let shown = toaster.active();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "Saved");
        assert_eq!(shown[0].phase, ToastPhase::Visible);

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(toaster.active()[0].phase, ToastPhase::Visible);

        sleep(Duration::from_millis(101)).await;
        assert_eq!(toaster.active()[0].phase, ToastPhase::Fading);

        sleep(Duration::from_millis(199)).await;
        let fading = toaster.active();
        assert_eq!(fading.len(), 1);
        assert_eq!(fading[0].phase, ToastPhase::Fading);

        sleep(Duration::from_millis(2)).await;
        assert!(toaster.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_toasts_keep_their_own_timers() {
        let toaster = Toaster::hidden();
        toaster.show_toast("first", Severity::Info);
        sleep(Duration::from_millis(1000)).await;
        toaster.show_toast("first", Severity::Error);
        assert_eq!(toaster.active().len(), 2);

        sleep(Duration::from_millis(2301)).await;
        let remaining = toaster.active();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].severity, Severity::Error);

        toaster.drain().await;
        assert!(toaster.active().is_empty());
    }
}
