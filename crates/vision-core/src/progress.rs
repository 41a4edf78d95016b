//! Simulated progress for a long-running generation call.
//!
//! The generation service gives no progress signal, so the presenter
//! estimates progress from elapsed time and holds at 95% until it is told
//! the call has finished. The numbers are cosmetic pacing only.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{task::JoinHandle, time::Instant};

/// Label shown once the real result has arrived.
pub const COMPLETION_LABEL: &str = "Your vision is ready!";

/// Timing for the simulated progress bar.
#[derive(Debug, Clone, Copy)]
pub struct ProgressConfig {
    /// Expected duration of a generation call.
    pub estimated: Duration,
    /// How often the display is refreshed.
    pub tick: Duration,
    /// Highest percentage shown before completion.
    pub cap: u8,
    /// Pause between showing 100% and navigating away.
    pub navigate_delay: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            estimated: Duration::from_secs(60),
            tick: Duration::from_millis(500),
            cap: 95,
            navigate_delay: Duration::from_millis(800),
        }
    }
}

/// What the progress display shows at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub percent: u8,
    pub label: &'static str,
}

impl ProgressSnapshot {
    pub fn completed() -> Self {
        Self {
            percent: 100,
            label: COMPLETION_LABEL,
        }
    }
}

/// Estimated progress after `elapsed`.
pub fn progress_at(elapsed: Duration, config: &ProgressConfig) -> ProgressSnapshot {
    let estimated = config.estimated.as_millis().max(1);
    let raw = elapsed.as_millis().saturating_mul(100) / estimated;
    let percent = u8::try_from(raw.min(u128::from(config.cap))).unwrap_or(config.cap);
    ProgressSnapshot {
        percent,
        label: label_for(percent),
    }
}

fn label_for(percent: u8) -> &'static str {
    match percent {
        0..=19 => "Reviewing your answers...",
        20..=44 => "Crafting your vision narrative...",
        45..=69 => "Mapping out your 12-month action plan...",
        70..=89 => "Adding the finishing touches...",
        _ => "Almost there...",
    }
}

type RenderFn = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;
type NavigateFn = Box<dyn FnOnce() + Send>;

struct Shared {
    displayed: u8,
    completed: bool,
    on_navigate: Option<NavigateFn>,
}

/// Drives a progress display from a background tokio task.
///
/// The render callback runs with the presenter's state locked, so it must not
/// call back into the presenter. Dropping the presenter stops all of its timers, including a pending
/// navigation.
pub struct ProgressPresenter {
    config: ProgressConfig,
    shared: Arc<Mutex<Shared>>,
    render: RenderFn,
    ticker: JoinHandle<()>,
    navigation: Mutex<Option<JoinHandle<()>>>,
}

impl ProgressPresenter {
    /// Starts ticking. Must be called from within a tokio runtime.
    pub fn start<R, N>(config: ProgressConfig, render: R, on_navigate: N) -> Self
    where
        R: Fn(&ProgressSnapshot) + Send + Sync + 'static,
        N: FnOnce() + Send + 'static,
    {
        let render: RenderFn = Arc::new(render);
        let shared = Arc::new(Mutex::new(Shared {
            displayed: 0,
            completed: false,
            on_navigate: Some(Box::new(on_navigate)),
        }));

        let ticker = tokio::spawn(tick_loop(config, Arc::clone(&shared), Arc::clone(&render)));

        Self {
            config,
            shared,
            render,
            ticker,
            navigation: Mutex::new(None),
        }
    }

    /// Percentage currently displayed.
    pub fn percent(&self) -> u8 {
        lock(&self.shared).displayed
    }

    /// Shows 100% and navigates once after the configured delay.
    ///
    /// Calling it again has no effect.
    pub fn complete(&self) {
        let on_navigate = {
            let mut shared = lock(&self.shared);
            if shared.completed {
                return;
            }
            shared.completed = true;
            shared.displayed = 100;
            // Rendered under the lock so no tick frame can follow it.
            (self.render)(&ProgressSnapshot::completed());
            shared.on_navigate.take()
        };
        self.ticker.abort();

        if let Some(on_navigate) = on_navigate {
            let delay = self.config.navigate_delay;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                on_navigate();
            });
            *self
                .navigation
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        }
    }

    /// Stops ticking without completing, e.g. after a failed call.
    pub fn stop(&self) {
        lock(&self.shared).completed = true;
        self.ticker.abort();
    }
}

impl Drop for ProgressPresenter {
    fn drop(&mut self) {
        self.ticker.abort();
        if let Some(handle) = self
            .navigation
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

async fn tick_loop(config: ProgressConfig, shared: Arc<Mutex<Shared>>, render: RenderFn) {
    let started = Instant::now();
    let mut interval = tokio::time::interval(config.tick);
    loop {
        interval.tick().await;
        let estimate = progress_at(started.elapsed(), &config);
        let mut state = lock(&shared);
        if state.completed {
            return;
        }
        state.displayed = state.displayed.max(estimate.percent);
        render(&ProgressSnapshot {
            percent: state.displayed,
            label: label_for(state.displayed),
        });
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
