//! HUD controller
//!
//! Owns the lifecycle of one HUD: attaching to a surface, switching modes,
//! running the spinner, fading in and out, and detaching again.
//!
//! ```text
//!            show                 dismiss / auto-dismiss
//! Hidden ──────────▶ Showing ─────────────────────────▶ Dismissing
//!   ▲                  ▲  │ show (update in place)           │
//!   │                  │  └──────┘                           │
//!   │                  └──────────── show (fade back in) ────┤
//!   └───────────────────── fade-out complete ────────────────┘
//! ```
//!
//! All methods must be called from the UI thread that owns the `Hud`. Timer
//! events arrive on an internal channel and are applied by
//! [`Hud::handle_event`] / [`Hud::process_pending`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::animation::{AnimatedValue, Transaction};
use crate::config::HudConfig;
use crate::error::HudError;
use crate::geometry::{Point, Size};
use crate::host::{ClickOutcome, Host, Surface};
use crate::layout::{self, HudLayout};
use crate::paint::{self, Frame};
use crate::scheduler::{deadline_after, HudEvent, Scheduler, TimerHandle};
use crate::spinner::SpinnerEngine;
use crate::state::{display_duration, CustomView, HudMode, HudState, Phase};

/// Callback run once a dismiss has fully completed
pub type Completion = Box<dyn FnOnce()>;

/// The HUD controller
pub struct Hud<H: Host> {
    config: HudConfig,
    host: H,
    state: HudState,
    scheduler: Scheduler,
    events: mpsc::UnboundedReceiver<HudEvent>,
    surface: Option<Surface>,
    spinner: Option<SpinnerEngine>,
    alpha: AnimatedValue,
    dismiss_timer: Option<TimerHandle>,
    fade_timer: Option<TimerHandle>,
    completion: Option<Completion>,
}

impl<H: Host> Hud<H> {
    /// Create a hidden HUD. Must be called inside a tokio runtime.
    pub fn new(config: HudConfig, host: H) -> Result<Self, HudError> {
        let (scheduler, events) = Scheduler::new()?;
        Ok(Self {
            config,
            host,
            state: HudState::default(),
            scheduler,
            events,
            surface: None,
            spinner: None,
            alpha: AnimatedValue::new(0.0),
            dismiss_timer: None,
            fade_timer: None,
            completion: None,
        })
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    /// Change configuration; the spinner and the on-screen frame follow
    pub fn update_config(&mut self, f: impl FnOnce(&mut HudConfig)) {
        f(&mut self.config);
        self.resize();
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &HudState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn spinner(&self) -> Option<&SpinnerEngine> {
        self.spinner.as_ref()
    }

    /// Surface the HUD is attached to, if any
    pub fn surface(&self) -> Option<Surface> {
        self.surface
    }

    // ------------------------------------------------------------------
    // show
    // ------------------------------------------------------------------

    /// Indeterminate spinner, no status
    pub fn show(&mut self) {
        self.show_mode(HudMode::Indeterminate, String::new());
    }

    /// Indeterminate spinner with status text
    pub fn show_status(&mut self, status: impl Into<String>) {
        self.show_mode(HudMode::Indeterminate, status.into());
    }

    /// Progress ring. Call repeatedly to advance it; an already visible HUD
    /// is updated in place.
    pub fn show_progress(&mut self, progress: f64) {
        self.show_mode(HudMode::Determinate(progress), String::new());
    }

    pub fn show_progress_status(&mut self, progress: f64, status: impl Into<String>) {
        self.show_mode(HudMode::Determinate(progress), status.into());
    }

    /// Info glyph; dismisses itself after [`display_duration`]
    pub fn show_info(&mut self, status: impl Into<String>) {
        self.show_mode(HudMode::Info, status.into());
    }

    /// Checkmark glyph; dismisses itself after [`display_duration`]
    pub fn show_success(&mut self, status: impl Into<String>) {
        self.show_mode(HudMode::Success, status.into());
    }

    /// Cross glyph; dismisses itself after [`display_duration`]
    pub fn show_error(&mut self, status: impl Into<String>) {
        self.show_mode(HudMode::Error, status.into());
    }

    /// Caller-owned view in place of the indicator
    pub fn show_custom(&mut self, view: CustomView, status: impl Into<String>) {
        self.show_mode(HudMode::Custom(view), status.into());
    }

    /// Replace the status text of a visible HUD. No-op when hidden.
    pub fn set_status(&mut self, status: impl Into<String>) {
        if !self.is_visible() {
            return;
        }
        self.state.status = status.into();
        self.redraw();
    }

    fn show_mode(&mut self, mode: HudMode, status: String) {
        let now = Instant::now();
        let target = self.target_surface();

        if self.is_visible() && self.surface != Some(target) {
            debug!(?target, "moving hud to a new surface");
            self.teardown();
        }

        if !self.is_visible() {
            let Some(bounds) = self.host.attach(target) else {
                warn!(?target, "hud surface unavailable, not showing");
                return;
            };
            debug!(?target, ?bounds, mode = mode.name(), "showing hud");
            self.surface = Some(target);
            self.state.phase = Phase::Showing;
            self.alpha = AnimatedValue::new(0.0);
            self.alpha
                .set(1.0, Transaction::animated(self.config.fade_in()), now);
        } else if self.state.phase == Phase::Dismissing {
            debug!("show during fade-out, fading back in");
            self.fade_timer = None;
            self.state.phase = Phase::Showing;
            self.alpha
                .set(1.0, Transaction::animated(self.config.fade_in()), now);
        } else {
            trace!(mode = mode.name(), "updating hud in place");
        }

        // A stale delayed dismiss must not hide what is being shown now,
        // and its completion belongs to a hide that will never happen
        self.cancel_pending_dismiss();
        self.completion = None;

        self.state.mode = mode;
        self.state.status = status;
        self.sync_spinner(now);

        if self.state.mode.auto_dismisses() {
            let (min, max) = self.config.dismiss_bounds();
            let delay = display_duration(&self.state.status, min, max);
            self.dismiss_inner(delay, None);
        }

        self.redraw();
    }

    fn target_surface(&self) -> Surface {
        match self.config.container {
            Some(id) => Surface::Container(id),
            None => Surface::Overlay,
        }
    }

    /// Start the spinner for indeterminate mode, drop it otherwise
    fn sync_spinner(&mut self, now: Instant) {
        if self.state.mode.is_indeterminate() {
            let diameter = self.config.spinner_diameter;
            let color = self.config.style.foreground();
            let spinner = self
                .spinner
                .get_or_insert_with(|| SpinnerEngine::new(diameter, color));
            spinner.configure(diameter, color);
            spinner.start(&mut self.scheduler);
        } else if let Some(mut spinner) = self.spinner.take() {
            spinner.stop(now);
        }
    }

    // ------------------------------------------------------------------
    // dismiss
    // ------------------------------------------------------------------

    /// Fade out now
    pub fn dismiss(&mut self) {
        self.dismiss_inner(Duration::ZERO, None);
    }

    /// Fade out now and run `completion` once hidden
    pub fn dismiss_with(&mut self, completion: impl FnOnce() + 'static) {
        self.dismiss_inner(Duration::ZERO, Some(Box::new(completion)));
    }

    /// Fade out after `delay`, replacing any earlier delayed dismiss
    pub fn dismiss_after(&mut self, delay: Duration) {
        self.dismiss_inner(delay, None);
    }

    pub fn dismiss_after_with(&mut self, delay: Duration, completion: impl FnOnce() + 'static) {
        self.dismiss_inner(delay, Some(Box::new(completion)));
    }

    fn dismiss_inner(&mut self, delay: Duration, completion: Option<Completion>) {
        if !self.is_visible() {
            if let Some(completion) = completion {
                completion();
            }
            return;
        }

        self.cancel_pending_dismiss();
        if completion.is_some() {
            self.completion = completion;
        }

        if delay.is_zero() {
            self.begin_hide(Instant::now());
        } else {
            debug!(?delay, "scheduling dismiss");
            self.dismiss_timer = Some(self.scheduler.once(delay));
            self.state.dismiss_pending = true;
        }
    }

    fn cancel_pending_dismiss(&mut self) {
        if let Some(timer) = self.dismiss_timer.take() {
            trace!(id = ?timer.id(), "cancelling pending dismiss");
            timer.cancel();
        }
        self.state.dismiss_pending = false;
    }

    fn begin_hide(&mut self, at: Instant) {
        if self.state.phase != Phase::Showing {
            return;
        }
        let fade = self.config.fade_out();
        debug!(?fade, "hiding hud");
        self.state.phase = Phase::Dismissing;

        if fade.is_zero() {
            self.finish_hide();
            return;
        }
        self.alpha.set(0.0, Transaction::animated(fade), at);
        self.fade_timer = Some(self.scheduler.once_at(deadline_after(at, fade)));
        self.redraw();
    }

    fn finish_hide(&mut self) {
        self.teardown();
        debug!("hud hidden");
        if let Some(completion) = self.completion.take() {
            completion();
        }
    }

    /// Stop everything and detach without running the completion
    fn teardown(&mut self) {
        let now = Instant::now();
        if let Some(mut spinner) = self.spinner.take() {
            spinner.stop(now);
        }
        self.cancel_pending_dismiss();
        self.fade_timer = None;
        if let Some(surface) = self.surface.take() {
            self.host.detach(surface);
        }
        self.alpha = AnimatedValue::new(0.0);
        self.state.reset();
    }

    // ------------------------------------------------------------------
    // events & input
    // ------------------------------------------------------------------

    /// Apply one timer event. Events from cancelled timers are ignored.
    pub fn handle_event(&mut self, event: HudEvent) {
        let HudEvent::TimerFired { id, at } = event;

        if let Some(spinner) = self.spinner.as_mut().filter(|s| s.owns_timer(id)) {
            spinner.tick(at);
            self.redraw();
        } else if self.dismiss_timer.as_ref().is_some_and(|t| t.id() == id) {
            self.dismiss_timer = None;
            self.state.dismiss_pending = false;
            self.begin_hide(at);
        } else if self.fade_timer.as_ref().is_some_and(|t| t.id() == id) {
            self.fade_timer = None;
            self.finish_hide();
        } else {
            trace!(?id, "ignoring stale timer event");
        }
    }

    /// Apply every queued event; returns how many were processed
    pub fn process_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            count += 1;
        }
        count
    }

    /// Wait for the next timer event
    pub async fn next_event(&mut self) -> Option<HudEvent> {
        self.events.recv().await
    }

    /// Deliver a click at `point` (surface coordinates)
    pub fn handle_click(&mut self, point: Point) -> ClickOutcome {
        if !self.is_visible() || !self.config.mask.captures_clicks() {
            return ClickOutcome::Forwarded;
        }
        if self.config.dismissible {
            debug!(x = point.x, y = point.y, "click dismisses hud");
            self.dismiss();
        }
        ClickOutcome::Consumed
    }

    // ------------------------------------------------------------------
    // layout & paint
    // ------------------------------------------------------------------

    /// Layout for the current state, or None when hidden
    pub fn layout(&self) -> Option<HudLayout> {
        let surface = self.surface?;
        let bounds = self.host.bounds(surface)?;

        let indicator = match &self.state.mode {
            HudMode::Custom(view) => Some(view.size),
            _ => Some(Size::square(self.config.spinner_diameter)),
        };
        let status = if self.state.status.is_empty() {
            Size::ZERO
        } else {
            self.host.measure_text(
                &self.state.status,
                &self.config.font,
                layout::text_max_width(&self.config, bounds.width),
            )
        };

        Some(layout::layout(&self.config, bounds, indicator, status))
    }

    /// Paint the HUD as presented at `now`
    pub fn frame_at(&self, now: Instant) -> Option<Frame> {
        let layout = self.layout()?;
        Some(paint::paint(
            &self.config,
            &layout,
            &self.state,
            self.spinner.as_ref(),
            self.alpha.value_at(now),
            now,
        ))
    }

    /// Present the current frame to the host
    pub fn redraw(&mut self) {
        if let Some(frame) = self.frame_at(Instant::now()) {
            self.host.present(&frame);
        }
    }

    /// Re-derive spinner geometry and repaint after a size or config change
    pub fn resize(&mut self) {
        let diameter = self.config.spinner_diameter;
        let color = self.config.style.foreground();
        if let Some(spinner) = self.spinner.as_mut() {
            spinner.configure(diameter, color);
        }
        self.redraw();
    }
}

impl<H: Host> Drop for Hud<H> {
    fn drop(&mut self) {
        if let Some(surface) = self.surface.take() {
            self.host.detach(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ContainerId;
    use crate::style::MaskType;
    use crate::testing::MemoryHost;
    use std::cell::Cell;
    use std::rc::Rc;

    async fn advance(hud: &mut Hud<MemoryHost>, by: Duration) {
        tokio::time::sleep(by).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        hud.process_pending();
    }

    fn hud(config: HudConfig) -> Hud<MemoryHost> {
        Hud::new(config, MemoryHost::new()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_attaches_overlay_and_fades_in() {
        let mut hud = hud(HudConfig::default());
        hud.show_status("Loading");

        assert_eq!(hud.phase(), Phase::Showing);
        assert_eq!(hud.surface(), Some(Surface::Overlay));
        assert_eq!(hud.host().attach_count(), 1);
        assert!(hud.spinner().is_some_and(|s| s.is_running()));

        let now = Instant::now();
        assert_eq!(hud.frame_at(now).unwrap().alpha, 0.0);
        let later = now + Duration::from_millis(200);
        assert_eq!(hud.frame_at(later).unwrap().alpha, 1.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_container_is_noop() {
        let config = HudConfig::default().with_container(Some(ContainerId(99)));
        let mut hud = hud(config);
        hud.show();
        assert_eq!(hud.phase(), Phase::Hidden);
        assert_eq!(hud.host().attach_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_progress_updates_in_place() {
        let mut hud = hud(HudConfig::default());
        hud.show_progress(0.1);
        advance(&mut hud, Duration::from_millis(300)).await;

        hud.show_progress(0.5);
        hud.show_progress(0.9);
        assert_eq!(hud.host().attach_count(), 1);
        assert_eq!(hud.state().progress(), Some(0.9));
        // no new fade-in: fully opaque right away
        assert_eq!(hud.frame_at(Instant::now()).unwrap().alpha, 1.0);
        assert!(hud.spinner().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_stops_when_leaving_indeterminate() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        assert!(hud.spinner().is_some());
        hud.show_progress(0.2);
        assert!(hud.spinner().is_none());
        hud.show_status("again");
        assert!(hud.spinner().is_some_and(|s| s.is_running()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_ticks_reach_host() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        let before = hud.host().frames().len();
        advance(&mut hud, Duration::from_millis(160)).await;
        assert_eq!(hud.spinner().unwrap().current(), 2);
        assert_eq!(hud.host().frames().len(), before + 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_status_hidden_is_noop() {
        let mut hud = hud(HudConfig::default());
        hud.set_status("nobody home");
        assert!(hud.state().status.is_empty());
        assert_eq!(hud.host().frames().len(), 0);

        hud.show();
        hud.set_status("now visible");
        assert_eq!(hud.state().status, "now visible");
        assert_eq!(hud.phase(), Phase::Showing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_dismiss_replaces_earlier() {
        let mut hud = hud(HudConfig::default());
        let hidden = Rc::new(Cell::new(0));
        hud.show();

        let h = hidden.clone();
        hud.dismiss_after_with(Duration::from_secs(5), move || h.set(h.get() + 1));
        let h = hidden.clone();
        hud.dismiss_after_with(Duration::from_secs(1), move || h.set(h.get() + 10));
        assert!(hud.state().dismiss_pending);

        advance(&mut hud, Duration::from_millis(1010)).await;
        assert_eq!(hud.phase(), Phase::Dismissing);

        advance(&mut hud, Duration::from_millis(250)).await;
        assert_eq!(hud.phase(), Phase::Hidden);
        assert_eq!(hidden.get(), 10);
        assert_eq!(hud.host().detach_count(), 1);

        advance(&mut hud, Duration::from_secs(5)).await;
        assert_eq!(hidden.get(), 10);
        assert_eq!(hud.host().detach_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_cancels_stale_dismiss() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        hud.dismiss_after(Duration::from_secs(1));
        hud.show_status("new operation");
        assert!(!hud.state().dismiss_pending);

        advance(&mut hud, Duration::from_secs(3)).await;
        assert_eq!(hud.phase(), Phase::Showing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_auto_dismisses() {
        let mut hud = hud(HudConfig::default());
        hud.show_success("Saved");
        assert!(hud.state().dismiss_pending);
        assert!(hud.spinner().is_none());

        advance(&mut hud, Duration::from_millis(4900)).await;
        assert_eq!(hud.phase(), Phase::Showing);
        advance(&mut hud, Duration::from_millis(200)).await;
        assert_eq!(hud.phase(), Phase::Dismissing);
        advance(&mut hud, Duration::from_millis(300)).await;
        assert_eq!(hud.phase(), Phase::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_without_animation_is_immediate() {
        let mut hud = hud(HudConfig::default().with_animations(false));
        let done = Rc::new(Cell::new(false));
        hud.show();
        let d = done.clone();
        hud.dismiss_with(move || d.set(true));
        assert_eq!(hud.phase(), Phase::Hidden);
        assert!(done.get());
        assert!(hud.spinner().is_none());
        assert!(hud.host().attached().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_while_hidden_runs_completion() {
        let mut hud = hud(HudConfig::default());
        let done = Rc::new(Cell::new(false));
        let d = done.clone();
        hud.dismiss_with(move || d.set(true));
        assert!(done.get());
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_during_fade_out_fades_back_in() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        advance(&mut hud, Duration::from_millis(200)).await;
        hud.dismiss();
        advance(&mut hud, Duration::from_millis(100)).await;
        assert_eq!(hud.phase(), Phase::Dismissing);

        hud.show_status("back");
        assert_eq!(hud.phase(), Phase::Showing);
        advance(&mut hud, Duration::from_millis(500)).await;
        assert_eq!(hud.phase(), Phase::Showing);
        assert_eq!(hud.host().attach_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_with_no_mask_passes_through() {
        let mut hud = hud(HudConfig::default().with_dismissible(true));
        hud.show();
        assert_eq!(hud.handle_click(Point::new(10.0, 10.0)), ClickOutcome::Forwarded);
        assert_eq!(hud.phase(), Phase::Showing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_with_mask_dismisses() {
        let config = HudConfig::default()
            .with_mask(MaskType::Clear)
            .with_dismissible(true);
        let mut hud = hud(config);
        hud.show();
        assert_eq!(hud.handle_click(Point::new(10.0, 10.0)), ClickOutcome::Consumed);
        assert_eq!(hud.phase(), Phase::Dismissing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_with_mask_not_dismissible() {
        let config = HudConfig::default()
            .with_mask(MaskType::Black)
            .with_dismissible(false);
        let mut hud = hud(config);
        hud.show();
        assert_eq!(hud.handle_click(Point::new(10.0, 10.0)), ClickOutcome::Consumed);
        assert_eq!(hud.phase(), Phase::Showing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_container_tears_down_first() {
        let mut host = MemoryHost::new();
        host.add_container(ContainerId(1), crate::geometry::Rect::new(0.0, 0.0, 300.0, 300.0));
        let mut hud = Hud::new(HudConfig::default(), host).unwrap();

        hud.show();
        assert_eq!(hud.surface(), Some(Surface::Overlay));

        hud.update_config(|c| c.container = Some(ContainerId(1)));
        hud.show_status("moved");
        assert_eq!(hud.surface(), Some(Surface::Container(ContainerId(1))));
        assert_eq!(hud.host().attached(), &[Surface::Container(ContainerId(1))]);
        assert_eq!(hud.host().detach_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_view_uses_its_size() {
        let mut hud = hud(HudConfig::default());
        hud.show_custom(CustomView::new(7, Size::new(120.0, 40.0)), "");
        let layout = hud.layout().unwrap();
        assert_eq!(layout.indicator.unwrap().size(), Size::new(120.0, 40.0));
        assert!(layout.status.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_reconfigures_spinner() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        hud.update_config(|c| c.spinner_diameter = 100.0);
        assert_eq!(hud.spinner().unwrap().geometry().diameter, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_follows_host_bounds() {
        let mut hud = hud(HudConfig::default());
        hud.show_status("Loading");
        let smaller = crate::geometry::Rect::new(0.0, 0.0, 640.0, 400.0);
        hud.host_mut().resize(Surface::Overlay, smaller);
        hud.resize();
        let frame = hud.host().last_frame().unwrap();
        assert_eq!(frame.bounds, smaller);
        assert_eq!(hud.layout().unwrap().hud_box.center(), smaller.center());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_after_max_duration_never_hides() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        hud.dismiss_after(Duration::MAX);
        assert!(hud.state().dismiss_pending);

        advance(&mut hud, Duration::from_secs(3600)).await;
        assert_eq!(hud.phase(), Phase::Showing);

        hud.dismiss();
        assert_eq!(hud.phase(), Phase::Dismissing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_fade_out_does_not_overflow() {
        let mut config = HudConfig::default();
        config.fade_out_secs = 1e15;
        let mut hud = hud(config);
        hud.show();
        hud.dismiss();
        assert_eq!(hud.phase(), Phase::Dismissing);

        advance(&mut hud, Duration::from_secs(60)).await;
        assert_eq!(hud.phase(), Phase::Dismissing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_tick_after_stop_is_ignored() {
        let mut hud = hud(HudConfig::default());
        hud.show();

        // let one spinner tick land in the queue without applying it
        tokio::time::sleep(Duration::from_millis(60)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        hud.show_progress(0.5);
        assert!(hud.spinner().is_none());
        let frames = hud.host().frames().len();

        assert_eq!(hud.process_pending(), 1);
        assert_eq!(hud.host().frames().len(), frames);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_dismiss_after_show_is_ignored() {
        let mut hud = hud(HudConfig::default());
        hud.show();
        hud.dismiss_after(Duration::from_secs(1));

        // the dismiss timer fires but its event is not applied yet
        tokio::time::sleep(Duration::from_millis(1010)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        hud.show_status("next operation");
        hud.process_pending();
        assert_eq!(hud.phase(), Phase::Showing);

        advance(&mut hud, Duration::from_secs(2)).await;
        assert_eq!(hud.phase(), Phase::Showing);
    }
}
