use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use eframe::egui::{self, Align2, Color32, RichText};

/// How long a toast stays on screen while the pointer is elsewhere.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl NoticeKind {
    fn icon(self) -> &'static str {
        match self {
            NoticeKind::Success => "✔",
            NoticeKind::Error => "✖",
            NoticeKind::Info => "ℹ",
        }
    }

    fn color(self) -> Color32 {
        match self {
            NoticeKind::Success => Color32::from_rgb(110, 200, 120),
            NoticeKind::Error => Color32::LIGHT_RED,
            NoticeKind::Info => Color32::LIGHT_BLUE,
        }
    }
}

/// Sink for transient, purely informational user feedback.
pub trait Notifier {
    fn show(&self, kind: NoticeKind, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    pub remaining: Duration,
}

#[derive(Default)]
struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
    last_frame: Option<Instant>,
}

/// Top-right toast stack. Clones share the same queue, so the handle given to
/// a controller and the one the app renders from see the same toasts.
#[derive(Clone, Default)]
pub struct Toasts {
    inner: Rc<RefCell<ToastQueue>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.inner.borrow().items.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    pub fn dismiss(&self, id: u64) {
        self.inner.borrow_mut().items.retain(|toast| toast.id != id);
    }

    /// Counts `elapsed` down on every toast except the hovered one and drops
    /// the ones that ran out.
    pub fn tick(&self, elapsed: Duration, hovered: Option<u64>) {
        let mut queue = self.inner.borrow_mut();
        for toast in queue.items.iter_mut() {
            if Some(toast.id) != hovered {
                toast.remaining = toast.remaining.saturating_sub(elapsed);
            }
        }
        queue.items.retain(|toast| !toast.remaining.is_zero());
    }

    /// Counts down by the wall time since the previous call, so sparse
    /// frames do not stretch a toast's lifetime. The first call after the
    /// queue was empty counts as zero.
    pub fn advance(&self, now: Instant, hovered: Option<u64>) {
        let elapsed = {
            let mut queue = self.inner.borrow_mut();
            let elapsed = queue
                .last_frame
                .map_or(Duration::ZERO, |prev| now.saturating_duration_since(prev));
            queue.last_frame = Some(now);
            elapsed
        };
        self.tick(elapsed, hovered);

        let mut queue = self.inner.borrow_mut();
        if queue.items.is_empty() {
            queue.last_frame = None;
        }
    }

    pub fn render(&self, ctx: &egui::Context) {
        let toasts = self.snapshot();
        if toasts.is_empty() {
            return;
        }

        let mut hovered = None;
        let mut dismissed = None;
        let mut offset = 12.0;

        for toast in &toasts {
            let shown = egui::Area::new(egui::Id::new(("toast", toast.id)))
                .order(egui::Order::Foreground)
                .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, offset))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .show(ui, |ui| {
                            ui.set_width(280.0);
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(toast.kind.icon())
                                        .color(toast.kind.color())
                                        .strong(),
                                );
                                ui.label(&toast.message);
                                if ui.small_button("×").clicked() {
                                    dismissed = Some(toast.id);
                                }
                            });
                            let fraction =
                                toast.remaining.as_secs_f32() / TOAST_DURATION.as_secs_f32();
                            ui.add(egui::ProgressBar::new(fraction).desired_height(3.0));
                        });
                    ui.ui_contains_pointer()
                });
            if shown.inner {
                hovered = Some(toast.id);
            }
            offset += shown.response.rect.height() + 6.0;
        }

        if let Some(id) = dismissed {
            self.dismiss(id);
        }
        self.advance(Instant::now(), hovered);
        ctx.request_repaint_after(Duration::from_millis(50));
    }
}

impl Notifier for Toasts {
    fn show(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Error => log::warn!("notice: {message}"),
            _ => log::info!("notice: {message}"),
        }
        let mut queue = self.inner.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        queue.items.push(Toast {
            id,
            kind,
            message: message.to_string(),
            remaining: TOAST_DURATION,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_expires_after_three_seconds() {
        let toasts = Toasts::new();
        toasts.show(NoticeKind::Success, "Post Submitted Successfully");

        toasts.tick(Duration::from_millis(2999), None);
        assert_eq!(toasts.snapshot().len(), 1);

        toasts.tick(Duration::from_millis(1), None);
        assert!(toasts.is_empty());
    }

    #[test]
    fn hovering_pauses_the_countdown() {
        let toasts = Toasts::new();
        toasts.show(NoticeKind::Error, "first");
        toasts.show(NoticeKind::Error, "second");
        let first = toasts.snapshot()[0].id;

        toasts.tick(Duration::from_secs(5), Some(first));

        let left = toasts.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].message, "first");
        assert_eq!(left[0].remaining, TOAST_DURATION);
    }

    #[test]
    fn lifetime_follows_wall_time_not_frame_count() {
        let toasts = Toasts::new();
        toasts.show(NoticeKind::Info, "sparse frames");
        let start = Instant::now();

        toasts.advance(start, None);
        toasts.advance(start + Duration::from_millis(2500), None);
        assert_eq!(toasts.snapshot().len(), 1);

        toasts.advance(start + Duration::from_secs(10), None);
        assert!(toasts.is_empty());
    }

    #[test]
    fn idle_gap_does_not_count_against_a_new_toast() {
        let toasts = Toasts::new();
        let start = Instant::now();
        toasts.show(NoticeKind::Info, "first");
        toasts.advance(start, None);
        toasts.advance(start + TOAST_DURATION, None);
        assert!(toasts.is_empty());

        toasts.show(NoticeKind::Success, "second");
        let later = start + Duration::from_secs(60);
        toasts.advance(later, None);
        toasts.advance(later + Duration::from_secs(2), None);

        let left = toasts.snapshot();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].remaining, Duration::from_secs(1));
    }

    #[test]
    fn clones_share_the_queue() {
        let toasts = Toasts::new();
        let handle = toasts.clone();
        handle.show(NoticeKind::Info, "hello");
        assert_eq!(toasts.snapshot()[0].message, "hello");

        toasts.dismiss(toasts.snapshot()[0].id);
        assert!(handle.is_empty());
    }
}
