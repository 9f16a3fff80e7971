pub mod bars;
pub mod input;
pub mod theme;
pub mod timer;

use crate::audio::capture::CaptureHandle;
use crate::config::{NUM_BARS, RENDER_TICK, SHUTDOWN_GRACE};
use crate::state::AppState;
use bars::BarLayout;
use eframe::egui;
use input::ViewState;
use std::sync::Arc;
use std::time::Instant;
use timer::Interval;

pub struct VisualizerApp {
    //
    // Shared with the capture thread.
    //
    state: Arc<AppState>,
    capture: Option<CaptureHandle>,

    //
    // UI-owned view state and bar geometry.
    //
    view: ViewState,
    layout: Option<BarLayout>,
    canvas_size: egui::Vec2,

    render_tick: Interval,
}

impl VisualizerApp {
    pub fn new(
        _cc: &eframe::CreationContext,
        state: Arc<AppState>,
        capture: Option<CaptureHandle>,
    ) -> Self {
        Self {
            state,
            capture,
            view: ViewState::new(),
            layout: None,
            canvas_size: egui::Vec2::ZERO,
            render_tick: Interval::new(RENDER_TICK, Instant::now()),
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let (wheel, f11, escape, close_requested) = ctx.input(|i| {
            let wheel: Vec<f32> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::MouseWheel { delta, .. } => Some(delta.y),
                    _ => None,
                })
                .collect();
            (
                wheel,
                i.key_pressed(egui::Key::F11),
                i.key_pressed(egui::Key::Escape),
                i.viewport().close_requested(),
            )
        });

        if self.view.scroll_all(wheel) > 0 {
            log::debug!("Sensitivity: {:.3}", self.view.sensitivity());
        }

        if f11 {
            self.view.toggle_fullscreen();
        } else if escape {
            self.view.end_fullscreen();
        }
        if f11 || escape {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.view.fullscreen()));
        }

        if close_requested {
            self.shutdown();
        }
    }

    /// Stops capture and waits out the grace period; the window closes after.
    fn shutdown(&mut self) {
        if self.render_tick.is_cancelled() {
            return;
        }
        log::info!("Window closing, stopping audio capture...");
        self.render_tick.cancel();

        match self.capture.take() {
            Some(mut capture) => {
                if capture.shutdown(SHUTDOWN_GRACE) {
                    log::info!("Capture thread joined");
                }
            }
            None => self.state.stop(),
        }
    }

    fn paint(&mut self, ui: &mut egui::Ui) {
        let rect = ui.max_rect();

        //
        // Rebuild collapsed bars whenever the canvas changes size.
        //
        if self.layout.is_none() || rect.size() != self.canvas_size {
            self.canvas_size = rect.size();
            self.layout = Some(BarLayout::new(rect.width(), rect.height(), NUM_BARS));
        }
        let Some(layout) = self.layout.as_mut() else {
            return;
        };

        if self.render_tick.tick(Instant::now()) {
            layout.apply(&self.state.spectrum(), rect.height(), self.view.sensitivity());
        }

        let painter = ui.painter();
        for bar in layout.bars().iter().filter(|b| b.height() > 0.0) {
            let bar_rect = egui::Rect::from_min_max(
                egui::pos2(rect.min.x + bar.x0, rect.min.y + bar.top),
                egui::pos2(rect.min.x + bar.x1, rect.min.y + bar.bottom),
            );
            painter.rect_filled(bar_rect, 0.0, theme::BAR_FILL);
        }

        theme::draw_status(painter, rect, &self.state.status());
    }
}

impl eframe::App for VisualizerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        //
        // The render tick ends for good once the app stops running.
        //
        if !self.state.is_running() {
            self.render_tick.cancel();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::CANVAS_BG))
            .show(ctx, |ui| self.paint(ui));

        if let Some(wait) = self.render_tick.remaining(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
