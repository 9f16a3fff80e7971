use crate::state::CaptureStatus;
use eframe::egui;

pub const CANVAS_BG: egui::Color32 = egui::Color32::BLACK;
pub const BAR_FILL: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);
pub const HINT_TEXT: egui::Color32 = egui::Color32::from_rgb(90, 90, 90);

pub fn setup_global_style(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    //
    // The whole window is one black canvas.
    //
    style.visuals.panel_fill = CANVAS_BG;
    style.visuals.window_fill = CANVAS_BG;
    style.visuals.widgets.noninteractive.rounding = egui::Rounding::ZERO;

    ctx.set_style(style);
}

/// Overlays the capture state when there is nothing to show.
pub fn draw_status(painter: &egui::Painter, rect: egui::Rect, status: &CaptureStatus) {
    let (text, color, size) = match status {
        CaptureStatus::Failed(reason) => (
            format!("NO AUDIO\n{}", reason),
            egui::Color32::RED,
            16.0,
        ),
        CaptureStatus::Starting => ("waiting for audio...".to_string(), HINT_TEXT, 12.0),
        CaptureStatus::Running { device } => {
            //
            // Small device label in the corner.
            //
            painter.text(
                rect.left_top() + egui::vec2(6.0, 4.0),
                egui::Align2::LEFT_TOP,
                device,
                egui::FontId::proportional(10.0),
                HINT_TEXT,
            );
            return;
        }
        CaptureStatus::Stopped => return,
    };

    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(size),
        color,
    );
}
