//! Track rows: keyframes drawn on a fixed-window strip, with move and trim
//! interaction routed through a [`DragController`].

use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Vec2};
use reelgen_core::{EditorConfig, Result};
use reelgen_timeline::{ClipStore, Keyframe, MediaItem, PreviewCache, Project, Track, TrackKind};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::bounds::{PixelSpan, TrackLayout};
use crate::session::{CommitOutcome, DragController, DragStart};
use crate::trim::{
    handle_rect, hit_test_clip, hit_test_trim_handle, trim_cursor, ClipVisual, TrimEdge,
};

const EMPTY_ROW_HEIGHT: f32 = 56.0;
const HEADER_HEIGHT: f32 = 18.0;
const CLIP_ROUNDING: f32 = 6.0;
const WAVEFORM_STEP: f32 = 3.0;
const WAVEFORM_BAR: f32 = 2.0;
const HANDLE_INSET: f32 = 4.0;

/// What happened in the timeline during one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineAction {
    Selected(Uuid),
    Deleted(Uuid),
    Committed(CommitOutcome),
    Failed(String),
}

/// Colour of clips on a track of `kind`.
pub fn track_color(kind: TrackKind) -> Color32 {
    match kind {
        TrackKind::Video => Color32::from_rgb(2, 132, 199),
        TrackKind::Music => Color32::from_rgb(20, 184, 166),
        TrackKind::Voiceover => Color32::from_rgb(99, 102, 241),
    }
}

/// Screen rect of a clip laid out in `row`.
pub fn clip_rect(row: Rect, span: PixelSpan) -> Rect {
    Rect::from_min_size(
        Pos2::new(span.left as f32, row.top()),
        Vec2::new(span.width as f32, row.height()),
    )
}

/// Screen rect of a clip from its in-session visual proxy.
pub fn visual_rect(row: Rect, visual: ClipVisual) -> Rect {
    let left = row.left() + (visual.left_percent / 100.0) as f32 * row.width();
    let width = (visual.width_percent / 100.0) as f32 * row.width();
    Rect::from_min_size(Pos2::new(left, row.top()), Vec2::new(width, row.height()))
}

/// The remove button in a clip's header.
pub fn delete_button_rect(clip: Rect) -> Rect {
    Rect::from_min_size(
        Pos2::new(clip.right() - HEADER_HEIGHT, clip.top()),
        Vec2::splat(HEADER_HEIGHT),
    )
}

/// Painted grip of the `edge` handle: the hit area, inset vertically.
pub fn handle_grip_rect(clip: Rect, edge: TrimEdge, handle_width: f32) -> Rect {
    let grab = handle_rect(clip, edge, handle_width);
    let inset = HANDLE_INSET.min(grab.height() / 2.0);
    Rect::from_min_max(
        Pos2::new(grab.left(), grab.top() + inset),
        Pos2::new(grab.right(), grab.bottom() - inset),
    )
}

/// Bars of an amplitude waveform stretched across `area`.
///
/// Each sample is one bar, at least two points tall, centred vertically.
pub fn waveform_bars(area: Rect, samples: &[f32]) -> Vec<Rect> {
    if samples.is_empty() {
        return Vec::new();
    }
    let x_scale = area.width() / (samples.len() as f32 * WAVEFORM_STEP);
    let max_height = area.height() * 0.8;
    samples
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let height = (v.abs() * max_height).max(2.0);
            let x = area.left() + i as f32 * WAVEFORM_STEP * x_scale;
            let y = area.center().y - height / 2.0;
            Rect::from_min_size(Pos2::new(x, y), Vec2::new(WAVEFORM_BAR * x_scale, height))
        })
        .collect()
}

/// Interactive multi-track timeline.
pub struct TimelineView {
    config: EditorConfig,
    controller: DragController,
    selected: Option<Uuid>,
}

impl TimelineView {
    pub fn new(config: EditorConfig) -> Self {
        let controller = DragController::new(&config);
        Self {
            config,
            controller,
            selected: None,
        }
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select_keyframe(&mut self, id: Uuid) {
        self.selected = Some(id);
    }

    /// Remove a keyframe and mark the project's preview stale.
    pub fn delete_keyframe<B>(&mut self, project_id: Uuid, id: Uuid, backend: &B) -> Result<()>
    where
        B: ClipStore + PreviewCache + ?Sized,
    {
        backend.delete_keyframe(id)?;
        backend.invalidate_preview(project_id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Commit any drag in progress; call when the view goes away.
    pub fn teardown<B>(&mut self, backend: &B) -> Result<Option<CommitOutcome>>
    where
        B: ClipStore + PreviewCache + ?Sized,
    {
        self.controller.teardown(backend)
    }

    /// Draw all tracks of `project` and handle pointer input.
    pub fn show<B>(
        &mut self,
        ui: &mut egui::Ui,
        project: &Project,
        backend: &B,
    ) -> Vec<TimelineAction>
    where
        B: ClipStore + PreviewCache + ?Sized,
    {
        let mut actions = Vec::new();
        for track in &project.tracks {
            self.show_track_row(ui, project, track, backend, &mut actions);
            ui.add_space(4.0);
        }

        // A release outside every row never reaches drag_stopped.
        if self.controller.active_clip().is_some() && !ui.input(|i| i.pointer.any_down()) {
            self.release(backend, &mut actions);
        }
        actions
    }

    fn show_track_row<B>(
        &mut self,
        ui: &mut egui::Ui,
        project: &Project,
        track: &Track,
        backend: &B,
        actions: &mut Vec<TimelineAction>,
    ) where
        B: ClipStore + PreviewCache + ?Sized,
    {
        let keyframes = project.keyframes_by_track(track.id);
        let height = if keyframes.is_empty() {
            EMPTY_ROW_HEIGHT
        } else {
            self.config.track_height_px
        };
        let (row, response) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), height),
            Sense::click_and_drag(),
        );
        let layout = TrackLayout::new(
            PixelSpan::new(row.left() as f64, row.width() as f64),
            self.config.scale(),
            &keyframes,
        );

        if response.drag_started() {
            if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                self.begin_drag(origin, row, project, track, &keyframes, &layout);
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Err(e) = self.controller.pointer_move(pos.x as f64, backend) {
                    warn!("Failed to persist move: {}", e);
                    actions.push(TimelineAction::Failed(e.to_string()));
                }
            }
        }
        if response.drag_stopped() {
            self.release(backend, actions);
        }

        // Second and later clicks of a multi-click do not select.
        if response.clicked() && !response.double_clicked() && !response.triple_clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.click(pos, row, project, &layout, backend, actions);
            }
        }

        if self.controller.active_clip().is_none() {
            if let Some(hover) = response.hover_pos() {
                let edge = layout.clips().iter().find_map(|(_, span)| {
                    hit_test_trim_handle(clip_rect(row, *span), hover, self.config.handle_width_px)
                });
                if let Some(edge) = edge {
                    ui.ctx().set_cursor_icon(trim_cursor(edge));
                }
            }
        }

        let painter = ui.painter_at(row);
        painter.rect_filled(row, Rounding::same(4.0), Color32::from_gray(24));
        let current = self.controller.current();
        for &keyframe in &keyframes {
            let Some(media) = project.media_for(keyframe) else {
                continue;
            };
            let rect = match current {
                Some((id, step)) if id == keyframe.id => visual_rect(row, step.visual),
                _ => match layout.span(keyframe.id) {
                    Some(span) => clip_rect(row, span),
                    None => continue,
                },
            };
            self.paint_clip(
                &painter,
                rect,
                track,
                media,
                self.selected == Some(keyframe.id),
            );
        }
    }

    fn begin_drag(
        &mut self,
        origin: Pos2,
        row: Rect,
        project: &Project,
        track: &Track,
        keyframes: &[&Keyframe],
        layout: &TrackLayout,
    ) {
        for &keyframe in keyframes {
            let Some(span) = layout.span(keyframe.id) else {
                continue;
            };
            let rect = clip_rect(row, span);
            let Some(target) = hit_test_clip(rect, origin, self.config.handle_width_px) else {
                continue;
            };
            if delete_button_rect(rect).contains(origin) {
                return;
            }
            let (Some(media), Some(element)) =
                (project.media_for(keyframe), layout.element(keyframe.id))
            else {
                return;
            };
            let start = DragStart {
                target,
                keyframe,
                project_id: track.project_id,
                source_duration: media.resolve_duration(self.config.default_source_duration_ms),
                element: &element,
                pointer_x: origin.x as f64,
            };
            if let Err(e) = self.controller.pointer_down(start) {
                debug!("No drag on {}: {}", keyframe.id, e);
            }
            return;
        }
    }

    fn click<B>(
        &mut self,
        pos: Pos2,
        row: Rect,
        project: &Project,
        layout: &TrackLayout,
        backend: &B,
        actions: &mut Vec<TimelineAction>,
    ) where
        B: ClipStore + PreviewCache + ?Sized,
    {
        let Some((id, rect)) = layout
            .clips()
            .iter()
            .map(|(id, span)| (*id, clip_rect(row, *span)))
            .find(|(_, rect)| rect.contains(pos))
        else {
            return;
        };

        if delete_button_rect(rect).contains(pos) {
            match self.delete_keyframe(project.id, id, backend) {
                Ok(()) => actions.push(TimelineAction::Deleted(id)),
                Err(e) => {
                    warn!("Failed to delete keyframe {}: {}", id, e);
                    actions.push(TimelineAction::Failed(e.to_string()));
                }
            }
        } else {
            self.select_keyframe(id);
            actions.push(TimelineAction::Selected(id));
        }
    }

    fn release<B>(&mut self, backend: &B, actions: &mut Vec<TimelineAction>)
    where
        B: ClipStore + PreviewCache + ?Sized,
    {
        match self.controller.pointer_up(backend) {
            Ok(Some(outcome)) => actions.push(TimelineAction::Committed(outcome)),
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to commit drag: {}", e);
                actions.push(TimelineAction::Failed(e.to_string()));
            }
        }
    }

    fn paint_clip(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        track: &Track,
        media: &MediaItem,
        selected: bool,
    ) {
        let rounding = Rounding::same(CLIP_ROUNDING);
        painter.rect_filled(rect, rounding, track_color(track.kind));
        let border = if selected {
            Stroke::new(2.0, Color32::WHITE)
        } else {
            Stroke::new(1.0, Color32::from_white_alpha(25))
        };
        painter.rect_stroke(rect, rounding, border);

        let header = Rect::from_min_size(rect.min, Vec2::new(rect.width(), HEADER_HEIGHT));
        painter.rect_filled(header, rounding, Color32::from_black_alpha(25));
        if header.width() > 2.0 * HEADER_HEIGHT {
            painter.text(
                header.left_center() + Vec2::new(4.0, 0.0),
                Align2::LEFT_CENTER,
                media.label(),
                FontId::proportional(12.0),
                Color32::from_white_alpha(153),
            );
        }
        painter.text(
            delete_button_rect(rect).center(),
            Align2::CENTER_CENTER,
            "\u{00D7}",
            FontId::proportional(12.0),
            Color32::WHITE,
        );

        let body = Rect::from_min_max(Pos2::new(rect.left(), header.bottom()), rect.max);
        if media.kind.is_audio() {
            if let Some(samples) = &media.waveform {
                for bar in waveform_bars(body, samples) {
                    painter.rect_filled(bar, Rounding::same(1.0), Color32::from_black_alpha(102));
                }
            }
        }

        for edge in [TrimEdge::Left, TrimEdge::Right] {
            let grip = handle_grip_rect(rect, edge, self.config.handle_width_px);
            painter.rect_filled(grip, Rounding::same(3.0), Color32::from_black_alpha(51));
        }
    }
}
