use std::fmt::Write as _;

use glam::Mat4;

use crate::pipeline::{FaceDraw, FaceKind};

/// Backend-agnostic sink for face draws. All renderers implement this trait.
///
/// A frame is `begin_frame`, any number of `draw_face` calls, then
/// `end_frame`. Renderers never mutate tiles or the camera.
pub trait FaceRenderer {
    /// Start a frame with the given projection.
    fn begin_frame(&mut self, projection: &Mat4);

    /// Queue one face quad.
    fn draw_face(&mut self, draw: &FaceDraw);

    /// Finish the frame. Backends that submit eagerly can ignore this.
    fn end_frame(&mut self) {}
}

/// Everything submitted between one `begin_frame` and the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub projection: Mat4,
    pub draws: Vec<FaceDraw>,
}

/// Headless renderer that keeps every submitted frame.
///
/// Used by the CLI and by tests to inspect draw order and transforms
/// without a GPU.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    frames: Vec<RecordedFrame>,
    ended: usize,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Number of frames that saw `end_frame`.
    pub fn completed_frames(&self) -> usize {
        self.ended
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.ended = 0;
    }

    /// Human-readable dump of the most recent frame.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let Some(frame) = self.last_frame() else {
            out.push_str("=== No frames recorded ===\n");
            return out;
        };
        let _ = writeln!(
            out,
            "=== Frame {} ({} draws) ===",
            self.frames.len(),
            frame.draws.len()
        );
        for (i, draw) in frame.draws.iter().enumerate() {
            let origin = draw.model_view.w_axis;
            let face = match draw.face {
                FaceKind::Front => "front".to_string(),
                FaceKind::Side(n) => format!("side{n}"),
                FaceKind::Back => "back".to_string(),
            };
            let _ = writeln!(
                out,
                "  [{i:3}] {face:<6} {:?} origin=({:.2}, {:.2}, {:.2}) uv=({:.1}, {:.1})-({:.1}, {:.1})",
                draw.texture,
                origin.x,
                origin.y,
                origin.z,
                draw.uv.min.x,
                draw.uv.min.y,
                draw.uv.max.x,
                draw.uv.max.y,
            );
        }
        out
    }
}

impl FaceRenderer for DrawRecorder {
    fn begin_frame(&mut self, projection: &Mat4) {
        self.frames.push(RecordedFrame {
            projection: *projection,
            draws: Vec::new(),
        });
    }

    fn draw_face(&mut self, draw: &FaceDraw) {
        match self.frames.last_mut() {
            Some(frame) => frame.draws.push(*draw),
            None => tracing::warn!("face drawn outside a frame; dropped"),
        }
    }

    fn end_frame(&mut self) {
        self.ended += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FaceTexture, UvRect};

    fn front(model_view: Mat4) -> FaceDraw {
        FaceDraw {
            face: FaceKind::Front,
            texture: FaceTexture::Atlas,
            model_view,
            uv: UvRect::FULL,
        }
    }

    #[test]
    fn empty_recorder_describes_nothing() {
        let recorder = DrawRecorder::new();
        assert!(recorder.last_frame().is_none());
        assert!(recorder.describe().contains("No frames"));
    }

    #[test]
    fn frames_are_kept_separately() {
        let mut recorder = DrawRecorder::new();
        recorder.begin_frame(&Mat4::IDENTITY);
        recorder.draw_face(&front(Mat4::IDENTITY));
        recorder.end_frame();
        recorder.begin_frame(&Mat4::ZERO);
        recorder.end_frame();

        assert_eq!(recorder.frames().len(), 2);
        assert_eq!(recorder.completed_frames(), 2);
        assert_eq!(recorder.frames()[0].draws.len(), 1);
        assert!(recorder.last_frame().unwrap().draws.is_empty());
        assert_eq!(recorder.last_frame().unwrap().projection, Mat4::ZERO);
    }

    #[test]
    fn draws_outside_a_frame_are_dropped() {
        let mut recorder = DrawRecorder::new();
        recorder.draw_face(&front(Mat4::IDENTITY));
        assert!(recorder.frames().is_empty());
    }

    #[test]
    fn describe_lists_each_draw() {
        let mut recorder = DrawRecorder::new();
        recorder.begin_frame(&Mat4::IDENTITY);
        recorder.draw_face(&front(Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0))));
        let text = recorder.describe();
        assert!(text.contains("1 draws"));
        assert!(text.contains("front"));
        assert!(text.contains("origin=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn clear_resets() {
        let mut recorder = DrawRecorder::new();
        recorder.begin_frame(&Mat4::IDENTITY);
        recorder.end_frame();
        recorder.clear();
        assert!(recorder.frames().is_empty());
        assert_eq!(recorder.completed_frames(), 0);
    }
}
