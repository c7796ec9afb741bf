//! Reusable pool of note quads
//!
//! One drawable quad per note, kept across data updates so a new note set
//! only allocates for the delta. Quad geometry lives in zoomed content
//! space (pan excluded): a pan only changes the translation applied at
//! draw time, while a rebuild — triggered by the dirty flag — recomputes
//! positions, sizes, and colors for every quad.

use iced::Color;

use gliss_core::Note;

use super::scale::ScaleSet;
use super::viewport::Viewport;

/// Minimum quad extent in pixels
///
/// Zero or negative note durations and sub-pixel rows still draw
/// something visible.
pub const MIN_QUAD_SIZE: f32 = 1.0;

/// Vertical inset of a quad inside its semitone row, per side
const ROW_INSET: f32 = 0.5;

/// One drawable note rectangle in zoomed content space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteQuad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

impl Default for NoteQuad {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: MIN_QUAD_SIZE,
            height: MIN_QUAD_SIZE,
            color: Color::TRANSPARENT,
        }
    }
}

/// Arena of note quads, reconciled to the current note count
#[derive(Debug, Default)]
pub struct NotePool {
    quads: Vec<NoteQuad>,
}

impl NotePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn quads(&self) -> &[NoteQuad] {
        &self.quads
    }

    /// Resize the arena to `count` entries in O(Δcount)
    ///
    /// Growth appends default quads (overwritten by the next rebuild);
    /// shrink drops the surplus tail. Entries below the boundary are
    /// untouched.
    pub fn reconcile(&mut self, count: usize) {
        if count < self.quads.len() {
            self.quads.truncate(count);
        } else if count > self.quads.len() {
            self.quads.resize(count, NoteQuad::default());
        }
    }

    /// Recompute every quad's geometry and color
    ///
    /// Runs only when the dirty flag is set (notes, zoom, or canvas size
    /// changed); panning alone never lands here.
    pub fn rebuild(
        &mut self,
        notes: &[Note],
        scales: &ScaleSet,
        viewport: &Viewport,
        color_of: impl Fn(&Note) -> Color,
    ) {
        self.reconcile(notes.len());

        let zoom_x = viewport.zoom_x as f64;
        let pps = scales.time.px_per_second * zoom_x;
        let row_height = scales.pitch.row_height() * viewport.zoom_y;
        let mid = scales.pitch.mid();

        for (quad, note) in self.quads.iter_mut().zip(notes) {
            let x = (scales.time.apply(note.time) * zoom_x) as f32;
            let width = ((note.duration.max(0.0) * pps) as f32).max(MIN_QUAD_SIZE);

            let content_y = scales.pitch.apply(note.pitch);
            let y = (content_y - mid) * viewport.zoom_y + mid + ROW_INSET;
            let height = (row_height - ROW_INSET * 2.0).max(MIN_QUAD_SIZE);

            *quad = NoteQuad {
                x,
                y,
                width,
                height,
                color: color_of(note),
            };
        }
    }

    /// Drop every pooled quad (engine teardown)
    pub fn clear(&mut self) {
        self.quads.clear();
        self.quads.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::scale::compute_scales;

    fn notes(n: usize) -> Vec<Note> {
        (0..n)
            .map(|i| Note::new(i as f64 * 0.5, 0.4, 60 + (i % 12) as i32, 0.8, 0))
            .collect()
    }

    #[test]
    fn test_reconcile_grows_and_shrinks() {
        let mut pool = NotePool::new();
        pool.reconcile(5);
        assert_eq!(pool.len(), 5);
        pool.reconcile(2);
        assert_eq!(pool.len(), 2);
        pool.reconcile(2);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_rebuild_matches_note_count() {
        let notes = notes(7);
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        let viewport = Viewport::default();
        let mut pool = NotePool::new();
        pool.rebuild(&notes, &scales, &viewport, |_| Color::WHITE);
        assert_eq!(pool.len(), 7);

        let fewer = self::notes(3);
        pool.rebuild(&fewer, &scales, &viewport, |_| Color::WHITE);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_quad_width_scales_with_zoom() {
        let notes = notes(1);
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        let mut viewport = Viewport::default();
        let mut pool = NotePool::new();

        pool.rebuild(&notes, &scales, &viewport, |_| Color::WHITE);
        let base_width = pool.quads()[0].width;

        viewport.zoom_x = 2.0;
        pool.rebuild(&notes, &scales, &viewport, |_| Color::WHITE);
        assert!((pool.quads()[0].width - base_width * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_duration_floors_to_min_size() {
        let notes = vec![
            Note::new(1.0, 0.0, 60, 0.5, 0),
            Note::new(2.0, -3.0, 61, 0.5, 0),
        ];
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        let mut pool = NotePool::new();
        pool.rebuild(&notes, &scales, &Viewport::default(), |_| Color::WHITE);
        for quad in pool.quads() {
            assert!(quad.width >= MIN_QUAD_SIZE);
            assert!(quad.height >= MIN_QUAD_SIZE);
        }
    }

    #[test]
    fn test_pan_does_not_affect_quads() {
        let notes = notes(4);
        let scales = compute_scales(&notes, 800.0, 600.0, true, None);
        let mut viewport = Viewport::default();
        let mut pool = NotePool::new();
        pool.rebuild(&notes, &scales, &viewport, |_| Color::WHITE);
        let snapshot: Vec<_> = pool.quads().to_vec();

        viewport.pan_x = -250.0;
        viewport.pan_y = 30.0;
        pool.rebuild(&notes, &scales, &viewport, |_| Color::WHITE);
        assert_eq!(pool.quads(), snapshot.as_slice());
    }

    #[test]
    fn test_clear_releases_capacity() {
        let mut pool = NotePool::new();
        pool.reconcile(100);
        pool.clear();
        assert!(pool.is_empty());
    }
}
