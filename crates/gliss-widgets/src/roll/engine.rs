//! The piano-roll engine facade
//!
//! One `PianoRoll` instance per mounted view. It is the sole owner of the
//! viewport state, the scale cache, the note-quad pool, and the overlay
//! data; host controls and the interaction layer mutate it only through
//! the methods here. That method-only discipline is what keeps renders
//! from ever observing a half-applied update.
//!
//! Data flow: hosts push notes/control-changes/loop/time in, interaction
//! commands arrive through [`PianoRoll::apply`], and the canvas reads the
//! pooled geometry plus a per-frame [`Transform`] snapshot back out.

use std::time::Instant;

use iced::{Color, Point};

use gliss_core::{
    content_end_time, derive_sustain_segments, ControlChangeEvent, FileInfo, LoopWindow, Note,
    OverlapInterval, SustainSegment, WaveformSampler,
};

use crate::theme::{self, RollConfig};

use super::interaction::RollCommand;
use super::pool::NotePool;
use super::scale::{compute_scales, ScaleSet, ViewMetrics, GUTTER_WIDTH};
use super::scheduler::FrameScheduler;
use super::transform::Transform;
use super::viewport::Viewport;

/// Handle returned by `on_time_change`, for unregistering
pub type SubscriptionId = u64;

/// Caller-supplied per-note color override
///
/// Takes priority over segment tags, file colors, and the global note
/// color. Returning `None` falls through to the defaults.
pub type NoteColorFn = Box<dyn Fn(&Note) -> Option<Color>>;

/// Read-only snapshot of engine state, for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollState {
    pub zoom_x: f32,
    pub zoom_y: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub current_time: f64,
    pub panning: bool,
    pub geometry_dirty: bool,
    pub note_count: usize,
    pub max_time: f64,
    pub px_per_second: f64,
}

/// The viewport/rendering engine for one piano-roll view
pub struct PianoRoll {
    config: RollConfig,
    width: f32,
    height: f32,
    gutter: bool,
    scales: ScaleSet,
    viewport: Viewport,

    notes: Vec<Note>,
    control_changes: Vec<ControlChangeEvent>,
    sustain: Vec<SustainSegment>,
    overlaps: Vec<OverlapInterval>,
    loop_window: LoopWindow,
    files: Vec<FileInfo>,
    color_override: Option<NoteColorFn>,
    waveform_sampler: Option<Box<dyn WaveformSampler>>,

    pool: NotePool,
    geometry_dirty: bool,
    scheduler: FrameScheduler,

    subscribers: Vec<(SubscriptionId, Box<dyn Fn(f64)>)>,
    next_subscription: SubscriptionId,
}

impl PianoRoll {
    /// Create an engine bound to a canvas of the given size
    ///
    /// `gutter` reserves the piano-key label strip on the left; the time
    /// origin sits at its right edge.
    pub fn new(width: f32, height: f32, gutter: bool) -> Self {
        Self::with_config(width, height, gutter, RollConfig::default())
    }

    pub fn with_config(width: f32, height: f32, gutter: bool, config: RollConfig) -> Self {
        let scales = compute_scales(&[], width, height, gutter, None);
        Self {
            config,
            width,
            height,
            gutter,
            scales,
            viewport: Viewport::default(),
            notes: Vec::new(),
            control_changes: Vec::new(),
            sustain: Vec::new(),
            overlaps: Vec::new(),
            loop_window: LoopWindow::default(),
            files: Vec::new(),
            color_override: None,
            waveform_sampler: None,
            pool: NotePool::new(),
            geometry_dirty: false,
            scheduler: FrameScheduler::default(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // =========================================================================
    // Data Surface
    // =========================================================================

    /// Replace the note set
    ///
    /// The cached pixels-per-second ratio survives this, so content that
    /// extends the time domain does not rescale what is already visible.
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.scales = compute_scales(
            &self.notes,
            self.width,
            self.height,
            self.gutter,
            Some(self.scales.time.px_per_second),
        );
        self.rederive_sustain();
        self.geometry_dirty = true;
        self.pool.reconcile(self.notes.len());
        // Keep the current time under the playhead against the new domain
        let metrics = self.metrics();
        self.viewport.set_time(self.viewport.current_time, &metrics);
        log::debug!("set_notes: {} notes, max_time={:.2}s", self.notes.len(), self.scales.time.max_time);
    }

    /// Replace the control-change stream (sustain overlay input)
    pub fn set_control_changes(&mut self, events: Vec<ControlChangeEvent>) {
        self.control_changes = events;
        self.rederive_sustain();
        self.geometry_dirty = true;
    }

    /// Replace the overlap intervals (comparison mode bands)
    pub fn set_overlap_regions(&mut self, intervals: Vec<OverlapInterval>) {
        self.overlaps = intervals;
    }

    /// Per-file display metadata, used for default note coloring
    pub fn set_files(&mut self, files: Vec<FileInfo>) {
        self.files = files;
        self.geometry_dirty = true;
    }

    /// Install or clear the per-note color override
    pub fn set_color_override(&mut self, f: Option<NoteColorFn>) {
        self.color_override = f;
        self.geometry_dirty = true;
    }

    /// Attach the auxiliary waveform sampler (cosmetic strip)
    pub fn set_waveform_sampler(&mut self, sampler: Option<Box<dyn WaveformSampler>>) {
        self.waveform_sampler = sampler;
    }

    /// Playback tick from the host's clock
    ///
    /// Not a user gesture: keeps the playhead aligned unless a drag owns
    /// the pan, and never notifies time subscribers (the host already
    /// knows its own clock).
    pub fn set_time(&mut self, seconds: f64) {
        let metrics = self.metrics();
        self.viewport.set_time(seconds, &metrics);
    }

    /// Set the loop window; reversed endpoints are normalized here
    pub fn set_loop_window(&mut self, start: Option<f64>, end: Option<f64>) {
        self.loop_window = LoopWindow::new(start, end);
    }

    // =========================================================================
    // View Surface
    // =========================================================================

    /// Zoom the time axis around an anchor pixel (default: the playhead)
    pub fn zoom_x(&mut self, factor: f32, anchor: Option<f32>) {
        let metrics = self.metrics();
        if self.viewport.zoom_x_by(factor, anchor, &metrics) {
            self.geometry_dirty = true;
            self.sync_time_and_notify();
        }
    }

    /// Zoom the pitch axis around the band midpoint
    pub fn zoom_y(&mut self, factor: f32) {
        let metrics = self.metrics();
        if self.viewport.zoom_y_by(factor, &metrics) {
            self.geometry_dirty = true;
        }
    }

    /// Pan by a pixel delta
    ///
    /// During a pointer drag this only tracks the time under the playhead;
    /// the commit to subscribers happens once, on release. A pan outside a
    /// drag (wheel, host buttons) commits immediately.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let metrics = self.metrics();
        self.viewport.pan_by(dx, dy, &metrics);
        if self.viewport.panning {
            self.viewport.current_time = self.viewport.time_at_playhead(&metrics);
        } else if dx != 0.0 {
            self.sync_time_and_notify();
        }
    }

    /// Back to zoom 1/1 with the current time still under the playhead
    pub fn reset_view(&mut self) {
        let metrics = self.metrics();
        self.viewport.reset_view(&metrics);
        self.geometry_dirty = true;
    }

    /// Canvas size changed
    ///
    /// Invalidates the pixels-per-second cache (it derives from the
    /// width) and re-anchors the current time under the playhead.
    pub fn resize(&mut self, width: f32, height: Option<f32>) {
        self.width = width;
        if let Some(height) = height {
            self.height = height;
        }
        self.scales = compute_scales(&self.notes, self.width, self.height, self.gutter, None);
        self.geometry_dirty = true;
        let metrics = self.metrics();
        self.viewport.set_time(self.viewport.current_time, &metrics);
        log::debug!("resize: {}x{}, px/s={:.2}", self.width, self.height, self.scales.time.px_per_second);
    }

    /// Route an interaction command through the public surface
    pub fn apply(&mut self, command: RollCommand) {
        match command {
            RollCommand::BeginPan { position } => {
                self.viewport.panning = true;
                self.viewport.last_pointer = Some(Point::new(position.0, position.1));
            }
            RollCommand::PanBy { dx, dy } => self.pan(dx, dy),
            RollCommand::EndPan { moved } => {
                self.viewport.panning = false;
                self.viewport.last_pointer = None;
                // A click with no movement is not a seek
                if moved {
                    self.sync_time_and_notify();
                }
            }
            RollCommand::ZoomX { factor, anchor } => self.zoom_x(factor, anchor),
            RollCommand::ZoomY { factor } => self.zoom_y(factor),
        }
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener for user-driven time changes
    ///
    /// Invoked when panning or zooming moves the time under the fixed
    /// playhead; the host uses it to seek its playback engine, closing
    /// the scrub-to-audio loop.
    pub fn on_time_change(&mut self, callback: impl Fn(f64) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Unregister a time-change listener
    pub fn off_time_change(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    fn sync_time_and_notify(&mut self) {
        let metrics = self.metrics();
        let time = self.viewport.time_at_playhead(&metrics);
        self.viewport.current_time = time;
        for (_, callback) in &self.subscribers {
            callback(time);
        }
    }

    // =========================================================================
    // Render Pipeline
    // =========================================================================

    /// Rebuild note geometry if the dirty flag is set
    ///
    /// Called once per rendered frame, before the canvas draws. Returns
    /// true when a rebuild ran; panning-only frames return false and the
    /// pooled quads are reused untouched.
    pub fn prepare_frame(&mut self) -> bool {
        if !self.geometry_dirty {
            return false;
        }
        let Self {
            pool,
            notes,
            scales,
            viewport,
            config,
            files,
            color_override,
            ..
        } = self;
        pool.rebuild(notes, scales, viewport, |note| {
            resolve_note_color(config, files, color_override.as_deref(), note)
        });
        self.geometry_dirty = false;
        true
    }

    /// Ask the scheduler whether to draw now; defers (and later drains via
    /// [`PianoRoll::poll_render`]) when inside the frame budget
    pub fn request_render(&mut self, now: Instant) -> bool {
        self.scheduler.request(now)
    }

    /// Drain a deferred render once the frame budget reopens
    pub fn poll_render(&mut self, now: Instant) -> bool {
        self.scheduler.poll(now)
    }

    // =========================================================================
    // Read Surface (canvas + diagnostics)
    // =========================================================================

    /// Coordinate transform snapshot for the current frame
    pub fn transform(&self) -> Transform {
        Transform::new(&self.scales, &self.viewport, self.gutter_width())
    }

    pub fn metrics(&self) -> ViewMetrics {
        self.scales.metrics(self.gutter_width())
    }

    pub fn gutter_width(&self) -> f32 {
        if self.gutter {
            GUTTER_WIDTH
        } else {
            0.0
        }
    }

    /// Screen x of the fixed playhead
    pub fn playhead_x(&self) -> f32 {
        self.gutter_width()
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    pub fn quads(&self) -> &[super::pool::NoteQuad] {
        self.pool.quads()
    }

    pub fn sustain_segments(&self) -> &[SustainSegment] {
        &self.sustain
    }

    pub fn overlap_regions(&self) -> &[OverlapInterval] {
        &self.overlaps
    }

    pub fn loop_window(&self) -> &LoopWindow {
        &self.loop_window
    }

    pub fn waveform_sampler(&self) -> Option<&dyn WaveformSampler> {
        self.waveform_sampler.as_deref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Time under the playhead, for the host to re-sync playback
    pub fn time_at_playhead(&self) -> f64 {
        self.viewport.time_at_playhead(&self.metrics())
    }

    /// Read-only snapshot for diagnostics and tests
    pub fn state(&self) -> RollState {
        RollState {
            zoom_x: self.viewport.zoom_x,
            zoom_y: self.viewport.zoom_y,
            pan_x: self.viewport.pan_x,
            pan_y: self.viewport.pan_y,
            current_time: self.viewport.current_time,
            panning: self.viewport.panning,
            geometry_dirty: self.geometry_dirty,
            note_count: self.notes.len(),
            max_time: self.scales.time.max_time,
            px_per_second: self.scales.time.px_per_second,
        }
    }

    /// Release pooled drawables and detach all listeners
    ///
    /// The instance may be dropped afterwards; calling data setters on a
    /// destroyed engine is harmless but pointless.
    pub fn destroy(&mut self) {
        self.pool.clear();
        self.subscribers.clear();
        self.notes.clear();
        self.control_changes.clear();
        self.sustain.clear();
        self.overlaps.clear();
        self.waveform_sampler = None;
        self.color_override = None;
        self.geometry_dirty = false;
    }

    fn rederive_sustain(&mut self) {
        let content_end =
            content_end_time(&self.notes).unwrap_or(self.scales.time.max_time);
        self.sustain = derive_sustain_segments(&self.control_changes, content_end);
    }
}

/// Resolve a note's draw color
///
/// Priority: caller override, then evaluation-segment tag, then the
/// owning file's color, then the global note color. Velocity maps
/// linearly onto the configured alpha range, and the neutral color is
/// further de-emphasized so unmatched notes recede in comparison views.
fn resolve_note_color(
    config: &RollConfig,
    files: &[FileInfo],
    color_override: Option<&dyn Fn(&Note) -> Option<Color>>,
    note: &Note,
) -> Color {
    let base = color_override
        .and_then(|f| f(note))
        .or_else(|| note.segment.map(segment_color))
        .or_else(|| {
            files
                .iter()
                .position(|f| f.id == note.file)
                .map(|i| {
                    let [r, g, b] = files[i].color;
                    Color::from_rgb(r, g, b)
                })
        })
        .unwrap_or(config.note_color);

    let velocity = note.velocity.clamp(0.0, 1.0);
    let mut alpha =
        config.min_note_alpha + velocity * (config.max_note_alpha - config.min_note_alpha);
    if colors_close(base, config.neutral_color) {
        alpha *= config.neutral_opacity;
    }
    Color { a: alpha, ..base }
}

fn segment_color(kind: gliss_core::SegmentKind) -> Color {
    match kind {
        gliss_core::SegmentKind::Intersection => theme::SEGMENT_INTERSECTION_COLOR,
        gliss_core::SegmentKind::Exclusive => theme::SEGMENT_EXCLUSIVE_COLOR,
        gliss_core::SegmentKind::Ambiguous => theme::SEGMENT_AMBIGUOUS_COLOR,
    }
}

fn colors_close(a: Color, b: Color) -> bool {
    (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> PianoRoll {
        PianoRoll::new(800.0, 600.0, true)
    }

    fn one_note() -> Vec<Note> {
        vec![Note::new(0.0, 1.0, 60, 0.5, 0)]
    }

    const EPS: f64 = 1e-3;

    #[test]
    fn test_scenario_a_initial_ratio_and_anchor_zoom() {
        // width=800, gutter=60 -> px/s = (800-60)/8 = 92.5
        let mut roll = engine();
        roll.set_notes(one_note());
        assert!((roll.state().px_per_second - 92.5).abs() < 1e-9);

        let anchor = 100.0;
        let before = roll.transform().pixel_to_time(anchor);
        roll.zoom_x(2.0, Some(anchor));
        let after = roll.transform().pixel_to_time(anchor);
        assert!((after - before).abs() < EPS);
        // The reported playhead time reflects the recentered view
        assert!((roll.state().current_time - roll.time_at_playhead()).abs() < EPS);
    }

    #[test]
    fn test_pan_alone_never_rebuilds_geometry() {
        let mut roll = engine();
        roll.set_notes(one_note());
        assert!(roll.prepare_frame());

        roll.pan(-50.0, 10.0);
        assert!(!roll.state().geometry_dirty);
        assert!(!roll.prepare_frame());
    }

    #[test]
    fn test_dirty_sources_rebuild_exactly_once() {
        let mut roll = engine();

        roll.set_notes(one_note());
        assert!(roll.state().geometry_dirty);
        assert!(roll.prepare_frame());
        assert!(!roll.prepare_frame());

        roll.zoom_x(2.0, None);
        assert!(roll.prepare_frame());
        assert!(!roll.prepare_frame());

        roll.zoom_y(2.0);
        assert!(roll.prepare_frame());
        assert!(!roll.prepare_frame());

        roll.resize(1000.0, None);
        assert!(roll.prepare_frame());
        assert!(!roll.prepare_frame());

        roll.set_control_changes(vec![ControlChangeEvent::new(0.5, 64, 1.0, 0)]);
        assert!(roll.prepare_frame());
        assert!(!roll.prepare_frame());
    }

    #[test]
    fn test_playhead_round_trip() {
        let mut roll = engine();
        roll.set_notes(vec![Note::new(0.0, 30.0, 60, 0.5, 0)]);
        roll.set_time(5.0);
        assert!((roll.time_at_playhead() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_drag_commits_once_on_release() {
        let mut roll = engine();
        roll.set_notes(vec![Note::new(0.0, 30.0, 60, 0.5, 0)]);
        let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        roll.on_time_change(move |t| sink.borrow_mut().push(t));

        roll.apply(RollCommand::BeginPan { position: (100.0, 100.0) });
        roll.apply(RollCommand::PanBy { dx: -40.0, dy: 0.0 });
        roll.apply(RollCommand::PanBy { dx: -40.0, dy: 0.0 });
        // Time tracks continuously, but nothing is committed yet
        assert!(seen.borrow().is_empty());
        assert!(roll.state().current_time > 0.0);

        roll.apply(RollCommand::EndPan { moved: true });
        assert_eq!(seen.borrow().len(), 1);
        assert!((seen.borrow()[0] - roll.state().current_time).abs() < EPS);
    }

    #[test]
    fn test_click_without_movement_is_silent() {
        let mut roll = engine();
        roll.set_notes(one_note());
        let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        roll.on_time_change(move |t| sink.borrow_mut().push(t));

        roll.apply(RollCommand::BeginPan { position: (100.0, 100.0) });
        roll.apply(RollCommand::EndPan { moved: false });
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_zoom_notifies_subscribers() {
        let mut roll = engine();
        roll.set_notes(vec![Note::new(0.0, 30.0, 60, 0.5, 0)]);
        roll.set_time(4.0);
        let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = roll.on_time_change(move |t| sink.borrow_mut().push(t));

        roll.zoom_x(2.0, Some(400.0));
        assert_eq!(seen.borrow().len(), 1);

        roll.off_time_change(id);
        roll.zoom_x(2.0, Some(400.0));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_set_time_does_not_notify() {
        let mut roll = engine();
        roll.set_notes(vec![Note::new(0.0, 30.0, 60, 0.5, 0)]);
        let seen: Rc<RefCell<Vec<f64>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        roll.on_time_change(move |t| sink.borrow_mut().push(t));
        roll.set_time(7.0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_loop_window_normalized_by_engine() {
        // Scenario D, with the swap owned by the engine
        let mut roll = engine();
        roll.set_loop_window(Some(7.0), Some(3.0));
        assert_eq!(roll.loop_window().range(), Some((3.0, 7.0)));
    }

    #[test]
    fn test_sustain_uses_last_note_end() {
        // Scenario C: pedal down at 5, last note ends at 8 -> [5, 8]
        let mut roll = engine();
        roll.set_notes(vec![Note::new(6.0, 2.0, 60, 0.5, 0)]);
        roll.set_control_changes(vec![ControlChangeEvent::new(5.0, 64, 1.0, 0)]);
        let segments = roll.sustain_segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, 5.0);
        assert_eq!(segments[0].end, 8.0);
    }

    #[test]
    fn test_px_per_second_preserved_across_set_notes() {
        let mut roll = engine();
        roll.set_notes(one_note());
        let ratio = roll.state().px_per_second;
        roll.set_notes(vec![Note::new(0.0, 300.0, 60, 0.5, 0)]);
        assert_eq!(roll.state().px_per_second, ratio);
        assert_eq!(roll.state().max_time, 300.0);
    }

    #[test]
    fn test_resize_rederives_ratio_and_keeps_time() {
        let mut roll = engine();
        roll.set_notes(vec![Note::new(0.0, 30.0, 60, 0.5, 0)]);
        roll.set_time(5.0);
        roll.resize(1660.0, Some(700.0));
        assert!((roll.state().px_per_second - (1660.0 - 60.0) / 8.0).abs() < 1e-9);
        assert!((roll.time_at_playhead() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_velocity_maps_to_alpha() {
        let mut roll = engine();
        roll.set_notes(vec![
            Note::new(0.0, 1.0, 60, 0.0, 0),
            Note::new(1.0, 1.0, 61, 1.0, 0),
        ]);
        roll.prepare_frame();
        let quads = roll.quads();
        let config = RollConfig::default();
        assert!((quads[0].color.a - config.min_note_alpha).abs() < 1e-6);
        assert!((quads[1].color.a - config.max_note_alpha).abs() < 1e-6);
    }

    #[test]
    fn test_color_override_wins() {
        let mut roll = engine();
        roll.set_color_override(Some(Box::new(|_| Some(Color::from_rgb(1.0, 0.0, 0.0)))));
        roll.set_notes(one_note());
        roll.prepare_frame();
        let color = roll.quads()[0].color;
        assert_eq!((color.r, color.g, color.b), (1.0, 0.0, 0.0));
    }

    #[test]
    fn test_neutral_color_is_de_emphasized() {
        let config = RollConfig::default();
        let neutral = config.neutral_color;
        let mut roll = PianoRoll::with_config(800.0, 600.0, true, config);
        roll.set_color_override(Some(Box::new(move |_| Some(neutral))));
        roll.set_notes(vec![Note::new(0.0, 1.0, 60, 1.0, 0)]);
        roll.prepare_frame();
        let expected = RollConfig::default().max_note_alpha * RollConfig::default().neutral_opacity;
        assert!((roll.quads()[0].color.a - expected).abs() < 1e-6);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut roll = engine();
        roll.set_notes(one_note());
        roll.on_time_change(|_| {});
        roll.prepare_frame();
        roll.destroy();
        assert!(roll.quads().is_empty());
        assert_eq!(roll.state().note_count, 0);
        // A destroyed engine stays inert, not poisoned
        roll.zoom_x(2.0, None);
    }
}
