use chrono::Utc;
use roofline_core::models::{
    AlignmentTransform, DrawingRecord, Edge, EdgeId, EdgeType, Endpoint, PixelPoint, PixelScale,
    SiteId,
};

use crate::history::History;
use crate::snapping::Snapper;

/// Default endpoint hit radius in pixels
pub const DEFAULT_HIT_RADIUS_PX: f64 = 8.0;

/// Where the session is in its draw/drag cycle
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    /// First endpoint fixed, tracking the pointer
    Drawing { start: PixelPoint, current: PixelPoint },
    /// Moving one endpoint of a committed line; `working` holds the
    /// in-flight line list until release
    Dragging { edge_id: EdgeId, endpoint: Endpoint, working: Vec<Edge> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Started,
    Committed(EdgeId),
    Ignored,
}

/// Drawing state for one surface.
///
/// Every mutation of the committed lines goes through [`History::commit`];
/// operations that would not change anything are no-ops and leave history
/// untouched.
#[derive(Debug, Clone)]
pub struct EditorSession {
    history: History,
    state: SessionState,
    snapper: Snapper,
    snap_enabled: bool,
    scale: PixelScale,
    hit_radius_px: f64,
    next_id: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(PixelScale::default())
    }
}

impl EditorSession {
    pub fn new(scale: PixelScale) -> Self {
        Self {
            history: History::new(),
            state: SessionState::Idle,
            snapper: Snapper::default(),
            snap_enabled: true,
            scale,
            hit_radius_px: DEFAULT_HIT_RADIUS_PX,
            next_id: 1,
        }
    }

    /// Resume editing a saved drawing; the saved lines are the oldest state
    pub fn from_drawing(drawing: &DrawingRecord) -> Self {
        let next_id = drawing.edges.iter().map(|e| e.id.0).max().map_or(1, |max| max + 1);
        Self {
            history: History::with_initial(drawing.edges.clone()),
            next_id,
            ..Self::new(drawing.scale)
        }
    }

    pub fn with_snapper(mut self, snapper: Snapper) -> Self {
        self.snapper = snapper;
        self
    }

    pub fn with_hit_radius(mut self, radius_px: f64) -> Self {
        self.hit_radius_px = radius_px;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Lines as currently displayed, including an in-flight drag
    pub fn lines(&self) -> &[Edge] {
        match &self.state {
            SessionState::Dragging { working, .. } => working.as_slice(),
            _ => self.history.current().as_slice(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn scale(&self) -> PixelScale {
        self.scale
    }

    /// Later lines and exports use the new scale
    pub fn set_scale(&mut self, scale: PixelScale) {
        self.scale = scale;
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    /// The in-progress line with snapping applied, as it would be committed
    pub fn preview(&self) -> Option<(PixelPoint, PixelPoint)> {
        match self.state {
            SessionState::Drawing { start, current } => Some((start, self.snapped_end(start, current))),
            _ => None,
        }
    }

    fn snapped_end(&self, start: PixelPoint, end: PixelPoint) -> PixelPoint {
        let committed = self.history.current();
        self.snapper.snap(start, end, committed.last(), self.snap_enabled)
    }

    fn commit(&mut self, lines: Vec<Edge>) {
        self.history.commit(lines);
        tracing::trace!(
            lines = self.history.current().len(),
            undo_depth = self.history.undo_depth(),
            "Committed drawing state"
        );
    }

    pub fn click(&mut self, point: PixelPoint) -> ClickOutcome {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Drawing { start: point, current: point };
                ClickOutcome::Started
            }
            SessionState::Drawing { start, .. } => {
                let end = self.snapped_end(start, point);
                if start.distance_to(&end) <= f64::EPSILON {
                    // Degenerate line; keep waiting for a real second point
                    return ClickOutcome::Ignored;
                }

                let id = EdgeId(self.next_id);
                self.next_id += 1;

                let mut lines = self.history.current().to_vec();
                lines.push(Edge::new(id, start, end, self.scale));
                self.commit(lines);
                self.state = SessionState::Idle;
                ClickOutcome::Committed(id)
            }
            SessionState::Dragging { .. } => ClickOutcome::Ignored,
        }
    }

    pub fn pointer_move(&mut self, point: PixelPoint) {
        let scale = self.scale;
        match &mut self.state {
            SessionState::Drawing { current, .. } => *current = point,
            SessionState::Dragging { edge_id, endpoint, working } => {
                if let Some(edge) = working.iter_mut().find(|e| e.id == *edge_id) {
                    *edge = edge.with_endpoint(*endpoint, point, scale);
                }
            }
            SessionState::Idle => {}
        }
    }

    /// Discard the in-progress line. Returns false when nothing was in progress.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, SessionState::Drawing { .. }) {
            self.state = SessionState::Idle;
            true
        } else {
            false
        }
    }

    pub fn double_click(&mut self) -> bool {
        self.cancel()
    }

    /// Nearest endpoint within the hit radius
    pub fn hit_test(&self, point: PixelPoint) -> Option<(EdgeId, Endpoint)> {
        self.lines()
            .iter()
            .flat_map(|edge| {
                [Endpoint::Start, Endpoint::End]
                    .into_iter()
                    .map(move |which| (edge.id, which, edge.endpoint(which).distance_to(&point)))
            })
            .filter(|(_, _, distance)| *distance <= self.hit_radius_px)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, which, _)| (id, which))
    }

    /// Begin dragging the endpoint under `point`, if any
    pub fn press(&mut self, point: PixelPoint) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        let Some((edge_id, endpoint)) = self.hit_test(point) else {
            return false;
        };

        self.state = SessionState::Dragging {
            edge_id,
            endpoint,
            working: self.history.current().to_vec(),
        };
        true
    }

    /// End a drag; its net effect becomes a single history entry
    pub fn release(&mut self) -> bool {
        let SessionState::Dragging { working, .. } =
            std::mem::replace(&mut self.state, SessionState::Idle)
        else {
            return false;
        };

        if working.as_slice() == self.history.current().as_slice() {
            return false;
        }
        self.commit(working);
        true
    }

    fn is_busy(&self) -> bool {
        matches!(self.state, SessionState::Dragging { .. })
    }

    pub fn delete_last(&mut self) -> bool {
        if self.is_busy() || self.history.current().is_empty() {
            return false;
        }
        let mut lines = self.history.current().to_vec();
        lines.pop();
        self.commit(lines);
        true
    }

    pub fn delete(&mut self, id: EdgeId) -> bool {
        if self.is_busy() || !self.history.current().iter().any(|e| e.id == id) {
            return false;
        }
        let lines = self.history.current().iter().filter(|e| e.id != id).copied().collect();
        self.commit(lines);
        true
    }

    pub fn clear(&mut self) -> bool {
        if self.is_busy() || self.history.current().is_empty() {
            return false;
        }
        self.commit(Vec::new());
        true
    }

    /// Tag an edge; produces a new edge record rather than patching in place
    pub fn set_edge_type(&mut self, id: EdgeId, edge_type: EdgeType) -> bool {
        if self.is_busy() {
            return false;
        }
        let current = self.history.current();
        if !current.iter().any(|e| e.id == id && e.edge_type != edge_type) {
            return false;
        }
        let lines = current
            .iter()
            .map(|e| if e.id == id { e.with_edge_type(edge_type) } else { *e })
            .collect();
        self.commit(lines);
        true
    }

    pub fn undo(&mut self) -> bool {
        !self.is_busy() && self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        !self.is_busy() && self.history.redo()
    }

    /// Snapshot for saving. Lengths are recomputed with the current scale and
    /// the alignment in effect is stored alongside the pixel coordinates.
    pub fn export(&self, site_id: SiteId, alignment: AlignmentTransform) -> DrawingRecord {
        DrawingRecord {
            site_id,
            edges: self.history.current().iter().map(|e| e.rescaled(self.scale)).collect(),
            alignment,
            scale: self.scale,
            saved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> PixelPoint {
        PixelPoint::new(x, y)
    }

    fn draw(session: &mut EditorSession, from: PixelPoint, to: PixelPoint) -> EdgeId {
        assert_eq!(session.click(from), ClickOutcome::Started);
        match session.click(to) {
            ClickOutcome::Committed(id) => id,
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn test_undo_redo_discipline() {
        let mut session = EditorSession::default();
        draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));
        draw(&mut session, p(100.0, 0.0), p(100.0, 80.0));
        draw(&mut session, p(100.0, 80.0), p(0.0, 80.0));

        assert!(session.undo());
        assert!(session.undo());
        assert_eq!(session.lines().len(), 1);

        assert!(session.redo());
        assert_eq!(session.lines().len(), 2);

        draw(&mut session, p(0.0, 80.0), p(0.0, 0.0));
        assert!(!session.redo());
        assert_eq!(session.lines().len(), 3);
    }

    #[test]
    fn test_click_commits_snapped_line() {
        let mut session = EditorSession::default();
        draw(&mut session, p(0.0, 0.0), p(100.0, 4.0));

        let edge = session.lines()[0];
        assert!(edge.end.y.abs() < 1e-9);
        assert!((edge.length_ft - (100.0f64.hypot(4.0) / 10.0)).abs() < 1e-9);
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[test]
    fn test_cancel_discards_without_history() {
        let mut session = EditorSession::default();
        session.click(p(5.0, 5.0));
        session.pointer_move(p(50.0, 5.0));
        assert!(session.preview().is_some());

        assert!(session.double_click());
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.lines().is_empty());
        assert!(!session.history().can_undo());
        assert!(!session.cancel());
    }

    #[test]
    fn test_zero_length_click_is_ignored() {
        let mut session = EditorSession::default();
        session.click(p(5.0, 5.0));
        assert_eq!(session.click(p(5.0, 5.0)), ClickOutcome::Ignored);
        assert!(matches!(session.state(), SessionState::Drawing { .. }));
        assert!(session.lines().is_empty());
    }

    #[test]
    fn test_drag_is_one_history_entry() {
        let mut session = EditorSession::default();
        let id = draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));
        let depth = session.history().undo_depth();

        assert!(session.press(p(98.0, 3.0)));
        for x in 101..=140 {
            session.pointer_move(p(x as f64, 0.0));
        }
        assert_eq!(session.lines()[0].end, p(140.0, 0.0));
        assert_eq!(session.history().undo_depth(), depth);

        assert!(session.release());
        assert_eq!(session.history().undo_depth(), depth + 1);
        assert_eq!(session.lines()[0].id, id);
        assert!((session.lines()[0].length_ft - 14.0).abs() < 1e-9);

        assert!(session.undo());
        assert_eq!(session.lines()[0].end, p(100.0, 0.0));
    }

    #[test]
    fn test_press_outside_hit_radius() {
        let mut session = EditorSession::default();
        draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));
        assert!(!session.press(p(50.0, 0.0)));
        assert!(!session.release());
    }

    #[test]
    fn test_drag_without_movement_adds_nothing() {
        let mut session = EditorSession::default();
        draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));
        let depth = session.history().undo_depth();

        assert!(session.press(p(0.0, 1.0)));
        assert!(!session.release());
        assert_eq!(session.history().undo_depth(), depth);
    }

    #[test]
    fn test_deletes_and_noops() {
        let mut session = EditorSession::default();
        assert!(!session.delete_last());
        assert!(!session.clear());

        let first = draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));
        draw(&mut session, p(100.0, 0.0), p(100.0, 50.0));
        draw(&mut session, p(100.0, 50.0), p(0.0, 50.0));

        assert!(session.delete(first));
        assert!(!session.delete(first));
        assert!(session.delete_last());
        assert_eq!(session.lines().len(), 1);
        assert!(session.clear());
        assert!(session.lines().is_empty());

        assert!(session.undo());
        assert_eq!(session.lines().len(), 1);
    }

    #[test]
    fn test_edge_type_tagging() {
        let mut session = EditorSession::default();
        let id = draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));

        assert!(session.set_edge_type(id, EdgeType::Eave));
        assert!(!session.set_edge_type(id, EdgeType::Eave));
        assert!(!session.set_edge_type(EdgeId(99), EdgeType::Ridge));
        assert_eq!(session.lines()[0].edge_type, EdgeType::Eave);

        session.undo();
        assert_eq!(session.lines()[0].edge_type, EdgeType::Unlabeled);
    }

    #[test]
    fn test_export_carries_alignment_and_scale() {
        let mut session = EditorSession::default();
        draw(&mut session, p(0.0, 0.0), p(100.0, 0.0));
        session.set_scale(PixelScale::new(20.0));

        let alignment = AlignmentTransform::identity().translated(3.0, -2.0);
        let record = session.export(SiteId::new("site-1"), alignment);

        assert_eq!(record.alignment, alignment);
        assert_eq!(record.edges[0].start, p(0.0, 0.0));
        assert!((record.total_length_ft() - 5.0).abs() < 1e-9);

        let resumed = EditorSession::from_drawing(&record);
        assert_eq!(resumed.lines(), record.edges.as_slice());
        assert!(!resumed.history().can_undo());
    }

    #[test]
    fn test_snapping_toggle() {
        let mut session = EditorSession::default();
        session.set_snap_enabled(false);
        draw(&mut session, p(0.0, 0.0), p(100.0, 4.0));
        assert_eq!(session.lines()[0].end, p(100.0, 4.0));
    }
}
