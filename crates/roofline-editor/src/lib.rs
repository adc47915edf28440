//! Roofline Editor - Interactive roof edge drawing
//!
//! This crate holds the operator-facing drawing state: angle snapping for
//! two-click line segments, the editor session state machine with
//! snapshot-based undo/redo, keyboard affordances, the imagery alignment
//! controller, and per-edge-type length totals for saved drawings.
//!
//! Everything here works in pixel space. Alignment transforms move the
//! base imagery only and are never applied to recorded edge coordinates.

pub mod alignment;
pub mod export;
pub mod history;
pub mod keyboard;
pub mod session;
pub mod snapping;

pub use alignment::{AlignmentAction, AlignmentController, RepeatHandle, REPEAT_INTERVAL};
pub use export::EdgeTotals;
pub use history::History;
pub use keyboard::{EditorCommand, FocusTarget, Key, KeyEvent, Modifiers};
pub use session::{ClickOutcome, EditorSession, SessionState};
pub use snapping::{angular_distance, Snapper};
