//! Interactive editor session.
//!
//! The session is the explicit context object that owns the live
//! document, the viewport, and the history. Anything that needs the
//! active canvas receives it from here; there is no global surface
//! reference.

use crate::doc::DesignDoc;
use crate::history::{History, HistoryError};
use crate::nodes::{DesignNode, NodeId};
use crate::viewport::ViewportState;
use kurbo::Vec2;

/// One editing session over a single document.
///
/// All edits happen on the caller's event loop; the document is never
/// shared mutably. History snapshots are independent serialized copies,
/// so undo states cannot be mutated by later edits.
#[derive(Debug)]
pub struct EditorSession {
    pub doc: DesignDoc,
    pub viewport: ViewportState,
    history: History,
    /// Whether a continuous gesture (drag/resize) is in progress.
    gesture_active: bool,
}

impl EditorSession {
    /// Start a session; the initial state becomes the first snapshot.
    pub fn new(doc: DesignDoc) -> Result<Self, HistoryError> {
        let mut history = History::new();
        history.commit(&doc)?;
        Ok(Self {
            doc,
            viewport: ViewportState::new(),
            history,
            gesture_active: false,
        })
    }

    /// Apply a committed edit: mutate, then snapshot.
    pub fn edit(&mut self, f: impl FnOnce(&mut DesignDoc)) -> Result<(), HistoryError> {
        f(&mut self.doc);
        self.history.commit(&self.doc)
    }

    /// Apply a transient mutation without committing (drag previews).
    /// Call [`Self::end_gesture`] once when the gesture completes.
    pub fn edit_transient(&mut self, f: impl FnOnce(&mut DesignDoc)) {
        self.gesture_active = true;
        f(&mut self.doc);
    }

    /// Commit the document once at the end of a continuous gesture.
    /// A no-op when no transient edit happened.
    pub fn end_gesture(&mut self) -> Result<(), HistoryError> {
        if !self.gesture_active {
            return Ok(());
        }
        self.gesture_active = false;
        self.history.commit(&self.doc)
    }

    /// Undo to the previous committed state.
    /// Hitting the boundary of history is expected and silently ignored.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(doc) => {
                self.doc = doc;
                true
            }
            None => false,
        }
    }

    /// Redo a previously undone state.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(doc) => {
                self.doc = doc;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Delete the selected nodes as one committed edit.
    pub fn delete_selected(&mut self) -> Result<Vec<DesignNode>, HistoryError> {
        let ids: Vec<NodeId> = self.doc.selected_ids.clone();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let removed = self.doc.remove_nodes(&ids);
        log::debug!("deleted {} selected node(s)", removed.len());
        self.history.commit(&self.doc)?;
        Ok(removed)
    }

    /// Duplicate the selected nodes; the copies become the new selection.
    pub fn duplicate_selected(&mut self, offset: Vec2) -> Result<Vec<NodeId>, HistoryError> {
        let ids: Vec<NodeId> = self.doc.selected_ids.clone();
        let copies: Vec<NodeId> = ids
            .iter()
            .filter_map(|&id| self.doc.duplicate_node(id, offset))
            .collect();
        if copies.is_empty() {
            return Ok(copies);
        }
        self.doc.set_selection(copies.clone());
        self.history.commit(&self.doc)?;
        Ok(copies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Rectangle;
    use kurbo::Point;

    fn rect_node() -> DesignNode {
        DesignNode::Rect(Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0))
    }

    #[test]
    fn test_edit_commits() {
        let mut session = EditorSession::new(DesignDoc::default()).unwrap();
        session.edit(|doc| {
            doc.add_node(rect_node());
        }).unwrap();

        assert_eq!(session.doc.len(), 1);
        assert!(session.can_undo());
        assert!(session.undo());
        assert!(session.doc.is_empty());
        assert!(session.redo());
        assert_eq!(session.doc.len(), 1);
    }

    #[test]
    fn test_gesture_commits_once() {
        let mut session = EditorSession::new(DesignDoc::default()).unwrap();
        let id = {
            let mut id = None;
            session.edit(|doc| {
                id = Some(doc.add_node(rect_node()));
            }).unwrap();
            id.unwrap()
        };

        // A drag emits many transient frames but only one history entry
        for i in 1..=10 {
            session.edit_transient(|doc| {
                doc.update_node(id, |n| n.translate(Vec2::new(1.0, 0.0)));
                let _ = i;
            });
        }
        session.end_gesture().unwrap();

        let bounds = session.doc.node(id).unwrap().bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);

        // One undo rewinds the whole gesture, not a single frame
        assert!(session.undo());
        let bounds = session.doc.node(id).unwrap().bounds();
        assert!(bounds.x0.abs() < f64::EPSILON);
    }

    #[test]
    fn test_end_gesture_without_transient_is_noop() {
        let mut session = EditorSession::new(DesignDoc::default()).unwrap();
        session.end_gesture().unwrap();
        assert!(!session.can_undo());
    }

    #[test]
    fn test_undo_at_boundary_is_silent() {
        let mut session = EditorSession::new(DesignDoc::default()).unwrap();
        assert!(!session.undo());
        assert!(!session.redo());
    }

    #[test]
    fn test_delete_selected_restores_selection_on_undo() {
        let mut session = EditorSession::new(DesignDoc::default()).unwrap();
        let mut captured = None;
        session.edit(|doc| {
            let id = doc.add_node(rect_node());
            doc.select(id);
            captured = Some(id);
        }).unwrap();
        let id = captured.unwrap();

        let removed = session.delete_selected().unwrap();
        assert_eq!(removed.len(), 1);
        assert!(session.doc.is_empty());
        assert!(session.doc.selected_ids.is_empty());

        // Selection is part of the snapshot, so undo brings it back
        assert!(session.undo());
        assert!(session.doc.is_selected(id));
    }

    #[test]
    fn test_duplicate_selected() {
        let mut session = EditorSession::new(DesignDoc::default()).unwrap();
        session.edit(|doc| {
            let id = doc.add_node(rect_node());
            doc.select(id);
        }).unwrap();

        let copies = session.duplicate_selected(Vec2::new(12.0, 12.0)).unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(session.doc.len(), 2);
        assert_eq!(session.doc.selected_ids, copies);
    }
}
