//! Id-keyed registry of attached editors

use super::observer::{SelectionChange, SelectionObserver};
use super::{AttachError, Editor, EditorSettings, FieldSource};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

/// Live editors by backing field id, plus the selection observer they subscribe to.
#[derive(Debug, Default)]
pub struct EditorRegistry {
    editors: BTreeMap<String, Editor>,
    observer: SelectionObserver,
}

impl EditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an editor to the field named in `settings`. Attaching to a field that already
    /// has an editor replaces it.
    pub fn attach(
        &mut self,
        settings: EditorSettings,
        fields: &impl FieldSource,
    ) -> Result<&mut Editor, AttachError> {
        let editor = Editor::attach(settings, fields)?;
        let id = editor.id().to_owned();
        self.observer.subscribe(&id);
        match self.editors.entry(id) {
            Entry::Occupied(mut entry) => {
                debug!(id = %entry.key(), "editor replaced");
                entry.insert(editor);
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => Ok(entry.insert(editor)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Editor> {
        self.editors.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Editor> {
        self.editors.get_mut(id)
    }

    pub fn detach(&mut self, id: &str) -> Option<Editor> {
        self.observer.unsubscribe(id);
        let editor = self.editors.remove(id);
        if editor.is_some() {
            debug!(id, "editor detached");
        }
        editor
    }

    /// Dispatch a selection change to the editor owning it. Returns whether one did.
    pub fn selection_changed(&mut self, change: SelectionChange) -> bool {
        let Some(owner) = self.observer.route(&change) else {
            return false;
        };
        match self.editors.get_mut(owner) {
            Some(editor) => {
                editor.handle_selection_change(change.selection.clone());
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.editors.keys().map(String::as_str)
    }

    pub fn observer(&self) -> &SelectionObserver {
        &self.observer
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supsub::dom::{Position, Selection};
    use crate::supsub::mark::{Mark, MarkMode};
    use std::collections::HashMap;

    fn fields() -> HashMap<String, String> {
        HashMap::from([
            ("q1".to_string(), "<sup>ab</sup>".to_string()),
            ("q2".to_string(), "cd".to_string()),
        ])
    }

    #[test]
    fn test_attach_and_find() {
        let mut registry = EditorRegistry::new();
        registry.attach(EditorSettings::new("q1", MarkMode::Both), &fields()).unwrap();
        registry.attach(EditorSettings::new("q2", MarkMode::Sup), &fields()).unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["q1", "q2"]);
        assert_eq!(registry.get("q2").unwrap().clean_html(), "cd");
        assert!(registry.get("q3").is_none());
    }

    #[test]
    fn test_attach_missing_field() {
        let mut registry = EditorRegistry::new();
        let err = registry.attach(EditorSettings::new("nope", MarkMode::Both), &fields()).unwrap_err();
        assert_eq!(err, AttachError::MissingField("nope".into()));
        assert!(registry.is_empty());
        assert!(registry.observer().is_empty());
    }

    #[test]
    fn test_selection_change_reaches_owner_only() {
        let mut registry = EditorRegistry::new();
        registry.attach(EditorSettings::new("q1", MarkMode::Both), &fields()).unwrap();
        registry.attach(EditorSettings::new("q2", MarkMode::Both), &fields()).unwrap();

        let caret = Selection::caret(Position::new(vec![0, 0], 1));
        assert!(registry.selection_changed(SelectionChange {
            owner: Some("q1".into()),
            selection: Some(caret),
        }));
        assert_eq!(registry.get("q1").unwrap().active_button(), Some(Mark::Superscript));
        assert_eq!(registry.get("q2").unwrap().active_button(), None);
        assert!(registry.get("q2").unwrap().selection().is_none());
    }

    #[test]
    fn test_detach_unsubscribes() {
        let mut registry = EditorRegistry::new();
        registry.attach(EditorSettings::new("q1", MarkMode::Both), &fields()).unwrap();
        assert!(registry.detach("q1").is_some());
        assert!(!registry.observer().is_subscribed("q1"));
        assert!(!registry.selection_changed(SelectionChange {
            owner: Some("q1".into()),
            selection: None,
        }));
        assert!(registry.detach("q1").is_none());
    }
}
