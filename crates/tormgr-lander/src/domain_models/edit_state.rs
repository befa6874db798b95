//! Edit state of one editable entity
//!
//! ```text
//!            loaded(v)                edit(f)
//! Loading ─────────────► Clean(v) ─────────────► Dirty(v', v)
//!                          ▲  ▲                      │  │  │
//!                          │  └──── save_succeeded ──┘  │  │ edit(f): Dirty(v'', v)
//!                          └─ save_failed / cancel ─────┘
//! ```
//!
//! `loaded` always lands in `Clean`, also from `Dirty`: fresh data from the
//! server wins over local edits.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState<T> {
    Loading,
    Clean(T),
    Dirty { value: T, original: T },
}

impl<T> Default for EditState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T: Clone> EditState<T> {
    /// A brand new entity: dirty from the start, reverting to `blank`
    pub fn new_entity(blank: T) -> Self {
        Self::Dirty {
            value: blank.clone(),
            original: blank,
        }
    }

    pub fn loaded(self, value: T) -> Self {
        Self::Clean(value)
    }

    /// Apply a field edit; ignored while loading
    pub fn edit(self, apply: impl FnOnce(&mut T)) -> Self {
        match self {
            Self::Loading => Self::Loading,
            Self::Clean(original) => {
                let mut value = original.clone();
                apply(&mut value);
                Self::Dirty { value, original }
            }
            Self::Dirty {
                mut value,
                original,
            } => {
                apply(&mut value);
                Self::Dirty { value, original }
            }
        }
    }

    pub fn save_succeeded(self) -> Self {
        match self {
            Self::Dirty { value, .. } => Self::Clean(value),
            other => other,
        }
    }

    pub fn save_failed(self) -> Self {
        self.cancel()
    }

    pub fn cancel(self) -> Self {
        match self {
            Self::Dirty { original, .. } => Self::Clean(original),
            other => other,
        }
    }

    /// Value as currently shown
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loading => None,
            Self::Clean(value) | Self::Dirty { value, .. } => Some(value),
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Dirty { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn clean() -> EditState<String> {
        EditState::<String>::Loading.loaded("Old".to_string())
    }

    #[test]
    fn test_loading_ignores_edits() {
        let state = EditState::<String>::Loading.edit(|v| v.push('x'));
        assert_eq!(state, EditState::Loading);
        assert_eq!(state.value(), None);
    }

    #[test]
    fn test_edit_keeps_first_original() {
        let state = clean().edit(|v| v.push('1')).edit(|v| v.push('2'));
        assert_eq!(
            state,
            EditState::Dirty {
                value: "Old12".to_string(),
                original: "Old".to_string()
            }
        );
        assert!(state.is_dirty());
    }

    #[test]
    fn test_save_outcomes() {
        let dirty = clean().edit(|v| *v = "New".to_string());

        assert_eq!(
            dirty.clone().save_succeeded(),
            EditState::Clean("New".to_string())
        );
        assert_eq!(dirty.save_failed(), EditState::Clean("Old".to_string()));
    }

    #[test]
    fn test_cancel_and_reload() {
        let dirty = clean().edit(|v| v.clear());
        assert_eq!(dirty.clone().cancel(), clean());
        assert_eq!(
            dirty.loaded("Server".to_string()),
            EditState::Clean("Server".to_string())
        );
        // clean states are left alone
        assert_eq!(clean().cancel(), clean());
        assert_eq!(clean().save_succeeded(), clean());
    }

    #[test]
    fn test_new_entity_reverts_to_blank() {
        let state = EditState::<String>::new_entity(String::new()).edit(|v| v.push_str("magnet:"));
        assert_eq!(state.value().map(String::as_str), Some("magnet:"));
        assert_eq!(state.cancel(), EditState::Clean(String::new()));
    }
}
