//! Editable entities

use crate::domain_models::EditState;
use tormgr_client::{Folder, TorrentItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TorrentField {
    #[default]
    Title,
    Link,
    Url,
    Description,
}

impl TorrentField {
    pub const ALL: [TorrentField; 4] = [Self::Title, Self::Link, Self::Url, Self::Description];

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::Link,
            Self::Link => Self::Url,
            Self::Url => Self::Description,
            Self::Description => Self::Title,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Link => "Link",
            Self::Url => "URL or info hash",
            Self::Description => "Description",
        }
    }

    pub fn get(self, item: &TorrentItem) -> &str {
        match self {
            Self::Title => &item.title,
            Self::Link => item.link.as_deref().unwrap_or_default(),
            Self::Url => item.url.as_deref().unwrap_or_default(),
            Self::Description => item.description.as_deref().unwrap_or_default(),
        }
    }

    /// Mutable text of this field, created empty when missing
    pub fn text_mut(self, item: &mut TorrentItem) -> &mut String {
        match self {
            Self::Title => &mut item.title,
            Self::Link => item.link.get_or_insert_with(String::new),
            Self::Url => item.url.get_or_insert_with(String::new),
            Self::Description => item.description.get_or_insert_with(String::new),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub folder: EditState<Folder>,
    /// The folder name field has focus
    pub renaming: bool,
    pub torrent: EditState<TorrentItem>,
    pub field: TorrentField,
}
