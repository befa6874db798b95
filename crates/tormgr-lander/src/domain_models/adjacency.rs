use tormgr_client::Folder;

/// Folder to select once `deleted` is gone from `folders`
///
/// Looked up in the remaining folders: deleting the first folder selects
/// index 1 of what remains, any other position selects its predecessor.
/// `None` when there is nothing left to select or `deleted` is unknown.
pub fn adjacent_folder(folders: &[Folder], deleted: &Folder) -> Option<Folder> {
    let index = folders.iter().position(|f| f.id == deleted.id)?;
    let remaining: Vec<&Folder> = folders.iter().filter(|f| f.id != deleted.id).collect();

    let adjacent = if index == 0 { 1 } else { index - 1 };
    remaining.get(adjacent).map(|f| (*f).clone())
}
