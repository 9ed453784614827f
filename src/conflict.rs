//! Create and rename validation
//!
//! All comparisons are case-insensitive (see [`path::fold`]) so that
//! `Button.tsx` and `button.tsx` cannot coexist, whatever the storage does.
//! Checks never mutate anything; callers run them before touching the map.

use crate::error::ApiError;
use crate::path;
use crate::types::EntryKind;

struct Existing<'a> {
    original: &'a str,
    folded: String,
}

fn fold_all<'a, I, S>(existing: I) -> Vec<Existing<'a>>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    existing
        .into_iter()
        .map(|p| Existing {
            original: p.as_ref(),
            folded: path::fold(p.as_ref()),
        })
        .collect()
}

/// Validate creating `candidate` of the given kind next to `existing` paths.
pub fn can_create<'a, I, S>(existing: I, candidate: &str, kind: EntryKind) -> Result<(), ApiError>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    path::validate(candidate)?;
    tracing::trace!(candidate, %kind, "checking create");
    check_destination(&fold_all(existing), candidate)
}

/// Validate renaming `old` (a file or folder) to `new`.
///
/// The entry being moved never conflicts with itself: `old` is excluded from
/// the scan, and for folders so is everything nested beneath it.
pub fn can_rename<'a, I, S>(
    existing: I,
    old: &str,
    new: &str,
    kind: EntryKind,
) -> Result<(), ApiError>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    path::validate(old)?;
    path::validate(new)?;

    let old_folded = path::fold(old);
    let new_folded = path::fold(new);
    if kind == EntryKind::Folder && path::is_descendant_of(&new_folded, &old_folded) {
        return Err(ApiError::MoveIntoSelf {
            from: old.to_string(),
            to: new.to_string(),
        });
    }

    let remaining: Vec<Existing<'a>> = fold_all(existing)
        .into_iter()
        .filter(|e| {
            let moving = match kind {
                EntryKind::File => e.folded == old_folded,
                EntryKind::Folder => path::is_same_or_descendant(&e.folded, &old_folded),
            };
            !moving
        })
        .collect();

    check_destination(&remaining, new)
}

fn check_destination(existing: &[Existing<'_>], candidate: &str) -> Result<(), ApiError> {
    let folded = path::fold(candidate);

    if let Some(hit) = existing.iter().find(|e| e.folded == folded) {
        return Err(ApiError::PathExists {
            path: candidate.to_string(),
            existing: hit.original.to_string(),
        });
    }

    // a folder may not swallow stored paths, and a file may not shadow a folder
    if let Some(hit) = existing
        .iter()
        .find(|e| path::is_descendant_of(&e.folded, &folded))
    {
        return Err(ApiError::FolderConflict {
            path: candidate.to_string(),
            conflicting: hit.original.to_string(),
        });
    }

    // a stored file cannot double as one of the candidate's folders
    let ancestors = path::ancestors(&folded);
    if let Some(hit) = existing
        .iter()
        .find(|e| ancestors.contains(&e.folded.as_str()))
    {
        return Err(ApiError::FolderConflict {
            path: candidate.to_string(),
            conflicting: hit.original.to_string(),
        });
    }

    Ok(())
}
