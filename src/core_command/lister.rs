use crate::core_network::error::{Result, TransferError};
use log::error;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Number of leading snapshot entries that are the self/parent markers.
pub const SKIPPED_ENTRIES: usize = 2;

/// Takes a fresh, ordered snapshot of `dir`.
///
/// The snapshot starts with `"."` and `".."`, then every entry in the order
/// the OS enumerates them. Directory reads never report the two markers
/// themselves, so they are emitted here to keep the listing contract of
/// "skip the first two entries". Names are kept exactly as the OS reports
/// them, UTF-8 or not.
pub async fn snapshot(dir: &Path) -> Result<Vec<OsString>> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|source| {
        error!("Couldn't open the directory {:?}: {}", dir, source);
        TransferError::Directory {
            path: dir.to_path_buf(),
            source,
        }
    })?;

    let mut names = vec![OsString::from("."), OsString::from("..")];
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => names.push(entry.file_name()),
            Ok(None) => break,
            Err(source) => {
                error!("Failed to read directory entry in {:?}: {}", dir, source);
                return Err(TransferError::Directory {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        }
    }
    Ok(names)
}

/// The entries a listing sends: everything after the first two.
pub fn listed_entries(snapshot: &[OsString]) -> &[OsString] {
    snapshot.get(SKIPPED_ENTRIES..).unwrap_or(&[])
}

pub fn contains(snapshot: &[OsString], name: &OsStr) -> bool {
    snapshot.iter().any(|entry| entry == name)
}

/// The bytes of a file name as they go on the wire.
#[cfg(unix)]
pub fn name_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(name.as_bytes())
}

#[cfg(not(unix))]
pub fn name_bytes(name: &OsStr) -> Cow<'_, [u8]> {
    Cow::Owned(name.to_string_lossy().into_owned().into_bytes())
}

/// A file name taken from a control-channel token.
#[cfg(unix)]
pub fn name_from_bytes(bytes: &[u8]) -> OsString {
    use std::os::unix::ffi::OsStrExt;
    OsStr::from_bytes(bytes).to_os_string()
}

#[cfg(not(unix))]
pub fn name_from_bytes(bytes: &[u8]) -> OsString {
    OsString::from(String::from_utf8_lossy(bytes).into_owned())
}
