//! Thread resolution: finding the thread for a tracked number.
//!
//! There is no stored mapping. Each lookup scans the forum's active threads,
//! then its archived ones, for a name carrying the number (see
//! [`name_tracks`](crate::types::name_tracks)). The scan is linear in the
//! number of threads and always reflects the live channel state.
//!
//! If two threads happen to carry the same number, the first one in listing
//! order wins. Nothing here prevents such duplicates from existing.

use tracing::trace;

use crate::effects::ChatPlatform;
use crate::types::{Forum, Thread, TrackedNumber};

/// Finds the thread for `number`, preferring active threads over archived ones.
///
/// Archived threads are only listed when no active thread matches.
pub async fn find_thread<C: ChatPlatform>(
    client: &C,
    forum: &Forum,
    number: TrackedNumber,
) -> Result<Option<Thread>, C::Error> {
    let active = client.list_active_threads(forum).await?;
    trace!(number = %number, count = active.len(), "Scanning active threads");
    if let Some(thread) = first_tracking(active, number) {
        return Ok(Some(thread));
    }

    let archived = client.list_archived_threads(forum).await?;
    trace!(number = %number, count = archived.len(), "Scanning archived threads");
    Ok(first_tracking(archived, number))
}

fn first_tracking(threads: Vec<Thread>, number: TrackedNumber) -> Option<Thread> {
    threads.into_iter().find(|thread| thread.tracks(number))
}
