//! Event reconciliation: from a webhook event to a forum action.
//!
//! Deciding and doing are split. [`decide`] is a pure function of the event
//! and the thread (if any) already found for it. [`Reconciler::handle`] does
//! the I/O around it: lock the number, look up the thread, decide, execute.
//!
//! | Event | Thread found | Thread missing |
//! |-------|--------------|----------------|
//! | issue opened | (no lookup) | create `#n - title` |
//! | PR opened | append "opened a pull request" | create `#n - title` |
//! | comment created | append "commented" | drop |
//! | PR closed/reopened | append "merged"/"closed"/"reopened this PR" | drop |
//! | issue closed/reopened | append "closed"/"reopened this issue" | drop |
//! | anything else | | ignore |

use tracing::{debug, info, instrument};

use crate::effects::{ChatPlatform, NoOpReason, RelayAction};
use crate::types::{ChannelId, Forum, Thread, thread_name};
use crate::webhooks::RelayEvent;

use super::RelayError;
use super::locks::NumberLocks;
use super::message;
use super::resolver::find_thread;

/// Decides what to do about `event`, given the thread found for
/// [`RelayEvent::lookup_number`] (always `None` when no lookup applies).
pub fn decide(event: &RelayEvent, existing: Option<&Thread>) -> RelayAction {
    match event {
        RelayEvent::IssueOpened { issue, sender } => RelayAction::CreateThread {
            name: thread_name(issue.number, &issue.title),
            body: message::issue_opened(issue, sender),
        },

        RelayEvent::PullRequestOpened {
            pull_request,
            sender,
        } => match existing {
            Some(thread) => RelayAction::AppendMessage {
                thread: thread.clone(),
                body: message::pull_request_opened(pull_request, sender),
            },
            None => RelayAction::CreateThread {
                name: thread_name(pull_request.number, &pull_request.title),
                body: message::pull_request_created(pull_request, sender),
            },
        },

        RelayEvent::CommentCreated {
            number,
            comment,
            sender,
        } => match existing {
            Some(thread) => RelayAction::AppendMessage {
                thread: thread.clone(),
                body: message::comment_created(comment, sender),
            },
            None => RelayAction::resolution_miss(*number),
        },

        RelayEvent::PullRequestStateChanged {
            pull_request,
            change,
            sender,
        } => match existing {
            Some(thread) => RelayAction::AppendMessage {
                thread: thread.clone(),
                body: message::pull_request_state_changed(*change, pull_request.merged, sender),
            },
            None => RelayAction::resolution_miss(pull_request.number),
        },

        RelayEvent::IssueStateChanged {
            number,
            change,
            sender,
        } => match existing {
            Some(thread) => RelayAction::AppendMessage {
                thread: thread.clone(),
                body: message::issue_state_changed(*change, sender),
            },
            None => RelayAction::resolution_miss(*number),
        },

        RelayEvent::Unrecognized { action } => RelayAction::unrecognized(action),
    }
}

/// Reconciles webhook events against one forum channel.
pub struct Reconciler<C> {
    client: C,
    forum_channel: ChannelId,
    locks: NumberLocks,
}

impl<C: ChatPlatform> Reconciler<C> {
    pub fn new(client: C, forum_channel: ChannelId) -> Self {
        Reconciler {
            client,
            forum_channel,
            locks: NumberLocks::new(),
        }
    }

    /// Returns the chat platform client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the forum channel this reconciler posts into.
    pub fn forum_channel(&self) -> &ChannelId {
        &self.forum_channel
    }

    /// Handles one event: resolves its thread, decides, and executes.
    ///
    /// Returns the action that was carried out. Each platform call is made at
    /// most once; a failure part way (say, after the thread was created) is
    /// reported as an error without undoing what already happened.
    #[instrument(skip_all, fields(kind = event.kind(), number = ?event.tracked_number()))]
    pub async fn handle(&self, event: &RelayEvent) -> Result<RelayAction, RelayError> {
        let Some(number) = event.tracked_number() else {
            let action = decide(event, None);
            log_noop(&action);
            return Ok(action);
        };

        let _guard = self.locks.acquire(number).await;

        let forum = self
            .client
            .fetch_forum(&self.forum_channel)
            .await
            .map_err(RelayError::platform("fetch forum channel"))?;

        let existing = match event.lookup_number() {
            Some(number) => find_thread(&self.client, &forum, number)
                .await
                .map_err(RelayError::platform("list threads"))?,
            None => None,
        };

        let action = decide(event, existing.as_ref());
        self.execute(&forum, &action).await?;
        Ok(action)
    }

    async fn execute(&self, forum: &Forum, action: &RelayAction) -> Result<(), RelayError> {
        match action {
            RelayAction::CreateThread { name, body } => {
                let thread = self
                    .client
                    .create_thread(forum, name, body)
                    .await
                    .map_err(RelayError::platform("create thread"))?;
                info!(thread = %thread.id, name = %thread.name, "Created thread");
            }
            RelayAction::AppendMessage { thread, body } => {
                self.client
                    .post_message(thread, body)
                    .await
                    .map_err(RelayError::platform("post message"))?;
                info!(thread = %thread.id, name = %thread.name, "Posted message");
            }
            RelayAction::NoOp { .. } => log_noop(action),
        }
        Ok(())
    }
}

fn log_noop(action: &RelayAction) {
    match action {
        RelayAction::NoOp {
            reason: NoOpReason::Unrecognized { action },
        } => debug!(action = %action, "Ignoring unrecognized event"),
        RelayAction::NoOp {
            reason: NoOpReason::ResolutionMiss { number },
        } => info!(number = %number, "No thread found; dropping event"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::test_utils::{FakeForum, FORUM_CHANNEL};
    use crate::types::{ThreadStatus, TrackedNumber};
    use crate::webhooks::{Comment, Issue, PullRequest, StateChange};

    fn issue(number: u64, title: &str, body: Option<&str>) -> Issue {
        Issue {
            number: TrackedNumber(number),
            title: title.to_string(),
            body: body.map(str::to_string),
            html_url: format!("https://github.com/o/r/issues/{number}"),
        }
    }

    fn pull_request(number: u64, title: &str, merged: bool) -> PullRequest {
        PullRequest {
            number: TrackedNumber(number),
            title: title.to_string(),
            body: Some("b".to_string()),
            html_url: "u".to_string(),
            merged,
        }
    }

    fn reconciler(fake: &Arc<FakeForum>) -> Reconciler<Arc<FakeForum>> {
        Reconciler::new(Arc::clone(fake), ChannelId::from(FORUM_CHANNEL))
    }

    // ─── decide ───

    #[test]
    fn issue_opened_creates_thread() {
        let event = RelayEvent::IssueOpened {
            issue: issue(7, "Bug", Some("desc")),
            sender: "alice".to_string(),
        };

        match decide(&event, None) {
            RelayAction::CreateThread { name, body } => {
                assert_eq!(name, "#7 - Bug");
                assert!(body.contains("New Issue by alice"));
                assert!(body.contains("desc"));
            }
            other => panic!("expected CreateThread, got {other:?}"),
        }
    }

    #[test]
    fn pull_request_opened_appends_to_existing_thread() {
        let thread = Thread::new("t7", "#7 - Bug", ThreadStatus::Active);
        let event = RelayEvent::PullRequestOpened {
            pull_request: pull_request(7, "Fix", false),
            sender: "bob".to_string(),
        };

        match decide(&event, Some(&thread)) {
            RelayAction::AppendMessage { thread: target, body } => {
                assert_eq!(target, thread);
                assert!(body.contains("bob opened a pull request"));
            }
            other => panic!("expected AppendMessage, got {other:?}"),
        }
    }

    #[test]
    fn pull_request_opened_without_thread_creates_one() {
        let event = RelayEvent::PullRequestOpened {
            pull_request: pull_request(11, "Fix", false),
            sender: "bob".to_string(),
        };

        match decide(&event, None) {
            RelayAction::CreateThread { name, body } => {
                assert_eq!(name, "#11 - Fix");
                assert!(body.starts_with("New Pull Request by bob"));
            }
            other => panic!("expected CreateThread, got {other:?}"),
        }
    }

    #[test]
    fn merged_close_reads_as_merge() {
        let thread = Thread::new("t9", "#9 - Release", ThreadStatus::Active);
        let event = RelayEvent::PullRequestStateChanged {
            pull_request: pull_request(9, "", true),
            change: StateChange::Closed,
            sender: "carol".to_string(),
        };

        assert_eq!(
            decide(&event, Some(&thread)),
            RelayAction::AppendMessage {
                thread,
                body: "carol merged this PR".to_string(),
            }
        );
    }

    #[test]
    fn misses_are_dropped() {
        let events = [
            RelayEvent::CommentCreated {
                number: TrackedNumber(99),
                comment: Comment {
                    body: "hi".to_string(),
                    html_url: String::new(),
                },
                sender: "dave".to_string(),
            },
            RelayEvent::PullRequestStateChanged {
                pull_request: pull_request(99, "", false),
                change: StateChange::Reopened,
                sender: "dave".to_string(),
            },
            RelayEvent::IssueStateChanged {
                number: TrackedNumber(99),
                change: StateChange::Closed,
                sender: "dave".to_string(),
            },
        ];

        for event in &events {
            assert_eq!(
                decide(event, None),
                RelayAction::resolution_miss(TrackedNumber(99)),
                "{event:?}"
            );
        }
    }

    #[test]
    fn decide_is_deterministic() {
        let thread = Thread::new("t3", "#3 - x", ThreadStatus::Archived);
        let event = RelayEvent::IssueStateChanged {
            number: TrackedNumber(3),
            change: StateChange::Reopened,
            sender: "erin".to_string(),
        };
        assert_eq!(decide(&event, Some(&thread)), decide(&event, Some(&thread)));
    }

    // ─── handle ───

    #[tokio::test]
    async fn handle_creates_issue_thread() {
        let fake = Arc::new(FakeForum::new());
        let event = RelayEvent::IssueOpened {
            issue: issue(7, "Bug", Some("desc")),
            sender: "alice".to_string(),
        };

        let action = reconciler(&fake).handle(&event).await.unwrap();

        assert!(matches!(action, RelayAction::CreateThread { .. }));
        let created = fake.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "#7 - Bug");
        assert!(created[0].1.contains("New Issue by alice"));
        // Issue threads are created without looking anything up.
        assert_eq!(fake.active_listings(), 0);
    }

    #[tokio::test]
    async fn handle_posts_into_archived_thread() {
        let fake = Arc::new(FakeForum::new());
        let thread = fake.add_thread("#12 - Old issue", ThreadStatus::Archived);
        let event = RelayEvent::IssueStateChanged {
            number: TrackedNumber(12),
            change: StateChange::Reopened,
            sender: "erin".to_string(),
        };

        reconciler(&fake).handle(&event).await.unwrap();

        assert_eq!(
            fake.posted(),
            vec![(thread.id, "erin reopened this issue".to_string())]
        );
    }

    #[tokio::test]
    async fn handle_unrecognized_touches_nothing() {
        let fake = Arc::new(FakeForum::new());
        let event = RelayEvent::Unrecognized {
            action: "labeled".to_string(),
        };

        let action = reconciler(&fake).handle(&event).await.unwrap();

        assert_eq!(action, RelayAction::unrecognized("labeled"));
        assert_eq!(fake.forum_fetches(), 0);
    }

    #[tokio::test]
    async fn handle_reports_platform_failure() {
        let fake = Arc::new(FakeForum::new());
        fake.fail_on("create_thread");
        let event = RelayEvent::IssueOpened {
            issue: issue(1, "x", None),
            sender: "alice".to_string(),
        };

        let err = reconciler(&fake).handle(&event).await.unwrap_err();
        assert!(err.to_string().contains("create thread"), "{err}");
    }

    #[tokio::test]
    async fn concurrent_pull_requests_share_one_thread() {
        let fake = Arc::new(FakeForum::new());
        let shared = Arc::new(reconciler(&fake));
        let event = RelayEvent::PullRequestOpened {
            pull_request: pull_request(21, "Fix", false),
            sender: "bob".to_string(),
        };

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                let event = event.clone();
                tokio::spawn(async move { shared.handle(&event).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(fake.created().len(), 1);
        assert_eq!(fake.posted().len(), 3);
    }
}
