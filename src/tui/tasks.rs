//! Backend calls off the UI thread.
//!
//! Each [`Job`] runs on its own short-lived worker thread and reports a
//! [`Completion`] over a channel the event loop drains every tick. Calls are
//! never cancelled; a completion that arrives after the view moved on is
//! still applied, which is harmless for the idempotent list refreshes.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::{ApiResult, ChatBackend, ChatReply, MessagePage, NewChat, SessionList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    LoadSessions,
    LoadSession(String),
    LoadHistory,
    DeleteSession(String),
    /// `pending_session_id` is the new-chat id the message was sent under
    SendChat { message: String, pending_session_id: Option<String> },
    /// `announce` is false when the new chat only rotates the server session
    /// after the active session was deleted
    NewChat { announce: bool },
    Clear,
}

#[derive(Debug)]
pub enum Completion {
    Sessions(ApiResult<SessionList>),
    Session { session_id: String, result: ApiResult<MessagePage> },
    History(ApiResult<MessagePage>),
    Deleted { session_id: String, result: ApiResult<()> },
    ChatReply { pending_session_id: Option<String>, result: ApiResult<ChatReply> },
    NewChat { announce: bool, result: ApiResult<NewChat> },
    Cleared(ApiResult<()>),
}

impl Job {
    fn run(self, backend: &dyn ChatBackend) -> Completion {
        match self {
            Job::LoadSessions => Completion::Sessions(backend.list_sessions()),
            Job::LoadSession(session_id) => {
                let result = backend.session_messages(&session_id);
                Completion::Session { session_id, result }
            }
            Job::LoadHistory => Completion::History(backend.current_history()),
            Job::DeleteSession(session_id) => {
                let result = backend.delete_session(&session_id);
                Completion::Deleted { session_id, result }
            }
            Job::SendChat { message, pending_session_id } => {
                let result = backend.send_chat(&message);
                Completion::ChatReply { pending_session_id, result }
            }
            Job::NewChat { announce } => Completion::NewChat { announce, result: backend.new_chat() },
            Job::Clear => Completion::Cleared(backend.clear()),
        }
    }
}

pub struct TaskRunner {
    backend: Arc<dyn ChatBackend>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl TaskRunner {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { backend, tx, rx, in_flight: 0 }
    }

    /// Start a job on a worker thread
    pub fn spawn(&mut self, job: Job) {
        debug!(?job, "spawning backend job");
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let completion = job.run(backend.as_ref());
            if tx.send(completion).is_err() {
                warn!("backend job finished after the UI shut down");
            }
        });
    }

    /// Next finished job, if any, without blocking
    pub fn try_next(&mut self) -> Option<Completion> {
        let completion = self.rx.try_recv().ok()?;
        self.in_flight -= 1;
        Some(completion)
    }

    /// Wait up to `timeout` for the next finished job
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<Completion> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight -= 1;
                Some(completion)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;

    fn runner() -> (Arc<MockBackend>, TaskRunner) {
        let backend = Arc::new(MockBackend::new());
        let runner = TaskRunner::new(Arc::clone(&backend) as Arc<dyn ChatBackend>);
        (backend, runner)
    }

    #[test]
    fn test_spawn_reports_completion() {
        let (backend, mut runner) = runner();
        runner.spawn(Job::LoadSessions);
        assert_eq!(runner.in_flight(), 1);

        let completion = runner.next_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(completion, Completion::Sessions(Ok(_))));
        assert_eq!(runner.in_flight(), 0);
        assert_eq!(backend.calls(), vec!["list_sessions".to_string()]);
    }

    #[test]
    fn test_session_completion_carries_id() {
        let (_backend, mut runner) = runner();
        runner.spawn(Job::DeleteSession("s-42".to_string()));

        match runner.next_timeout(Duration::from_secs(5)).unwrap() {
            Completion::Deleted { session_id, result } => {
                assert_eq!(session_id, "s-42");
                assert!(result.is_ok());
            }
            other => panic!("unexpected completion: {:?}", other),
        }
    }

    #[test]
    fn test_chat_completion_carries_pending_id() {
        let (backend, mut runner) = runner();
        runner.spawn(Job::SendChat {
            message: "hello".to_string(),
            pending_session_id: Some("fresh".to_string()),
        });

        match runner.next_timeout(Duration::from_secs(5)).unwrap() {
            Completion::ChatReply { pending_session_id, result } => {
                assert_eq!(pending_session_id.as_deref(), Some("fresh"));
                assert!(result.unwrap().success);
            }
            other => panic!("unexpected completion: {:?}", other),
        }
        assert_eq!(backend.calls(), vec!["send_chat:hello".to_string()]);
    }

    #[test]
    fn test_try_next_without_jobs() {
        let (_backend, mut runner) = runner();
        assert!(runner.try_next().is_none());
        assert!(runner.next_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_many_jobs_all_complete() {
        let (backend, mut runner) = runner();
        runner.spawn(Job::LoadHistory);
        runner.spawn(Job::Clear);
        runner.spawn(Job::NewChat { announce: true });

        let mut seen = 0;
        while runner.in_flight() > 0 {
            runner.next_timeout(Duration::from_secs(5)).unwrap();
            seen += 1;
        }
        assert_eq!(seen, 3);
        assert_eq!(backend.calls().len(), 3);
    }
}
