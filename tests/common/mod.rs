//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use hubhook_dispatch::{
    EventKind, HandlerResult, HookError, HookEvent, HookVerdict, Notifier, NotifyError,
    ScriptManager, ScriptSpec,
};

/// Notifier that records every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Notices sent to `nick`, in order.
    pub fn texts_for(&self, nick: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(to, _)| to == nick)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .push((recipient.to_string(), text.to_string()));
        Ok(())
    }
}

/// Test application context
pub struct TestHub {
    pub manager: ScriptManager,
    pub notices: Arc<RecordingNotifier>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl TestHub {
    pub fn new() -> Self {
        let notices = Arc::new(RecordingNotifier::default());
        Self {
            manager: ScriptManager::new(notices.clone()),
            notices,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handler that records `label` and answers with `verdict`.
    pub fn recorder(
        &self,
        label: &str,
        verdict: HookVerdict,
    ) -> impl Fn(&HookEvent) -> HandlerResult + Send + Sync + use<> {
        let calls = self.calls.clone();
        let label = label.to_string();
        move |_| {
            calls.lock().push(label.clone());
            Ok(verdict)
        }
    }

    /// Handler that records `label` and then fails.
    pub fn failing(
        &self,
        label: &str,
    ) -> impl Fn(&HookEvent) -> HandlerResult + Send + Sync + use<> {
        let calls = self.calls.clone();
        let label = label.to_string();
        move |_| {
            calls.lock().push(label.clone());
            Err(HookError::failed(format!("{label} broke")))
        }
    }

    /// Registers a script with one recording handler on `kind`.
    pub fn add(
        &self,
        name: &str,
        kind: EventKind,
        priority: i32,
        verdict: HookVerdict,
    ) -> hubhook_dispatch::ScriptId {
        self.manager.register(
            ScriptSpec::new(name)
                .priority(priority)
                .on(kind, self.recorder(name, verdict)),
        )
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

pub fn chat(nick: &str, message: &str) -> HookEvent {
    HookEvent::OnParsedMsgChat {
        nick: nick.to_string(),
        message: message.to_string(),
    }
}
