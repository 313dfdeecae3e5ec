//! In-memory interactions and handlers for unit tests.

use crate::client::CommandClient;
use crate::error::HandlerError;
use crate::handler::CommandHandler;
use crate::interaction::{AutocompleteChoice, AutocompleteInvocation, CommandInvocation, InvocationTarget, InvocationUser};
use crate::reply::Reply;
use async_trait::async_trait;
use chatbridge_common::UserId;
use chatbridge_i18n::I18n;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn at(seconds: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(seconds)
}

/// The shipped English and German translations.
pub fn test_i18n() -> Arc<I18n> {
    let i18n = I18n::from_sources([
        ("en-US", include_str!("../../../locales/en-US/main.ftl")),
        ("de", include_str!("../../../locales/de/main.ftl")),
    ])
    .unwrap();
    Arc::new(i18n)
}

/// Records every response instead of talking to Discord.
pub struct MockInvocation {
    name: String,
    user: InvocationUser,
    locale: String,
    options: HashMap<String, String>,
    target: InvocationTarget,
    responded: AtomicBool,
    replies: Mutex<Vec<Reply>>,
    edits: Mutex<Vec<Reply>>,
}

impl MockInvocation {
    pub fn new(name: &str, user: UserId) -> Self {
        Self {
            name: name.to_string(),
            user: InvocationUser {
                id: user,
                name: "tester".to_string(),
            },
            locale: "en-US".to_string(),
            options: HashMap::new(),
            target: InvocationTarget::None,
            responded: AtomicBool::new(false),
            replies: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn with_option(mut self, name: &str, value: &str) -> Self {
        self.options.insert(name.to_string(), value.to_string());
        self
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().clone()
    }

    pub fn edits(&self) -> Vec<Reply> {
        self.edits.lock().clone()
    }
}

#[async_trait]
impl CommandInvocation for MockInvocation {
    fn command_name(&self) -> &str {
        &self.name
    }

    fn user(&self) -> &InvocationUser {
        &self.user
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn string_option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn target(&self) -> &InvocationTarget {
        &self.target
    }

    fn has_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    async fn reply(&self, reply: Reply) -> Result<(), HandlerError> {
        self.responded.store(true, Ordering::SeqCst);
        self.replies.lock().push(reply);
        Ok(())
    }

    async fn edit_reply(&self, reply: Reply) -> Result<(), HandlerError> {
        self.edits.lock().push(reply);
        Ok(())
    }

    async fn defer(&self, _ephemeral: bool) -> Result<(), HandlerError> {
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// An autocomplete request with a single focused option.
pub struct MockAutocomplete {
    name: String,
    user: InvocationUser,
    locale: String,
    focused: (String, String),
    responses: Mutex<Vec<Vec<AutocompleteChoice>>>,
}

impl MockAutocomplete {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            user: InvocationUser {
                id: UserId(1),
                name: "tester".to_string(),
            },
            locale: "en-US".to_string(),
            focused: ("command".to_string(), value.to_string()),
            responses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn responses(&self) -> Vec<Vec<AutocompleteChoice>> {
        self.responses.lock().clone()
    }
}

#[async_trait]
impl AutocompleteInvocation for MockAutocomplete {
    fn command_name(&self) -> &str {
        &self.name
    }

    fn user(&self) -> &InvocationUser {
        &self.user
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn focused(&self) -> Option<(&str, &str)> {
        Some((self.focused.0.as_str(), self.focused.1.as_str()))
    }

    async fn respond(&self, choices: Vec<AutocompleteChoice>) -> Result<(), HandlerError> {
        self.responses.lock().push(choices);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy)]
enum Script {
    Succeed,
    Skip,
    Fail,
    FailAfterReply,
}

/// A handler whose result is fixed up front.
pub struct ScriptedHandler {
    script: Script,
    calls: CallCounter,
}

impl ScriptedHandler {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: CallCounter::default(),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(Script::Succeed)
    }

    pub fn skipping() -> Self {
        Self::new(Script::Skip)
    }

    pub fn failing() -> Self {
        Self::new(Script::Fail)
    }

    pub fn failing_after_reply() -> Self {
        Self::new(Script::FailAfterReply)
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }
}

#[async_trait]
impl CommandHandler for ScriptedHandler {
    async fn execute(&self, invocation: &dyn CommandInvocation, _client: &CommandClient) -> Result<bool, HandlerError> {
        self.calls.0.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Succeed => Ok(true),
            Script::Skip => Ok(false),
            Script::Fail => Err("handler exploded\nwith details".into()),
            Script::FailAfterReply => {
                invocation.reply(Reply::text("working on it")).await?;
                Err("failed after replying".into())
            }
        }
    }
}
