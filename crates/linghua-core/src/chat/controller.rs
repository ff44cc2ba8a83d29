//! Chat controller: validation, sanitization, rendering, persistence, and the
//! simulated-latency reply cycle.
//!
//! The send control has two states, Idle and Busy. A valid send moves to
//! Busy and schedules one reply task; the task renders and persists the
//! canned reply after the configured delay and moves back to Idle. Sends
//! while Busy are rejected, so at most one reply is ever pending.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use linghua_types::chat::{ChatHistory, ChatMessage, ChatRole};
use linghua_types::config::LinghuaConfig;
use linghua_types::error::ChatError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use super::escape::escape;
use super::history::HistoryStore;
use super::reply::ReplyEngine;
use super::view::ChatView;
use crate::storage::kv_store::KvStore;

/// Notice shown when the user sends an empty message.
pub const EMPTY_INPUT_NOTICE: &str = "请输入您的问题/需求！";

/// Confirmation prompt before clearing the history.
pub const CLEAR_CONFIRM_PROMPT: &str = "确定要清空所有对话记录吗？";

/// The reply task scheduled by the last accepted send.
struct PendingReply {
    /// Resolves to whether the reply was rendered and stored.
    handle: JoinHandle<bool>,
    cancel: CancellationToken,
}

/// Orchestrates one chat panel.
///
/// Generic over the key-value store and the view so the same flow drives the
/// terminal front end and in-memory transcripts.
pub struct ChatController<S: KvStore + 'static, V: ChatView + 'static> {
    history: Arc<Mutex<HistoryStore<S>>>,
    view: Arc<V>,
    replies: Arc<ReplyEngine>,
    greeting: String,
    quick_replies: Vec<String>,
    reply_delay: Duration,
    busy: Arc<AtomicBool>,
    /// Parent of every pending reply's token; cancelled on shutdown or drop.
    root: CancellationToken,
    pending: Option<PendingReply>,
}

impl<S: KvStore + 'static, V: ChatView + 'static> ChatController<S, V> {
    /// Create a controller with the default greeting, quick replies, reply
    /// table, and 800 ms simulated latency.
    pub fn new(history: HistoryStore<S>, view: Arc<V>) -> Self {
        Self::from_config(history, view, &LinghuaConfig::default())
    }

    /// Create a controller using the greeting, quick replies, and latency
    /// from `config`. The history cap is the one `history` was built with.
    pub fn from_config(history: HistoryStore<S>, view: Arc<V>, config: &LinghuaConfig) -> Self {
        Self {
            history: Arc::new(Mutex::new(history)),
            view,
            replies: Arc::new(ReplyEngine::default()),
            greeting: config.greeting.clone(),
            quick_replies: config.quick_replies.clone(),
            reply_delay: Duration::from_millis(config.reply_delay_ms),
            busy: Arc::new(AtomicBool::new(false)),
            root: CancellationToken::new(),
            pending: None,
        }
    }

    pub fn with_reply_engine(mut self, replies: ReplyEngine) -> Self {
        self.replies = Arc::new(replies);
        self
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.quick_replies
    }

    /// Whether a reply is pending (the send control is disabled).
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Snapshot of the current history.
    pub async fn history(&self) -> ChatHistory {
        self.history.lock().await.history().clone()
    }

    /// Render the greeting followed by every stored message, oldest first.
    #[tracing::instrument(name = "load_history", skip(self))]
    pub async fn load_history(&self) {
        self.view.reset();
        self.view.render(ChatRole::Assistant, &self.greeting);

        let history = self.history.lock().await;
        for message in history.history() {
            self.view.render(message.role, &message.content);
        }
        debug!(count = history.history().len(), "Chat history rendered");
    }

    /// Send a user message and schedule the canned reply.
    ///
    /// Empty (after trimming) input shows a notice and changes nothing.
    /// Input is escaped once here; the escaped text is what gets rendered,
    /// stored, and matched by the reply engine.
    #[tracing::instrument(
        name = "chat_send",
        skip(self, raw_input),
        fields(input_chars = raw_input.chars().count())
    )]
    pub async fn send(&mut self, raw_input: &str) -> Result<(), ChatError> {
        let trimmed = raw_input.trim();
        if trimmed.is_empty() {
            self.view.notify(EMPTY_INPUT_NOTICE);
            return Err(ChatError::EmptyInput);
        }

        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Send rejected while a reply is pending");
            return Err(ChatError::Busy);
        }

        let message = escape(trimmed);
        self.view.set_busy(true);
        self.view.render(ChatRole::User, &message);

        if let Err(e) = self
            .history
            .lock()
            .await
            .append(ChatMessage::user(message.clone()))
            .await
        {
            warn!(error = %e, "Failed to persist user message");
        }

        self.view.clear_input();
        self.schedule_reply(message);
        Ok(())
    }

    /// Send the quick reply at `index` exactly as if it had been typed.
    pub async fn send_quick_reply(&mut self, index: usize) -> Result<(), ChatError> {
        let text = self
            .quick_replies
            .get(index)
            .cloned()
            .ok_or(ChatError::UnknownQuickReply(index))?;
        self.send(&text).await
    }

    /// Ask for confirmation, then clear the history and re-render the panel.
    ///
    /// Returns whether the history was cleared. A pending reply still fires
    /// afterwards and lands in the fresh history.
    #[tracing::instrument(name = "chat_clear", skip(self), fields(pending = self.pending.is_some()))]
    pub async fn clear(&mut self) -> bool {
        if !self.view.confirm(CLEAR_CONFIRM_PROMPT) {
            debug!("History clear declined");
            return false;
        }

        if let Err(e) = self.history.lock().await.clear().await {
            warn!(error = %e, "Failed to remove persisted chat history");
        }
        info!("Chat history cleared");

        self.load_history().await;
        true
    }

    /// Wait until the pending reply (if any) has fired.
    pub async fn wait_for_reply(&mut self) {
        self.join_pending().await;
    }

    /// Cancel the pending reply before it fires.
    ///
    /// Returns `true` when the reply was stopped: nothing was rendered or
    /// stored and the controller is Idle again. Returns `false` when nothing
    /// was pending or the reply had already been delivered.
    pub async fn cancel_pending(&mut self) -> bool {
        let Some(pending) = self.pending.as_ref() else {
            return false;
        };
        pending.cancel.cancel();
        matches!(self.join_pending().await, Some(false))
    }

    /// Cancel any pending reply. Replies scheduled afterwards are cancelled
    /// as soon as they start.
    pub async fn shutdown(&mut self) {
        self.root.cancel();
        self.join_pending().await;
    }

    /// Await the pending task. `Some(replied)` when there was one.
    async fn join_pending(&mut self) -> Option<bool> {
        let pending = self.pending.take()?;
        match pending.handle.await {
            Ok(replied) => Some(replied),
            Err(e) => {
                warn!(error = %e, "Reply task failed");
                self.busy.store(false, Ordering::SeqCst);
                self.view.set_busy(false);
                Some(false)
            }
        }
    }

    fn schedule_reply(&mut self, message: String) {
        let cancel = self.root.child_token();
        let token = cancel.clone();
        let history = Arc::clone(&self.history);
        let view = Arc::clone(&self.view);
        let replies = Arc::clone(&self.replies);
        let busy = Arc::clone(&self.busy);
        let delay = self.reply_delay;

        let span = info_span!("chat_reply", delay_ms = delay.as_millis() as u64);
        let handle = tokio::spawn(
            async move {
                let replied = tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Pending reply cancelled");
                        false
                    }
                    _ = tokio::time::sleep(delay) => {
                        let reply = replies.reply(&message);
                        view.render(ChatRole::Assistant, &reply);
                        if let Err(e) = history
                            .lock()
                            .await
                            .append(ChatMessage::assistant(reply))
                            .await
                        {
                            warn!(error = %e, "Failed to persist assistant reply");
                        }
                        true
                    }
                };
                busy.store(false, Ordering::SeqCst);
                view.set_busy(false);
                replied
            }
            .instrument(span),
        );

        self.pending = Some(PendingReply { handle, cancel });
    }
}

impl<S: KvStore + 'static, V: ChatView + 'static> Drop for ChatController<S, V> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::html::HtmlTranscript;
    use crate::chat::reply::{INDUSTRY_STATS, MARKETING_TIPS, fallback_reply};
    use crate::storage::memory::MemoryKvStore;

    const KEY: &str = "linghuaqian-chat";

    fn controller(view: Arc<HtmlTranscript>) -> ChatController<MemoryKvStore, HtmlTranscript> {
        ChatController::new(HistoryStore::new(MemoryKvStore::new(), KEY), view)
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_then_reply_cycle() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("  wash marketing  ").await.unwrap();
        assert!(chat.is_busy());
        assert!(view.is_busy());
        assert_eq!(view.len(), 1);
        assert_eq!(view.bubbles()[0].content, "wash marketing");
        assert_eq!(view.inputs_cleared(), 1);

        chat.wait_for_reply().await;
        assert!(!chat.is_busy());
        assert!(!view.is_busy());

        let bubbles = view.bubbles();
        assert_eq!(bubbles.len(), 2);
        assert_eq!(bubbles[1].role, ChatRole::Assistant);
        assert_eq!(bubbles[1].content, MARKETING_TIPS);
        assert_eq!(view.scroll_position(), Some(1));

        let history = chat.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history.messages()[1].content, MARKETING_TIPS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_delay() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("banana").await.unwrap();
        tokio::time::sleep(Duration::from_millis(799)).await;
        assert_eq!(view.len(), 1);
        assert!(chat.is_busy());

        chat.wait_for_reply().await;
        assert_eq!(view.bubbles()[1].content, fallback_reply("banana"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_is_rejected_without_state_change() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        let err = chat.send("   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyInput));
        assert_eq!(view.notices(), vec![EMPTY_INPUT_NOTICE.to_string()]);
        assert!(view.is_empty());
        assert!(!chat.is_busy());
        assert!(chat.history().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_send_while_busy_is_rejected() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("first").await.unwrap();
        let err = chat.send("second").await.unwrap_err();
        assert!(matches!(err, ChatError::Busy));

        chat.wait_for_reply().await;
        let bubbles = view.bubbles();
        assert_eq!(bubbles.len(), 2);
        assert_eq!(bubbles[0].content, "first");
        assert_eq!(bubbles[1].content, fallback_reply("first"));
        assert_eq!(chat.history().await.len(), 2);

        // Idle again: the next send goes through.
        chat.send("second").await.unwrap();
        chat.wait_for_reply().await;
        assert_eq!(view.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_escaped_once() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("<b>hi</b> & 'you'").await.unwrap();
        chat.wait_for_reply().await;

        let escaped = "&lt;b&gt;hi&lt;/b&gt; &amp; &#039;you&#039;";
        let history = chat.history().await;
        assert_eq!(history.messages()[0].content, escaped);
        assert_eq!(view.bubbles()[1].content, fallback_reply(escaped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_returns_to_idle() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("data").await.unwrap();
        assert!(chat.cancel_pending().await);
        assert!(!chat.is_busy());
        assert!(!view.is_busy());
        assert_eq!(view.len(), 1);
        assert_eq!(chat.history().await.len(), 1);

        assert!(!chat.cancel_pending().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_confirmed() {
        let view = Arc::new(HtmlTranscript::with_confirm(true));
        let mut chat = controller(Arc::clone(&view));

        chat.send("data").await.unwrap();
        chat.wait_for_reply().await;

        assert!(chat.clear().await);
        assert!(chat.history().await.is_empty());
        let bubbles = view.bubbles();
        assert_eq!(bubbles.len(), 1);
        assert_eq!(bubbles[0].content, chat.greeting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_reply_started_reports_delivery() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("data").await.unwrap();

        // Hold the history so the reply task fires but parks on the lock.
        let history = Arc::clone(&chat.history);
        let guard = history.lock().await;
        tokio::time::sleep(Duration::from_millis(801)).await;
        assert_eq!(view.len(), 2);

        let cancelled = {
            let cancel = chat.cancel_pending();
            drop(guard);
            cancel.await
        };
        assert!(!cancelled);
        assert!(!chat.is_busy());
        assert_eq!(chat.history().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_keeps_pending_reply() {
        let view = Arc::new(HtmlTranscript::with_confirm(true));
        let mut chat = controller(Arc::clone(&view));

        chat.send("data").await.unwrap();
        assert!(chat.clear().await);
        assert!(chat.is_busy());

        chat.wait_for_reply().await;
        assert!(!chat.is_busy());

        let history = chat.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].role, ChatRole::Assistant);
        assert_eq!(history.messages()[0].content, INDUSTRY_STATS);

        let bubbles = view.bubbles();
        assert_eq!(bubbles.len(), 2);
        assert_eq!(bubbles[0].content, chat.greeting());
        assert_eq!(bubbles[1].content, INDUSTRY_STATS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_reply() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));

        chat.send("data").await.unwrap();
        chat.shutdown().await;
        assert!(!chat.is_busy());
        assert_eq!(view.len(), 1);
        assert_eq!(chat.history().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_reply() {
        let view = Arc::new(HtmlTranscript::new());
        {
            let mut chat = controller(Arc::clone(&view));
            chat.send("data").await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(view.len(), 1);
        assert!(!view.is_busy());
    }

    /// Records the name of every span opened while installed.
    #[derive(Clone, Default)]
    struct SpanNames(Arc<std::sync::Mutex<Vec<&'static str>>>);

    impl<T: tracing::Subscriber> tracing_subscriber::Layer<T> for SpanNames {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::span::Id,
            _ctx: tracing_subscriber::layer::Context<'_, T>,
        ) {
            self.0.lock().unwrap().push(attrs.metadata().name());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_and_reply_open_spans() {
        use tracing_subscriber::layer::SubscriberExt;

        let names = SpanNames::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(names.clone()));

        let view = Arc::new(HtmlTranscript::with_confirm(true));
        let mut chat = controller(Arc::clone(&view));
        chat.send("wash marketing").await.unwrap();
        chat.wait_for_reply().await;
        chat.clear().await;

        let seen = names.0.lock().unwrap().clone();
        for expected in ["chat_send", "chat_reply", "history_append", "chat_clear", "history_clear", "load_history"] {
            assert!(seen.contains(&expected), "missing span {expected}: {seen:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_declined_is_noop() {
        let view = Arc::new(HtmlTranscript::with_confirm(false));
        let mut chat = controller(Arc::clone(&view));

        chat.send("data").await.unwrap();
        chat.wait_for_reply().await;

        assert!(!chat.clear().await);
        assert_eq!(chat.history().await.len(), 2);
        assert_eq!(view.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_renders_greeting_plus_history() {
        let first_view = Arc::new(HtmlTranscript::new());
        let mut first = controller(Arc::clone(&first_view));
        for text in ["one", "洗车数据"] {
            first.send(text).await.unwrap();
            first.wait_for_reply().await;
        }
        let stored = first.history().await;
        let raw = serde_json::to_string(&stored).unwrap();

        let view = Arc::new(HtmlTranscript::new());
        let history = HistoryStore::open(MemoryKvStore::new().with_value(KEY, &raw), KEY, 100).await;
        let second = ChatController::new(history, Arc::clone(&view));
        second.load_history().await;

        let bubbles = view.bubbles();
        assert_eq!(bubbles.len(), stored.len() + 1);
        assert_eq!(bubbles[0].content, second.greeting());
        for (bubble, message) in bubbles[1..].iter().zip(stored.iter()) {
            assert_eq!(bubble.role, message.role);
            assert_eq!(bubble.content, message.content);
        }
        assert_eq!(bubbles[4].content, INDUSTRY_STATS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_reply_sends_preset_text() {
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view));
        let preset = chat.quick_replies()[1].clone();

        chat.send_quick_reply(1).await.unwrap();
        chat.wait_for_reply().await;
        assert_eq!(view.bubbles()[0].content, preset);
        assert_eq!(view.bubbles()[1].content, INDUSTRY_STATS);

        let err = chat.send_quick_reply(99).await.unwrap_err();
        assert!(matches!(err, ChatError::UnknownQuickReply(99)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_is_not_fatal() {
        let store = HistoryStore::new(MemoryKvStore::new(), KEY);
        store.store().set_fail_writes(true);
        let view = Arc::new(HtmlTranscript::new());
        let mut chat = ChatController::new(store, Arc::clone(&view));

        chat.send("banana").await.unwrap();
        chat.wait_for_reply().await;
        assert_eq!(view.len(), 2);
        assert!(!chat.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay_and_rules() {
        use crate::chat::reply::ReplyRule;

        let view = Arc::new(HtmlTranscript::new());
        let mut chat = controller(Arc::clone(&view))
            .with_reply_delay(Duration::from_millis(10))
            .with_reply_engine(ReplyEngine::new(vec![
                ReplyRule::new("price", "价格表").requires_any(&["price"]),
            ]));

        chat.send("price?").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(view.bubbles()[1].content, "价格表");
        assert!(!chat.is_busy());
    }
}
