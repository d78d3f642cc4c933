//! The interactive profile screen.
//!
//! Raw terminal key events are converted to [`KeyInput`] and dispatched on an
//! [`InputSurface`]; the screen's [`HotkeyScope`] keeps the listener in step
//! with the store. Handlers report back through a notice channel that the
//! event loop prints.

use std::{
    io::{self, Write},
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    terminal,
};
use futures::StreamExt;
use hotkeys::{
    Action, BindingStore, HotkeyHandlers, HotkeyScope, InputSurface, KeyInput, RunControls,
    event_to_combo,
};
use logging::LogBuffer;
use time::OffsetDateTime;
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    time::interval,
};
use tracing::{debug, warn};

use crate::{
    commands::write_table,
    error::Result,
    export::{export_log, render_lines},
};

/// How often the log tail is refreshed.
const TAIL_EVERY: Duration = Duration::from_millis(250);

/// What the event loop does after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading keys.
    Continue,
    /// Leave the screen.
    Quit,
}

/// Everything the screen's handlers need besides the store.
#[derive(Debug, Clone)]
pub struct ScreenContext {
    /// Scheduler controls for the profile.
    pub controls: RunControls,
    /// Session log, exported by `export-log` and tailed while auto-scroll is on.
    pub log: LogBuffer,
    /// Where exports are written.
    pub export_dir: PathBuf,
}

/// A profile screen bound to one input surface.
pub struct ProfileScreen {
    /// Configuration source.
    store: BindingStore,
    /// Where key events are delivered.
    surface: InputSurface,
    /// Listener registration.
    scope: HotkeyScope,
    /// Stable handler set; rebuilt only when the screen is created.
    handlers: Arc<HotkeyHandlers>,
    /// Whether new log lines are echoed.
    autoscroll: Arc<AtomicBool>,
}

impl ProfileScreen {
    /// Build the screen and its handler set. Notices from handlers go to `notices`.
    pub fn new(
        store: BindingStore,
        surface: InputSurface,
        ctx: ScreenContext,
        notices: UnboundedSender<String>,
    ) -> Self {
        let autoscroll = Arc::new(AtomicBool::new(true));
        let handlers = Arc::new(build_handlers(&store, ctx, &autoscroll, notices));
        Self {
            scope: HotkeyScope::new(surface.clone()),
            store,
            surface,
            handlers,
            autoscroll,
        }
    }

    /// Rebind against the store's current configuration.
    pub fn refresh(&mut self) {
        self.scope.update(self.store.hotkeys().as_ref(), &self.handlers);
    }

    /// Whether the log tail is on.
    pub fn autoscroll(&self) -> bool {
        self.autoscroll.load(Ordering::SeqCst)
    }

    /// Deliver one key. `Ctrl+C` always quits; `q` quits unless a binding
    /// consumed it.
    pub fn handle_key(&mut self, input: KeyInput) -> Flow {
        if input.ctrl && input.key.eq_ignore_ascii_case("c") {
            return Flow::Quit;
        }
        let delivered = self.surface.dispatch(input);
        if !delivered.default_prevented() && event_to_combo(&delivered).as_deref() == Some("q") {
            return Flow::Quit;
        }
        Flow::Continue
    }
}

/// Handlers for every [`Action`].
fn build_handlers(
    store: &BindingStore,
    ctx: ScreenContext,
    autoscroll: &Arc<AtomicBool>,
    notices: UnboundedSender<String>,
) -> HotkeyHandlers {
    let mut handlers = HotkeyHandlers::new();
    handlers.insert(Action::ToggleRun.id(), ctx.controls.toggle_handler());

    let export = {
        let notices = notices.clone();
        move || {
            let Ok(rt) = Handle::try_current() else {
                warn!("export-log needs a runtime");
                return;
            };
            let (dir, profile) = (ctx.export_dir.clone(), ctx.controls.profile_id().to_string());
            let lines = ctx.log.lines();
            let notices = notices.clone();
            rt.spawn(async move {
                let msg = match export_log(&dir, &profile, &lines, OffsetDateTime::now_utc()).await {
                    Ok(path) => format!("log exported to {}", path.display()),
                    Err(e) => {
                        warn!(error = %e, "log export failed");
                        format!("log export failed: {e}")
                    }
                };
                let _ignored = notices.send(msg);
            });
        }
    };

    let scroll = {
        let flag = Arc::clone(autoscroll);
        let notices = notices.clone();
        move || {
            let on = !flag.fetch_xor(true, Ordering::SeqCst);
            debug!(on, "auto-scroll toggled");
            let _ignored = notices.send(format!("auto-scroll {}", if on { "on" } else { "off" }));
        }
    };

    let open = {
        let store = store.clone();
        move || {
            let mut table = Vec::new();
            let records = store.hotkeys().unwrap_or_default();
            if write_table(&mut table, &records).is_ok() {
                let _ignored = notices.send(String::from_utf8_lossy(&table).trim_end().to_string());
            }
        }
    };

    handlers
        .on(Action::ExportLog.id(), export)
        .on(Action::ToggleScroll.id(), scroll)
        .on(Action::OpenHotkeys.id(), open)
}

/// Puts the terminal in raw mode until dropped.
struct RawMode;

impl RawMode {
    /// Enter raw mode.
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ignored = terminal::disable_raw_mode();
    }
}

/// Print `text` in raw mode, where a bare `\n` does not return the carriage.
fn print_raw(out: &mut impl Write, text: &str) -> io::Result<()> {
    for line in text.lines() {
        write!(out, "{line}\r\n")?;
    }
    out.flush()
}

/// Run the screen until the user quits.
pub async fn run(
    mut screen: ProfileScreen,
    log: LogBuffer,
    mut notices: UnboundedReceiver<String>,
) -> Result<()> {
    let mut out = io::stdout();
    let _raw = RawMode::enable()?;
    print_raw(&mut out, "profile screen: bound hotkeys are live; q or Ctrl+C quits")?;

    let mut changes = screen.store.subscribe();
    if let Some(load) = screen.store.set_enabled(true) {
        tokio::spawn(load);
    }
    screen.refresh();

    let mut events = EventStream::new();
    let mut tail = interval(TAIL_EVERY);
    let (mut seen, _) = log.since(0);
    loop {
        tokio::select! {
            ev = events.next() => match ev {
                Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                    if screen.handle_key(KeyInput::from(key)) == Flow::Quit {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                screen.refresh();
                let error = changes.borrow_and_update().error.clone();
                if let Some(err) = error {
                    print_raw(&mut out, &format!("hotkeys: {err}; using built-in bindings"))?;
                }
            }
            Some(msg) = notices.recv() => print_raw(&mut out, &msg)?,
            _ = tail.tick() => {
                let (next, lines) = log.since(seen);
                seen = next;
                if screen.autoscroll() && !lines.is_empty() {
                    print_raw(&mut out, &render_lines(&lines)?)?;
                }
            }
        }
    }
    Ok(())
}

/// Channel for handler notices.
pub fn notice_channel() -> (UnboundedSender<String>, UnboundedReceiver<String>) {
    mpsc::unbounded_channel()
}

impl ScreenContext {
    /// Context writing exports to `export_dir`.
    pub fn new(controls: RunControls, log: LogBuffer, export_dir: PathBuf) -> Self {
        Self {
            controls,
            log,
            export_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, time::SystemTime};

    use hotkeys::{
        BindingRecord, Modifier, SchedulerClient, SchedulerCommand, Trigger,
        identity_translator, test_support::MemoryGateway,
    };
    use logging::LogLine;

    use super::*;

    struct Fixture {
        screen: ProfileScreen,
        notices: UnboundedReceiver<String>,
        requests: UnboundedReceiver<Trigger>,
        log: LogBuffer,
        _dir: tempfile::TempDir,
        dir: PathBuf,
    }

    async fn fixture(records: Vec<BindingRecord>) -> Fixture {
        let store = BindingStore::new(Arc::new(MemoryGateway::with(records)), identity_translator());
        store.set_enabled(true).expect("load").await;
        let (client, requests) = SchedulerClient::channel();
        let log = LogBuffer::new(16);
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("exports");
        let ctx = ScreenContext::new(RunControls::new(client, "p1"), log.clone(), dir.clone());
        let (tx, notices) = notice_channel();
        let mut screen = ProfileScreen::new(store, InputSurface::new(), ctx, tx);
        screen.refresh();
        Fixture {
            screen,
            notices,
            requests,
            log,
            _dir: tmp,
            dir,
        }
    }

    fn ctrl(key: &str) -> KeyInput {
        KeyInput::new(key).with(Modifier::Ctrl)
    }

    #[tokio::test]
    async fn ctrl_c_always_quits() {
        let mut f = fixture(vec![BindingRecord::new("toggle-run", "ctrl+c")]).await;
        assert_eq!(f.screen.handle_key(ctrl("c")), Flow::Quit);
        assert!(f.requests.try_recv().is_err());
    }

    #[tokio::test]
    async fn q_quits_unless_bound() {
        let mut f = fixture(Vec::new()).await;
        assert_eq!(f.screen.handle_key(KeyInput::new("q")), Flow::Quit);
        assert_eq!(f.screen.handle_key(KeyInput::new("w")), Flow::Continue);

        let mut f = fixture(vec![BindingRecord::new("toggle-scroll", "q")]).await;
        assert_eq!(f.screen.handle_key(KeyInput::new("q")), Flow::Continue);
        assert!(!f.screen.autoscroll());
    }

    #[tokio::test]
    async fn toggle_scroll_flips_and_reports() {
        let mut f = fixture(vec![BindingRecord::new("toggle-scroll", "ctrl+s")]).await;
        assert!(f.screen.autoscroll());
        f.screen.handle_key(ctrl("s"));
        assert!(!f.screen.autoscroll());
        assert_eq!(f.notices.recv().await.as_deref(), Some("auto-scroll off"));
        f.screen.handle_key(ctrl("s"));
        assert_eq!(f.notices.recv().await.as_deref(), Some("auto-scroll on"));
    }

    #[tokio::test]
    async fn default_toggle_run_requests_start() {
        let mut f = fixture(Vec::new()).await;
        f.screen.handle_key(KeyInput::new("F5"));
        let t = f.requests.recv().await.expect("request");
        assert_eq!(t.request.command, SchedulerCommand::StartScheduler);
        assert_eq!(t.request.config_id, "p1");
    }

    #[tokio::test]
    async fn open_hotkeys_lists_bindings() {
        let mut f = fixture(Vec::new()).await;
        f.screen.handle_key(ctrl("k"));
        let table = f.notices.recv().await.expect("notice");
        assert!(table.contains("open-hotkeys"));
        assert!(table.contains("ctrl+k"));
    }

    #[tokio::test]
    async fn export_log_writes_session_log() {
        let mut f = fixture(Vec::new()).await;
        f.log.push(LogLine {
            at: SystemTime::UNIX_EPOCH,
            level: "INFO".into(),
            message: "hello".into(),
        });
        f.screen.handle_key(ctrl("e"));
        let notice = f.notices.recv().await.expect("notice");
        assert!(notice.starts_with("log exported to"), "{notice}");

        let mut entries = fs::read_dir(&f.dir).expect("dir created");
        let file = entries.next().expect("one file").expect("entry").path();
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        assert!(name.starts_with("logs-p1-") && name.ends_with(".txt"), "{name}");
        let body = fs::read_to_string(file).expect("read");
        assert_eq!(body, "[1970-01-01 00:00:00] INFO: hello\n");
    }
}
