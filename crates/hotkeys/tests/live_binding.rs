use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use hotkeys::{
    Action, BindingRecord, BindingStore, HotkeyHandlers, HotkeyScope, InputSurface, KeyInput,
    Modifier, RunControls, SchedulerClient, SchedulerCommand, identity_translator,
    test_support::MemoryGateway,
};

fn ctrl_k() -> KeyInput {
    KeyInput::new("K").with(Modifier::Ctrl)
}

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
    let n = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&n);
    (n, move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
}

async fn loaded_store(records: Vec<BindingRecord>) -> BindingStore {
    let store = BindingStore::new(Arc::new(MemoryGateway::with(records)), identity_translator());
    store.set_enabled(true).expect("load").await;
    store
}

#[tokio::test]
async fn loaded_binding_fires_handler() {
    let store = loaded_store(vec![BindingRecord::new("toggle-run", "Ctrl+K")]).await;
    let surface = InputSurface::new();
    let (hits, f) = counter();
    let handlers = Arc::new(HotkeyHandlers::new().on("toggle-run", f));

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);

    let ev = surface.dispatch(ctrl_k());
    assert!(ev.default_prevented());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn nothing_fires_before_configuration_loads() {
    let store = BindingStore::new(Arc::new(MemoryGateway::default()), identity_translator());
    let surface = InputSurface::new();
    let (hits, f) = counter();
    let handlers = Arc::new(HotkeyHandlers::new().on(Action::OpenHotkeys.id(), f));

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);
    assert!(!surface.dispatch(ctrl_k()).default_prevented());

    // Defaults bind open-hotkeys to ctrl+k once loaded.
    store.reload().await;
    scope.update(store.hotkeys().as_ref(), &handlers);
    assert!(surface.dispatch(ctrl_k()).default_prevented());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unmounted_scope_fires_nothing() {
    let store = loaded_store(vec![BindingRecord::new("toggle-run", "ctrl+k")]).await;
    let surface = InputSurface::new();
    let (hits, f) = counter();
    let handlers = Arc::new(HotkeyHandlers::new().on("toggle-run", f));

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);
    drop(scope);

    assert_eq!(surface.listener_count(), 0);
    assert!(!surface.dispatch(ctrl_k()).default_prevented());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn new_handler_set_replaces_old_closure() {
    let store = loaded_store(vec![BindingRecord::new("a", "ctrl+k")]).await;
    let surface = InputSurface::new();
    let (hits1, f1) = counter();
    let (hits2, f2) = counter();

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &Arc::new(HotkeyHandlers::new().on("a", f1)));
    scope.update(store.hotkeys().as_ref(), &Arc::new(HotkeyHandlers::new().on("a", f2)));

    surface.dispatch(ctrl_k());
    surface.dispatch(ctrl_k());
    assert_eq!(hits1.load(Ordering::SeqCst), 0);
    assert_eq!(hits2.load(Ordering::SeqCst), 2);
    assert_eq!(surface.listener_count(), 1);
}

#[tokio::test]
async fn duplicate_combos_dispatch_to_later_record() {
    let store = loaded_store(vec![
        BindingRecord::new("a", "Ctrl+K"),
        BindingRecord::new("b", "ctrl+k"),
    ])
    .await;
    let surface = InputSurface::new();
    let (hits_a, fa) = counter();
    let (hits_b, fb) = counter();
    let handlers = Arc::new(HotkeyHandlers::new().on("a", fa).on("b", fb));

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);
    surface.dispatch(ctrl_k());
    assert_eq!(hits_a.load(Ordering::SeqCst), 0);
    assert_eq!(hits_b.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn one_malformed_record_does_not_break_the_rest() {
    let store = loaded_store(vec![
        BindingRecord::new("a", "ctrl+???"),
        BindingRecord::new("b", "ctrl+k"),
    ])
    .await;
    let surface = InputSurface::new();
    let (hits_b, fb) = counter();
    let handlers = Arc::new(HotkeyHandlers::new().on("a", || panic!("never")).on("b", fb));

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);
    assert_eq!(scope.table().map(|t| t.combos()), Some(vec!["ctrl+k"]));
    surface.dispatch(ctrl_k());
    assert_eq!(hits_b.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_panics_propagate_and_leave_binding_intact() {
    let store = loaded_store(vec![BindingRecord::new("a", "ctrl+k")]).await;
    let surface = InputSurface::new();
    let handlers = Arc::new(HotkeyHandlers::new().on("a", || panic!("handler failed")));

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);

    let outcome = catch_unwind(AssertUnwindSafe(|| surface.dispatch(ctrl_k())));
    assert!(outcome.is_err());
    assert_eq!(surface.listener_count(), 1);
}

#[tokio::test]
async fn toggle_run_hotkey_issues_scheduler_requests() {
    let store = loaded_store(vec![BindingRecord::new("toggle-run", "f5")]).await;
    let surface = InputSurface::new();
    let (client, mut rx) = SchedulerClient::channel();
    let controls = RunControls::new(client, "profile-1");

    let mut handlers = HotkeyHandlers::new();
    handlers.insert(Action::ToggleRun.id(), controls.toggle_handler());
    let handlers = Arc::new(handlers);

    let mut scope = HotkeyScope::new(surface.clone());
    scope.update(store.hotkeys().as_ref(), &handlers);

    surface.dispatch(KeyInput::new("F5"));
    let t = rx.recv().await.expect("request");
    assert_eq!(t.request.command, SchedulerCommand::StartScheduler);
    assert_eq!(t.request.config_id, "profile-1");

    controls.set_running(true);
    surface.dispatch(KeyInput::new("F5"));
    let t = rx.recv().await.expect("request");
    assert_eq!(t.request.command, SchedulerCommand::StopScheduler);
}
