//! Administrative hub command surface.

mod common;

use hubhook_dispatch::{EventKind, HookVerdict, ScriptManager, ScriptSpec};
use hubhook_core::config::dispatcher::DispatcherConfig;

use common::{RecordingNotifier, TestHub};

#[test]
fn test_list_below_master_class_is_refused() {
    let hub = TestHub::new();
    hub.add("secret", EventKind::OnTimer, 100, HookVerdict::Allow);

    let verdict = hub
        .manager
        .on_hub_command("guest", "dispatcher list", 3, true, "!");

    assert_eq!(verdict, HookVerdict::Block);
    assert_eq!(
        hub.notices.texts_for("guest"),
        vec!["Permission denied. Master class required.".to_string()]
    );
}

#[test]
fn test_list_shows_state_hooks_and_priority() {
    let hub = TestHub::new();
    hub.manager.register(
        ScriptSpec::new("ChatLogger")
            .priority(50)
            .on(EventKind::OnParsedMsgChat, |_| Ok(HookVerdict::Allow))
            .on(EventKind::OnUserLogin, |_| Ok(HookVerdict::Allow)),
    );
    let off = hub.add("Muted", EventKind::OnTimer, 100, HookVerdict::Allow);
    hub.manager.disable(off);

    let verdict = hub
        .manager
        .on_hub_command("root", "dispatcher list", 10, true, "!");

    assert_eq!(verdict, HookVerdict::Block);
    assert_eq!(
        hub.notices.texts_for("root"),
        vec![
            "Registered Scripts (2):".to_string(),
            "  [on] ID=1: ChatLogger (2 hooks, priority=50)".to_string(),
            "  [off] ID=2: Muted (1 hooks, priority=100)".to_string(),
        ]
    );
}

#[test]
fn test_stats_lists_attempted_kinds() {
    let hub = TestHub::new();
    hub.manager.register(
        ScriptSpec::new("broken").on(EventKind::OnFlood, hub.failing("broken")),
    );
    hub.manager.on_flood("a", "b");
    hub.manager.on_timer(1);

    hub.manager
        .on_hub_command("root", "dispatcher stats", 10, false, "!");

    assert_eq!(
        hub.notices.texts_for("root"),
        vec![
            "Dispatcher Statistics:".to_string(),
            "  Total scripts: 1".to_string(),
            "  Active scripts: 1".to_string(),
            "  Disabled scripts: 0".to_string(),
            "  Hook calls:".to_string(),
            "    OnTimer: 1 calls (0 failed)".to_string(),
            "    OnHubCommand: 1 calls (0 failed)".to_string(),
            "    OnFlood: 1 calls (1 failed)".to_string(),
        ]
    );
}

#[test]
fn test_disable_then_enable_via_commands() {
    let hub = TestHub::new();
    let id = hub.add("toggle", EventKind::OnUserLogin, 100, HookVerdict::Allow);

    hub.manager
        .on_hub_command("root", &format!("dispatcher disable {id}"), 10, true, "!");
    hub.manager.on_user_login("a");
    assert!(hub.calls().is_empty());

    hub.manager
        .on_hub_command("root", &format!("dispatcher enable {id}"), 10, true, "!");
    hub.manager.on_user_login("a");
    assert_eq!(hub.calls(), vec!["toggle"]);

    assert_eq!(
        hub.notices.texts_for("root"),
        vec![
            format!("Script ID {id} disabled"),
            format!("Script ID {id} enabled"),
        ]
    );
}

#[test]
fn test_script_can_claim_a_command_first() {
    let hub = TestHub::new();
    hub.add("greedy", EventKind::OnHubCommand, 1, HookVerdict::Block);

    let verdict = hub
        .manager
        .on_hub_command("root", "dispatcher list", 10, true, "!");

    assert_eq!(verdict, HookVerdict::Block);
    assert_eq!(hub.calls(), vec!["greedy"]);
    assert!(hub.notices.texts_for("root").is_empty());
}

#[test]
fn test_foreign_commands_pass_through() {
    let hub = TestHub::new();
    hub.add("observer", EventKind::OnHubCommand, 100, HookVerdict::Allow);

    let verdict = hub.manager.on_hub_command("root", "topic hi", 10, false, "!");

    assert_eq!(verdict, HookVerdict::Allow);
    assert_eq!(hub.calls(), vec!["observer"]);
    assert!(hub.notices.texts_for("root").is_empty());
}

#[test]
fn test_configured_threshold_and_word() {
    let notices = std::sync::Arc::new(RecordingNotifier::default());
    let config = DispatcherConfig {
        admin_class: 5,
        admin_command: "hooks".to_string(),
        ..DispatcherConfig::default()
    };
    let manager = ScriptManager::with_config(&config, notices.clone());

    assert_eq!(
        manager.on_hub_command("op", "dispatcher list", 5, true, "!"),
        HookVerdict::Allow
    );
    assert_eq!(
        manager.on_hub_command("op", "hooks list", 5, true, "!"),
        HookVerdict::Block
    );
    assert_eq!(
        notices.texts_for("op"),
        vec!["Registered Scripts (0):".to_string()]
    );
}
