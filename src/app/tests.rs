use std::sync::Arc;

use super::*;
use super::events::{AppEvent, task};
use crate::input::Action;
use crate::mail::{Content, Item, ItemFlags};
use crate::testing::{FakeForwarder, FakeGenerator, FakeMailbox, items};

fn app_with(mailbox: &Arc<FakeMailbox>) -> App {
    App::new(Config::default(), Collaborators::new(mailbox.clone()))
}

async fn loaded(mailbox: &Arc<FakeMailbox>) -> App {
    let mut app = app_with(mailbox);
    app.reload();
    app.run_until_idle().await;
    app
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_char(c);
    }
}

fn ids(app: &App) -> Vec<String> {
    app.store.ids().to_vec()
}

fn unread(mut item: Item) -> Item {
    item.set_flag(ItemFlags::UNREAD, true);
    item
}

#[tokio::test]
async fn test_initial_load_selects_first() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(5)));
    let app = loaded(&mailbox).await;

    assert_eq!(ids(&app), vec!["m0", "m1", "m2", "m3", "m4"]);
    assert_eq!(app.selected_item_id().as_deref(), Some("m0"));
    assert_eq!(app.status.message, "5 messages");
    // Preview content fetched for the selection
    assert!(app.cache.content("m0").is_some());
}

#[tokio::test]
async fn test_load_more_appends_pages() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(7)));
    let mut config = Config::default();
    config.list.page_size = 3;
    let mut app = App::new(config, Collaborators::new(mailbox.clone()));
    app.reload();
    app.run_until_idle().await;
    assert_eq!(app.store.len(), 3);
    assert!(app.view_state().more_available);

    app.handle_action(Action::LoadMore);
    app.run_until_idle().await;
    assert_eq!(app.store.len(), 6);

    app.handle_action(Action::LoadMore);
    app.run_until_idle().await;
    assert_eq!(app.store.len(), 7);
    assert!(!app.view_state().more_available);

    app.handle_action(Action::LoadMore);
    assert_eq!(app.status.message, "No more messages");
    assert_eq!(mailbox.count("list_page"), 3);
}

#[tokio::test]
async fn test_archive_first_selects_next() {
    let mailbox = Arc::new(FakeMailbox::with_items(
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| Item::new(*id, format!("subject {}", id)))
            .collect(),
    ));
    let mut app = loaded(&mailbox).await;

    app.handle_action(Action::Archive);
    app.run_until_idle().await;

    assert_eq!(ids(&app), vec!["b", "c", "d", "e"]);
    assert_eq!(app.selected, Some(0));
    assert_eq!(app.selected_item_id().as_deref(), Some("b"));
    assert_eq!(app.status.message, "Archived");
}

#[tokio::test]
async fn test_local_filter_round_trip() {
    let subjects = ["foo bar baz", "foo only", "bar only", "nothing"];
    let mailbox = Arc::new(FakeMailbox::with_items(
        subjects
            .iter()
            .enumerate()
            .map(|(i, s)| Item::new(format!("m{}", i), *s))
            .collect(),
    ));
    let mut app = loaded(&mailbox).await;
    app.handle_action(Action::Down);
    app.handle_action(Action::Down);

    app.handle_action(Action::Filter);
    type_text(&mut app, "foo bar");
    app.submit_prompt();

    assert_eq!(ids(&app), vec!["m0"]);
    assert_eq!(app.selected, Some(0));
    assert!(app.view_state().mode_label.is_some());

    // Esc restores the parked listing and selection
    app.handle_action(Action::Back);
    assert_eq!(app.store.len(), 4);
    assert_eq!(app.selected, Some(2));
    assert_eq!(app.status.message, "Filter cleared");
    // Filtering never touches the mailbox
    assert_eq!(mailbox.count("search_page"), 0);
}

#[tokio::test]
async fn test_remote_search_discards_stale_listing() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(5)));
    let mut app = app_with(&mailbox);
    app.reload();

    // Search replaces the listing before the first page lands
    app.handle_action(Action::Search);
    type_text(&mut app, "subject 2");
    app.submit_prompt();
    app.run_until_idle().await;

    assert_eq!(ids(&app), vec!["m2"]);
    assert_eq!(app.selected, Some(0));
    assert_eq!(app.status.message, "1 results for \"subject 2\"");

    app.handle_action(Action::Back);
    app.run_until_idle().await;
    assert_eq!(app.store.len(), 5);
    assert!(app.view_state().mode_label.is_none());
}

#[tokio::test]
async fn test_bulk_toggle_read_follows_majority() {
    let mut list = items(5);
    for item in &mut list[2..] {
        item.set_flag(ItemFlags::UNREAD, true);
    }
    let mailbox = Arc::new(FakeMailbox::with_items(list));
    let mut app = loaded(&mailbox).await;

    app.handle_action(Action::SelectAll);
    assert_eq!(app.status.message, "5 selected");
    app.handle_action(Action::ToggleRead);
    app.run_until_idle().await;

    assert!(app.store.items().iter().all(|item| !item.is_unread()));
    assert_eq!(mailbox.count("mark_read"), 5);
    assert_eq!(app.status.message, "Marked read 5");
    assert!(!app.bulk.is_active());
}

#[tokio::test]
async fn test_bulk_archive_keeps_failed_items() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(5)));
    mailbox.fail_on("m1");
    let mut app = loaded(&mailbox).await;

    for _ in 0..3 {
        app.handle_action(Action::ToggleSelect);
        app.handle_action(Action::Down);
    }
    app.handle_action(Action::Archive);
    assert_eq!(app.bulk_progress, Some((0, 3)));
    app.run_until_idle().await;

    assert_eq!(ids(&app), vec!["m1", "m3", "m4"]);
    assert!(app.status.message.contains("1 failure"));
    assert_eq!(app.status.level, state::StatusLevel::Warning);
    assert_eq!(app.bulk_progress, None);
    assert_eq!(app.bulk.len(), 0);
}

#[tokio::test]
async fn test_bulk_forward() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(3)));
    let forwarder = Arc::new(FakeForwarder::default());
    let collab = Collaborators::new(mailbox.clone()).with_forwarder(forwarder.clone());
    let mut app = App::new(Config::default(), collab);
    app.reload();
    app.run_until_idle().await;

    app.handle_action(Action::ToggleSelect);
    app.handle_action(Action::Bottom);
    app.handle_action(Action::ToggleSelect);
    app.handle_action(Action::Forward);
    type_text(&mut app, "team@example.com");
    app.submit_prompt();
    app.run_until_idle().await;

    assert_eq!(forwarder.forwarded(), vec!["m0", "m2"]);
    assert_eq!(app.status.message, "Forwarded 2");
    // Forwarding leaves the list alone
    assert_eq!(app.store.len(), 3);
}

#[tokio::test]
async fn test_forward_without_forwarder_is_unavailable() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(2)));
    let mut app = loaded(&mailbox).await;

    app.handle_action(Action::Forward);
    assert!(!app.input.is_prompt());
    assert_eq!(
        app.status.error.as_deref(),
        Some("Forwarding is not configured")
    );
}

#[tokio::test]
async fn test_opening_unread_marks_read() {
    let mut list = items(2);
    list[0] = unread(list[0].clone());
    let mailbox = Arc::new(FakeMailbox::with_items(list));
    let app = loaded(&mailbox).await;

    assert_eq!(mailbox.count("mark_read"), 1);
    assert!(app.store.item("m0").is_some_and(|item| !item.is_unread()));
}

#[tokio::test]
async fn test_missing_item_is_removed() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(3)));
    mailbox.missing("m1");
    let mut app = loaded(&mailbox).await;

    app.handle_action(Action::Down);
    app.run_until_idle().await;

    assert_eq!(ids(&app), vec!["m0", "m2"]);
    // Selection falls back to the predecessor
    assert_eq!(app.selected_item_id().as_deref(), Some("m0"));
    assert!(app.status.error.is_some());
}

#[tokio::test]
async fn test_panicking_task_reports_failure() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(2)));
    mailbox.panic_on("m0");
    let app = loaded(&mailbox).await;

    let error = app.status.error.clone().unwrap_or_default();
    assert!(error.starts_with("Background content task failed"));
    assert!(!app.cache.has_in_flight());
    // The listing itself survived
    assert_eq!(app.store.len(), 2);
}

#[tokio::test]
async fn test_summary_generated_once() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(2)));
    let generator = Arc::new(FakeGenerator::new("  Short summary.\n"));
    let mut config = Config::default();
    config.ai.enable_summaries = true;
    let collab = Collaborators::new(mailbox.clone()).with_generator(generator.clone());
    let mut app = App::new(config, collab);
    app.reload();
    app.run_until_idle().await;

    app.handle_action(Action::ToggleSummary);
    app.request_summary("m0");
    app.run_until_idle().await;

    assert_eq!(generator.calls(), 1);
    assert_eq!(app.cache.summary("m0"), Some("Short summary."));
    let preview = app.view_state().preview.unwrap_or_default();
    assert_eq!(preview.title, "Summary: subject 0");
    assert_eq!(preview.body.as_deref(), Some("Short summary."));

    // Cached: asking again costs nothing
    app.request_summary("m0");
    app.run_until_idle().await;
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_summary_waits_for_content() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(2)));
    let generator = Arc::new(FakeGenerator::new("Summary of m1"));
    let mut config = Config::default();
    config.ai.enable_summaries = true;
    let collab = Collaborators::new(mailbox.clone()).with_generator(generator.clone());
    let mut app = App::new(config, collab);
    app.reload();
    app.run_until_idle().await;

    // Content for m1 is still in flight when the summary is requested
    app.handle_action(Action::Down);
    app.handle_action(Action::ToggleSummary);
    assert!(app.cache.content("m1").is_none());
    app.run_until_idle().await;

    assert_eq!(app.cache.summary("m1"), Some("Summary of m1"));
    assert_eq!(generator.calls(), 1);
    assert_eq!(mailbox.count("get_content"), 2);
    assert!(app.pending_generation.is_empty());
}

#[tokio::test]
async fn test_ai_without_generator_is_unavailable() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(1)));
    let mut app = loaded(&mailbox).await;

    app.handle_action(Action::ToggleSummary);
    assert_eq!(app.preview_mode, PreviewMode::Content);
    assert_eq!(
        app.status.error.as_deref(),
        Some("AI generation is not configured")
    );
}

#[tokio::test]
async fn test_ai_disabled_in_config() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(1)));
    let generator = Arc::new(FakeGenerator::new("work, travel"));
    let collab = Collaborators::new(mailbox.clone()).with_generator(generator.clone());
    let mut app = App::new(Config::default(), collab);
    app.reload();
    app.run_until_idle().await;

    app.handle_action(Action::SuggestLabels);
    app.run_until_idle().await;
    assert_eq!(generator.calls(), 0);
    assert!(app.status.error.is_some());
}

#[tokio::test]
async fn test_label_suggestions() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(1)));
    let generator = Arc::new(FakeGenerator::new("Work, travel"));
    let mut config = Config::default();
    config.ai.enable_labels = true;
    let collab = Collaborators::new(mailbox.clone()).with_generator(generator.clone());
    let mut app = App::new(config, collab);
    app.reload();
    app.run_until_idle().await;

    app.handle_action(Action::SuggestLabels);
    app.run_until_idle().await;

    let labels = app.cache.labels("m0").map(<[String]>::to_vec).unwrap_or_default();
    assert_eq!(labels.len(), 2);
    assert!(app.status.message.starts_with("Suggested labels: "));
}

#[tokio::test]
async fn test_help_mode_swallows_actions() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(3)));
    let mut app = loaded(&mailbox).await;

    app.handle_action(Action::Help);
    assert!(app.view_state().help.len() > 1);
    app.handle_action(Action::Down);
    assert_eq!(app.input, InputMode::Help { scroll: 1 });
    assert_eq!(app.selected, Some(0));

    app.handle_action(Action::Back);
    assert_eq!(app.input, InputMode::Normal);
}

#[tokio::test]
async fn test_preview_preference_toggle() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(1)));
    mailbox.set_content(
        "m0",
        Content {
            text: Some("plain body".into()),
            html: Some("<p>rich body</p>".into()),
        },
    );
    let mut app = loaded(&mailbox).await;

    app.prepare_preview();
    let body = app.view_state().preview.and_then(|p| p.body).unwrap_or_default();
    assert!(body.contains("plain body"));
    assert!(!body.contains("rich body"));

    app.handle_action(Action::TogglePreference);
    assert_eq!(app.status.message, "Showing rich view");
    app.prepare_preview();
    let preview = app.view_state().preview.unwrap_or_default();
    assert!(preview.body.unwrap_or_default().contains("rich body"));
    assert_eq!(preview.note.as_deref(), Some("rich view"));
    // Content is not fetched again
    assert_eq!(mailbox.count("get_content"), 1);
}

#[tokio::test]
async fn test_failed_reload_clears_search_results() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(5)));
    let mut app = loaded(&mailbox).await;
    app.handle_action(Action::Search);
    type_text(&mut app, "subject 2");
    app.submit_prompt();
    app.run_until_idle().await;
    assert_eq!(ids(&app), vec!["m2"]);

    // First page of the default listing fails
    mailbox.fail_on("");
    app.handle_action(Action::Back);
    app.run_until_idle().await;

    assert!(ids(&app).is_empty());
    assert_eq!(app.selected, None);
    assert!(app.view_state().mode_label.is_none());
    let error = app.status.error.clone().unwrap_or_default();
    assert!(error.starts_with("Loading failed"));
}

#[tokio::test]
async fn test_single_item_failure_leaves_state() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(2)));
    let mut app = loaded(&mailbox).await;
    let before = app.store.clone();
    mailbox.fail_on("m0");

    app.handle_action(Action::Archive);
    app.run_until_idle().await;
    assert_eq!(app.store, before);
    assert_eq!(app.selected, Some(0));
    assert!(app.status.error.is_some());

    app.status.error = None;
    app.handle_action(Action::ToggleRead);
    app.run_until_idle().await;
    assert_eq!(app.store, before);
    assert_eq!(app.selected, Some(0));
    assert!(app.status.error.is_some());

    let calls = mailbox.calls();
    assert!(calls.contains(&"archive:m0".to_string()));
    assert!(calls.contains(&"mark_unread:m0".to_string()));
}

#[tokio::test]
async fn test_stale_page_panic_keeps_current_listing() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(3)));
    let mut app = loaded(&mailbox).await;
    let stale = app.search.generation();
    app.reload();
    let current = app.search.generation();

    app.handle_event(AppEvent::TaskFailed {
        task: task::PAGE,
        generation: Some(stale),
        error: "boom".to_string(),
    });
    assert!(app.search.is_loading());
    assert!(app.status.error.is_none());

    app.handle_event(AppEvent::TaskFailed {
        task: task::PAGE,
        generation: Some(current),
        error: "boom".to_string(),
    });
    assert!(!app.search.is_loading());
    assert!(app.search.is_halted());
    assert!(app.status.error.is_some());
}

#[tokio::test]
async fn test_resize_wide_terminal() {
    let mailbox = Arc::new(FakeMailbox::with_items(items(1)));
    let mut config = Config::default();
    config.ui.split_ratio = 30;
    let mut app = App::new(config, Collaborators::new(mailbox));

    app.resize(1000);
    assert_eq!(app.preview_width, 698);
    app.resize(u16::MAX);
    assert_eq!(app.preview_width, 45872);
    // Narrow terminals show the preview full width
    app.resize(60);
    assert_eq!(app.preview_width, 58);
}
