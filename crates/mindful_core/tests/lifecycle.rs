use mindful_core::db::open_db_in_memory;
use mindful_core::{
    AppState, Difficulty, Item, ItemDraft, ItemEdit, ItemId, ItemValidationError,
    LifecycleManager, Mood, Outcome, Placement, RepoError, RepoResult, SqliteStateStore,
    StateStore, StateValidationError, DEFAULT_APP_TITLE,
};
use rusqlite::Connection;
use std::cell::Cell;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn create(manager: &mut LifecycleManager<impl StateStore>, draft: ItemDraft) -> ItemId {
    manager
        .create_item(draft)
        .unwrap()
        .into_value()
        .expect("create should apply")
}

fn active_ids(manager: &LifecycleManager<impl StateStore>) -> Vec<ItemId> {
    manager
        .active_items()
        .into_iter()
        .map(|item| item.id.clone())
        .collect()
}

fn all_ids(manager: &LifecycleManager<impl StateStore>) -> Vec<ItemId> {
    manager
        .state()
        .items
        .iter()
        .map(|item| item.id.clone())
        .collect()
}

/// Store whose writes fail on demand.
#[derive(Default)]
struct FlakyStore {
    fail_writes: Cell<bool>,
    saves: Cell<u32>,
}

impl StateStore for FlakyStore {
    fn load(&self) -> RepoResult<Option<AppState>> {
        Ok(None)
    }

    fn save(&self, _state: &AppState) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::Sqlite(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

#[test]
fn first_load_returns_initial_state() {
    let conn = setup();
    let manager = LifecycleManager::load(SqliteStateStore::new(&conn));

    assert_eq!(manager.state(), &AppState::initial());
    assert_eq!(manager.state().app_title, DEFAULT_APP_TITLE);
    assert_eq!(manager.state().user.level(), 1);
}

#[test]
fn create_inserts_at_front_of_active_region() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));

    let first = create(&mut manager, ItemDraft::task("first", "1"));
    let archived = create(&mut manager, ItemDraft::task("archived", "a"));
    manager.archive_item(&archived);
    let second = create(&mut manager, ItemDraft::goal("second", "2", Difficulty::Easy));

    assert_eq!(all_ids(&manager), vec![second, first, archived]);
}

#[test]
fn create_rejects_blank_title_without_mutation() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));

    let err = manager.create_item(ItemDraft::task("   ", "💭")).unwrap_err();
    assert_eq!(err, ItemValidationError::EmptyTitle);
    assert!(manager.state().items.is_empty());
}

#[test]
fn every_mutation_is_written_through() {
    let conn = setup();
    let id = {
        let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
        let id = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Medium));
        assert!(manager.archive_item(&id).persisted());
        id
    };

    let reloaded = LifecycleManager::load(SqliteStateStore::new(&conn));
    let item = reloaded.find_item(&id).unwrap();
    assert!(item.is_archived);
    assert_eq!(reloaded.state().user.xp(), 100);
    assert_eq!(reloaded.state().user.level(), 2);
}

#[test]
fn archiving_medium_goal_awards_exactly_one_hundred_xp_once() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Medium));

    let receipt = *manager.archive_item(&id).value().unwrap();
    assert_eq!(receipt.xp_awarded, 100);
    assert_eq!(receipt.level_before, 1);
    assert_eq!(receipt.level_after, 2);
    assert!(receipt.leveled_up());
    assert_eq!(manager.state().user.xp(), 100);

    assert_eq!(manager.archive_item(&id), Outcome::Skipped);
    assert_eq!(manager.state().user.xp(), 100);
}

#[test]
fn archive_forces_marked_and_tasks_award_nothing() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::task("task", "t"));

    let receipt = manager.archive_item(&id).into_value().unwrap();
    assert_eq!(receipt.xp_awarded, 0);
    assert!(!receipt.leveled_up());

    let item = manager.find_item(&id).unwrap();
    assert!(item.is_archived);
    assert!(item.is_marked);
    assert_eq!(manager.state().user.xp(), 0);
    assert!(manager.active_items().is_empty());
    assert_eq!(manager.archived_tasks().len(), 1);
    assert!(manager.milestones().is_empty());
}

#[test]
fn recover_moves_item_to_front_unmarked_and_keeps_xp() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let goal = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Hard));
    let task_b = create(&mut manager, ItemDraft::task("b", "b"));
    let task_a = create(&mut manager, ItemDraft::task("a", "a"));
    manager.archive_item(&goal);
    assert_eq!(manager.milestones().len(), 1);

    assert!(manager.recover_item(&goal).is_applied());

    assert_eq!(active_ids(&manager), vec![goal.clone(), task_a, task_b]);
    let item = manager.find_item(&goal).unwrap();
    assert!(!item.is_archived);
    assert!(!item.is_marked);
    assert_eq!(manager.state().user.xp(), 200);
    assert!(manager.milestones().is_empty());
}

#[test]
fn recover_of_active_item_is_skipped() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::task("task", "t"));

    assert_eq!(manager.recover_item(&id), Outcome::Skipped);
}

#[test]
fn rearchiving_a_recovered_goal_awards_again() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Easy));

    manager.archive_item(&id);
    manager.recover_item(&id);
    manager.archive_item(&id);

    assert_eq!(manager.state().user.xp(), 100);
}

#[test]
fn toggling_mark_is_its_own_inverse() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::task("task", "t"));

    assert_eq!(manager.toggle_mark(&id).into_value(), Some(true));
    assert_eq!(manager.toggle_mark(&id).into_value(), Some(false));
    assert_eq!(manager.toggle_mark(&id).into_value(), Some(true));
    assert_eq!(manager.toggle_mark(&id).into_value(), Some(false));
    assert!(!manager.find_item(&id).unwrap().is_marked);
    assert_eq!(manager.state().user.xp(), 0);
}

#[test]
fn mark_is_allowed_on_archived_items() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::task("task", "t"));
    manager.archive_item(&id);

    assert_eq!(manager.toggle_mark(&id).into_value(), Some(false));
    assert!(manager.find_item(&id).unwrap().is_archived);
}

#[test]
fn edit_updates_fields_in_place() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let goal = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Easy));
    let other = create(&mut manager, ItemDraft::task("other", "o"));
    manager.toggle_mark(&goal);

    let edit = ItemEdit {
        title: "bigger goal".to_string(),
        icon: "🏔️".to_string(),
        description: Some("climb".to_string()),
        difficulty: Some(Difficulty::Hard),
    };
    assert!(manager.edit_item(&goal, edit).unwrap().is_applied());

    let item = manager.find_item(&goal).unwrap();
    assert_eq!(item.title, "bigger goal");
    assert_eq!(item.description.as_deref(), Some("climb"));
    assert_eq!(item.points(), 200);
    assert!(item.is_marked);
    assert_eq!(active_ids(&manager), vec![other, goal]);
}

#[test]
fn delete_removes_item_from_every_view() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let active = create(&mut manager, ItemDraft::task("active", "a"));
    let milestone = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Easy));
    manager.archive_item(&milestone);

    let removed = manager.delete_item(&milestone).into_value().unwrap();
    assert_eq!(removed.id, milestone);
    assert!(manager.delete_item(&active).is_applied());

    for id in [&active, &milestone] {
        assert!(manager.find_item(id).is_none());
        assert_eq!(manager.delete_item(id), Outcome::Skipped);
    }
    assert!(manager.active_items().is_empty());
    assert!(manager.milestones().is_empty());
    assert_eq!(manager.state().user.xp(), 50);
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    create(&mut manager, ItemDraft::task("task", "t"));
    let before = manager.state().clone();
    let ghost = ItemId::from("ghost");

    assert_eq!(manager.toggle_mark(&ghost), Outcome::Skipped);
    assert_eq!(manager.archive_item(&ghost), Outcome::Skipped);
    assert_eq!(manager.recover_item(&ghost), Outcome::Skipped);
    assert_eq!(manager.delete_item(&ghost), Outcome::Skipped);
    assert_eq!(
        manager
            .edit_item(&ghost, ItemEdit::from_item(&Item::task("x", "x")))
            .unwrap(),
        Outcome::Skipped
    );
    assert_eq!(manager.state(), &before);
}

#[test]
fn dropping_first_after_last_rotates_active_order() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let c = create(&mut manager, ItemDraft::task("c", "c"));
    let archived = create(&mut manager, ItemDraft::task("old", "o"));
    manager.archive_item(&archived);
    let b = create(&mut manager, ItemDraft::task("b", "b"));
    let a = create(&mut manager, ItemDraft::task("a", "a"));
    assert_eq!(active_ids(&manager), vec![a.clone(), b.clone(), c.clone()]);

    assert!(manager.move_item(&a, &c, Placement::After).is_applied());

    assert_eq!(all_ids(&manager), vec![b, c, a, archived]);
}

#[test]
fn move_before_target_and_invalid_moves() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let c = create(&mut manager, ItemDraft::task("c", "c"));
    let b = create(&mut manager, ItemDraft::task("b", "b"));
    let a = create(&mut manager, ItemDraft::task("a", "a"));

    assert!(manager.move_item(&c, &a, Placement::Before).is_applied());
    assert_eq!(active_ids(&manager), vec![c.clone(), a.clone(), b.clone()]);

    assert_eq!(manager.move_item(&a, &a, Placement::After), Outcome::Skipped);
    assert_eq!(
        manager.move_item(&a, &ItemId::from("ghost"), Placement::After),
        Outcome::Skipped
    );
    // Already directly before `b`: nothing to persist.
    assert_eq!(manager.move_item(&a, &b, Placement::Before), Outcome::Skipped);

    manager.archive_item(&b);
    assert_eq!(manager.move_item(&a, &b, Placement::After), Outcome::Skipped);
}

#[test]
fn reorder_keeps_archived_items_behind_active_region() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let x = create(&mut manager, ItemDraft::task("x", "x"));
    let y = create(&mut manager, ItemDraft::task("y", "y"));
    manager.archive_item(&x);
    manager.archive_item(&y);
    let c = create(&mut manager, ItemDraft::task("c", "c"));
    let b = create(&mut manager, ItemDraft::task("b", "b"));
    let a = create(&mut manager, ItemDraft::task("a", "a"));

    let outcome = manager.reorder_active(&[c.clone(), x.clone(), a.clone()]);
    assert!(outcome.is_applied());

    assert_eq!(all_ids(&manager), vec![c, a, b, x, y]);
}

#[test]
fn stress_reading_tracks_marks() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    assert_eq!(manager.stress().calm_percentage, 100);

    let ids: Vec<_> = (0..4)
        .map(|n| create(&mut manager, ItemDraft::task(format!("task {n}"), "t")))
        .collect();
    manager.toggle_mark(&ids[0]);

    let reading = manager.stress();
    assert_eq!(reading.total, 4);
    assert_eq!(reading.resolved, 1);
    assert_eq!(reading.calm_percentage, 25);
    assert_eq!(reading.mood, Mood::Stressed);

    manager.archive_item(&ids[1]);
    manager.archive_item(&ids[2]);
    assert_eq!(manager.stress().mood, Mood::Neutral);
}

#[test]
fn rename_and_reset_score() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    let id = create(&mut manager, ItemDraft::goal("goal", "🎯", Difficulty::Hard));
    manager.archive_item(&id);

    assert_eq!(
        manager.rename_app("  My Quest  ").into_value().as_deref(),
        Some("My Quest")
    );
    assert!(manager.reset_score().is_applied());

    let reloaded = LifecycleManager::load(SqliteStateStore::new(&conn));
    assert_eq!(reloaded.state().app_title, "My Quest");
    assert_eq!(reloaded.state().user.xp(), 0);
    assert_eq!(reloaded.state().user.level(), 1);
    assert_eq!(reloaded.state().items.len(), 1);
}

#[test]
fn replace_state_rejects_duplicate_ids_without_mutation() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    create(&mut manager, ItemDraft::task("keep", "k"));
    let before = manager.state().clone();

    let duplicate = Item::task("dup", "d");
    let incoming = AppState {
        items: vec![duplicate.clone(), duplicate.clone()],
        ..AppState::initial()
    };

    let err = manager.replace_state(incoming).unwrap_err();
    assert_eq!(err, StateValidationError::DuplicateId(duplicate.id));
    assert_eq!(manager.state(), &before);
}

#[test]
fn with_state_moves_archived_items_behind_active_ones() {
    let mut done = Item::task("done", "d");
    done.id = ItemId::from("done");
    done.is_archived = true;
    let mut first = Item::task("first", "1");
    first.id = ItemId::from("first");
    let mut second = Item::task("second", "2");
    second.id = ItemId::from("second");

    let state = AppState {
        items: vec![first, done, second],
        ..AppState::initial()
    };
    let store = FlakyStore::default();
    let mut manager = LifecycleManager::with_state(&store, state).unwrap();

    assert_eq!(
        all_ids(&manager),
        vec![
            ItemId::from("first"),
            ItemId::from("second"),
            ItemId::from("done")
        ]
    );

    // Already in order: nothing changes in memory and nothing is saved.
    let unchanged = manager.reorder_active(&[ItemId::from("first"), ItemId::from("second")]);
    assert_eq!(unchanged, Outcome::Skipped);
    assert_eq!(all_ids(&manager)[2], ItemId::from("done"));
    assert_eq!(store.saves.get(), 0);
}

#[test]
fn with_state_rejects_duplicate_ids() {
    let item = Item::task("dup", "d");
    let state = AppState {
        items: vec![item.clone(), item.clone()],
        ..AppState::initial()
    };

    let store = FlakyStore::default();
    let err = LifecycleManager::with_state(&store, state).err();
    assert_eq!(err, Some(StateValidationError::DuplicateId(item.id)));
}

#[test]
fn clear_all_resets_memory_and_store() {
    let conn = setup();
    let mut manager = LifecycleManager::load(SqliteStateStore::new(&conn));
    create(&mut manager, ItemDraft::task("task", "t"));

    manager.clear_all().unwrap();
    assert_eq!(manager.state(), &AppState::initial());
    assert!(SqliteStateStore::new(&conn).load().unwrap().is_none());
}

#[test]
fn storage_failure_is_reported_but_memory_keeps_change() {
    let store = FlakyStore::default();
    let mut manager = LifecycleManager::load(&store);
    let id = create(&mut manager, ItemDraft::task("task", "t"));
    assert_eq!(store.saves.get(), 1);

    store.fail_writes.set(true);
    let outcome = manager.toggle_mark(&id);
    assert!(outcome.is_applied());
    assert!(!outcome.persisted());
    assert!(manager.find_item(&id).unwrap().is_marked);

    assert!(manager.clear_all().is_err());
    assert_eq!(manager.state().items.len(), 1);

    store.fail_writes.set(false);
    manager.save().unwrap();
    assert_eq!(store.saves.get(), 2);
}
