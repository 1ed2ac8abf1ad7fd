//! Item lifecycle use-case service.
//!
//! # Responsibility
//! - Own the single in-memory `AppState` and every transition applied to it.
//! - Persist the whole snapshot after each mutation (write-through).
//! - Award goal XP at the moment a goal is archived.
//!
//! # Invariants
//! - Per item: Active-Unmarked <-> Active-Marked, Active -> Archived (forces
//!   marked), Archived -> Active-Unmarked (recover), any -> gone (delete).
//! - New and recovered items land at the front of the active region.
//! - Archived items always trail the active region.
//! - Lookup misses are no-ops reported as [`Outcome::Skipped`], never errors.
//! - A failed save never rolls back memory; it is reported via `persisted`.

use crate::leveling::details::XpDetails;
use crate::leveling::engine::LevelProgress;
use crate::model::item::{Item, ItemDraft, ItemEdit, ItemId, ItemValidationError};
use crate::model::state::{AppState, StateValidationError};
use crate::repo::state_repo::{load_or_initial, StateStore};
use crate::repo::RepoResult;
use crate::service::stress::StressReading;
use log::{debug, error, info};

/// Result of one lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// State changed. `persisted` is `false` when the write-through save
    /// failed; memory keeps the change either way.
    Applied { value: T, persisted: bool },
    /// Unknown id or unmet precondition; nothing changed.
    Skipped,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// `true` only for applied changes that reached the store.
    pub fn persisted(&self) -> bool {
        matches!(self, Self::Applied { persisted: true, .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Applied { value, .. } => Some(value),
            Self::Skipped => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Applied { value, .. } => Some(value),
            Self::Skipped => None,
        }
    }
}

/// Side effects of archiving one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveReceipt {
    /// XP granted; `0` for tasks.
    pub xp_awarded: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl ArchiveReceipt {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Drop position relative to a drag target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Lifecycle manager over one state snapshot and its store.
pub struct LifecycleManager<S: StateStore> {
    store: S,
    state: AppState,
}

impl<S: StateStore> LifecycleManager<S> {
    /// Loads the stored snapshot, or the initial state when none is usable.
    pub fn load(store: S) -> Self {
        let state = load_or_initial(&store);
        info!(
            "event=lifecycle_init module=lifecycle status=ok items={} level={}",
            state.items.len(),
            state.user.level()
        );
        Self { store, state }
    }

    /// Wraps an already loaded state without touching the store.
    ///
    /// The state gets the same checks as a stored snapshot: ids are
    /// validated and archived items are moved behind the active region.
    ///
    /// # Errors
    /// - Structural violations (blank or duplicate ids).
    pub fn with_state(store: S, mut state: AppState) -> Result<Self, StateValidationError> {
        state.validate()?;
        state.normalize();
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn find_item(&self, id: &ItemId) -> Option<&Item> {
        self.state.find(id)
    }

    pub fn active_items(&self) -> Vec<&Item> {
        self.state.active_items().collect()
    }

    pub fn archived_tasks(&self) -> Vec<&Item> {
        self.state.archived_tasks().collect()
    }

    pub fn milestones(&self) -> Vec<&Item> {
        self.state.milestones().collect()
    }

    pub fn level_progress(&self) -> LevelProgress {
        self.state.user.progress()
    }

    pub fn xp_details(&self) -> XpDetails {
        XpDetails::for_xp(self.state.user.xp())
    }

    pub fn stress(&self) -> StressReading {
        StressReading::measure(&self.state.items)
    }

    /// Creates an item at the front of the active region.
    ///
    /// # Errors
    /// - Validation errors leave the state untouched.
    pub fn create_item(&mut self, draft: ItemDraft) -> Result<Outcome<ItemId>, ItemValidationError> {
        let item = draft.into_item(ItemId::generate())?;
        let id = item.id.clone();
        info!(
            "event=item_create module=lifecycle status=ok item_id={} type={}",
            id,
            item.type_label()
        );
        self.state.items.insert(0, item);
        Ok(self.commit("item_create", id))
    }

    /// Edits title, icon, description and goal difficulty in place.
    ///
    /// # Errors
    /// - Validation errors leave the item untouched.
    pub fn edit_item(
        &mut self,
        id: &ItemId,
        edit: ItemEdit,
    ) -> Result<Outcome<()>, ItemValidationError> {
        let Some(item) = self.state.find_mut(id) else {
            return Ok(skipped("item_edit", id));
        };
        item.apply_edit(edit)?;
        info!("event=item_edit module=lifecycle status=ok item_id={id}");
        Ok(self.commit("item_edit", ()))
    }

    /// Flips the marked flag. Allowed on archived items too.
    ///
    /// Returns the new flag value.
    pub fn toggle_mark(&mut self, id: &ItemId) -> Outcome<bool> {
        let Some(item) = self.state.find_mut(id) else {
            return skipped("item_mark", id);
        };
        item.is_marked = !item.is_marked;
        let marked = item.is_marked;
        info!("event=item_mark module=lifecycle status=ok item_id={id} marked={marked}");
        self.commit("item_mark", marked)
    }

    /// Archives an active item, forcing it marked.
    ///
    /// Goals award their points exactly once, at this transition. The item
    /// moves behind the active region. Already archived items are skipped.
    pub fn archive_item(&mut self, id: &ItemId) -> Outcome<ArchiveReceipt> {
        let Some(position) = self.state.position(id) else {
            return skipped("item_archive", id);
        };
        if self.state.items[position].is_archived {
            return skipped("item_archive", id);
        }

        let mut item = self.state.items.remove(position);
        item.is_archived = true;
        item.is_marked = true;

        let level_before = self.state.user.level();
        let xp_awarded = item.points();
        if xp_awarded > 0 {
            self.state.user.award(xp_awarded);
        }
        let receipt = ArchiveReceipt {
            xp_awarded,
            level_before,
            level_after: self.state.user.level(),
        };
        self.state.items.push(item);

        info!(
            "event=item_archive module=lifecycle status=ok item_id={id} xp_awarded={} level={}",
            receipt.xp_awarded, receipt.level_after
        );
        self.commit("item_archive", receipt)
    }

    /// Returns an archived item to the front of the active list, unmarked.
    ///
    /// XP awarded on archival is kept.
    pub fn recover_item(&mut self, id: &ItemId) -> Outcome<()> {
        let Some(position) = self.state.position(id) else {
            return skipped("item_recover", id);
        };
        if !self.state.items[position].is_archived {
            return skipped("item_recover", id);
        }

        let mut item = self.state.items.remove(position);
        item.is_archived = false;
        item.is_marked = false;
        self.state.items.insert(0, item);

        info!("event=item_recover module=lifecycle status=ok item_id={id}");
        self.commit("item_recover", ())
    }

    /// Permanently removes an item in any state.
    ///
    /// Returns the removed item.
    pub fn delete_item(&mut self, id: &ItemId) -> Outcome<Item> {
        let Some(position) = self.state.position(id) else {
            return skipped("item_delete", id);
        };
        let removed = self.state.items.remove(position);
        info!("event=item_delete module=lifecycle status=ok item_id={id}");
        self.commit("item_delete", removed)
    }

    /// Replaces the active order with `order`.
    ///
    /// Ids that are unknown, archived or repeated are ignored. Active items
    /// missing from `order` keep their relative order behind the listed
    /// ones. Archived items stay behind the active region. Skipped when the
    /// resulting order equals the current one.
    pub fn reorder_active(&mut self, order: &[ItemId]) -> Outcome<()> {
        let before: Vec<ItemId> = self.state.items.iter().map(|item| item.id.clone()).collect();
        let (active, archived): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.state.items)
            .into_iter()
            .partition(|item| item.is_active());

        let previous: Vec<ItemId> = active.iter().map(|item| item.id.clone()).collect();
        let mut slots: Vec<Option<Item>> = active.into_iter().map(Some).collect();
        let mut reordered = Vec::with_capacity(slots.len() + archived.len());

        for id in order {
            if let Some(position) = previous.iter().position(|candidate| candidate == id) {
                if let Some(item) = slots[position].take() {
                    reordered.push(item);
                }
            }
        }
        reordered.extend(slots.into_iter().flatten());

        reordered.extend(archived);
        let changed = reordered.iter().map(|item| &item.id).ne(before.iter());
        self.state.items = reordered;

        if !changed {
            debug!("event=item_reorder module=lifecycle status=skipped reason=unchanged");
            return Outcome::Skipped;
        }
        info!(
            "event=item_reorder module=lifecycle status=ok active={}",
            previous.len()
        );
        self.commit("item_reorder", ())
    }

    /// Drops `source` before or after `target` in the active list.
    ///
    /// Skipped unless both ids are distinct active items.
    pub fn move_item(&mut self, source: &ItemId, target: &ItemId, placement: Placement) -> Outcome<()> {
        if source == target {
            return skipped("item_reorder", source);
        }

        let mut order: Vec<ItemId> = self.state.active_items().map(|item| item.id.clone()).collect();
        let Some(from) = order.iter().position(|id| id == source) else {
            return skipped("item_reorder", source);
        };
        order.remove(from);
        let Some(to) = order.iter().position(|id| id == target) else {
            return skipped("item_reorder", target);
        };
        let insert_at = match placement {
            Placement::Before => to,
            Placement::After => to + 1,
        };
        order.insert(insert_at, source.clone());

        self.reorder_active(&order)
    }

    /// Renames the app. Returns the stored title.
    pub fn rename_app(&mut self, title: &str) -> Outcome<String> {
        let stored = self.state.rename(title).to_string();
        info!(
            "event=app_rename module=lifecycle status=ok chars={}",
            stored.chars().count()
        );
        self.commit("app_rename", stored)
    }

    /// Resets XP to zero and level to 1; items are kept.
    pub fn reset_score(&mut self) -> Outcome<()> {
        self.state.user.reset();
        info!("event=score_reset module=lifecycle status=ok");
        self.commit("score_reset", ())
    }

    /// Replaces the whole state with a confirmed import.
    ///
    /// # Errors
    /// - Structural violations reject the replacement with no mutation.
    pub fn replace_state(
        &mut self,
        mut state: AppState,
    ) -> Result<Outcome<()>, StateValidationError> {
        state.validate()?;
        state.normalize();
        self.state = state;
        info!(
            "event=state_replace module=lifecycle status=ok items={} xp={}",
            self.state.items.len(),
            self.state.user.xp()
        );
        Ok(self.commit("state_replace", ()))
    }

    /// Deletes every stored byte and reloads the initial state.
    ///
    /// # Errors
    /// - Store failures leave the in-memory state untouched.
    pub fn clear_all(&mut self) -> RepoResult<()> {
        if let Err(err) = self.store.clear() {
            error!("event=state_clear module=lifecycle status=error error={err}");
            return Err(err);
        }
        self.state = load_or_initial(&self.store);
        info!("event=state_clear module=lifecycle status=ok");
        Ok(())
    }

    /// Saves the current snapshot explicitly.
    pub fn save(&self) -> RepoResult<()> {
        self.store.save(&self.state)
    }

    fn commit<T>(&self, op: &str, value: T) -> Outcome<T> {
        let persisted = match self.store.save(&self.state) {
            Ok(()) => true,
            Err(err) => {
                error!("event=state_persist module=lifecycle status=error op={op} error={err}");
                false
            }
        };
        Outcome::Applied { value, persisted }
    }
}

fn skipped<T>(op: &str, id: &ItemId) -> Outcome<T> {
    debug!("event={op} module=lifecycle status=skipped item_id={id}");
    Outcome::Skipped
}
