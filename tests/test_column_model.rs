// Test the open/edit/close cycle of column models against layout stores

use column_layout::column::{ColumnDescriptor, ColumnSet, SortKey};
use column_layout::config::UserParameters;
use column_layout::store::{LayoutStore, ParameterStore};
use column_layout::{
    ColumnId, ColumnModel, ColumnWidget, FixedColumnsLayout, JsonLayoutStore, MemoryLayoutStore,
    MemorySorter, MemoryTable, ModelId, SortModel, TableTopology,
};

const MODEL: ModelId = ModelId(7);

fn create_schema() -> ColumnSet {
    ColumnSet::from_schema(vec![
        ColumnDescriptor::new(1, "ls.name", 140),
        ColumnDescriptor::new(2, "ls.pos", 50),
        ColumnDescriptor::new(3, "ls.age", 40),
        ColumnDescriptor::new(4, "ls.form", 45),
        ColumnDescriptor::new(5, "ls.tsi", 80),
    ])
    .unwrap()
}

fn order(table: &MemoryTable) -> Vec<u32> {
    table.column_order().iter().map(|id| id.0).collect()
}

/// Open a single-table view, run `edit` on it and close it again
fn run_session(
    model: &mut ColumnModel,
    store: &mut dyn LayoutStore,
    edit: impl FnOnce(&mut MemoryTable, &mut MemorySorter),
) -> bool {
    let mut table = MemoryTable::for_columns(model.columns_mut());
    let mut sorter = MemorySorter::new();
    model.init_table(&mut TableTopology::Single(&mut table), &mut sorter);
    edit(&mut table, &mut sorter);
    model.store_user_settings(&TableTopology::Single(&mut table), &sorter, store)
}

#[test]
fn test_load_without_saved_layout_uses_defaults() {
    let store = MemoryLayoutStore::new();
    let model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    assert_eq!(model.columns(), &create_schema());
}

#[test]
fn test_load_from_failing_store_uses_defaults() {
    let store = MemoryLayoutStore::failing();
    let model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    assert_eq!(model.columns(), &create_schema());
}

#[test]
fn test_unchanged_layout_is_not_saved() {
    let mut store = MemoryLayoutStore::new();
    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);

    let changed = run_session(&mut model, &mut store, |_, _| {});

    assert!(!changed);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_layout_survives_reopen() {
    let mut store = MemoryLayoutStore::new();
    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);

    let mut session_order = Vec::new();
    let changed = run_session(&mut model, &mut store, |table, sorter| {
        table.drag(4, 0);
        table.resize(ColumnId(2), 120);
        sorter.toggle(ColumnId(3));
        session_order = order(table);
    });
    assert!(changed);
    assert_eq!(store.save_count(), 1);
    assert_eq!(session_order, vec![5, 1, 2, 3, 4]);

    let mut reopened = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    assert_eq!(reopened.columns(), model.columns());

    let mut table = MemoryTable::for_columns(reopened.columns_mut());
    let mut sorter = MemorySorter::new();
    reopened.init_table(&mut TableTopology::Single(&mut table), &mut sorter);

    assert_eq!(order(&table), session_order);
    assert_eq!(table.column_width(ColumnId(2)), Some(120));
    assert_eq!(sorter.sort_keys(), Some(vec![SortKey::ascending(ColumnId(3))]));

    let changed = reopened.store_user_settings(&TableTopology::Single(&mut table), &sorter, &mut store);
    assert!(!changed);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn test_failed_save_keeps_layout_in_memory() {
    let mut store = MemoryLayoutStore::failing();
    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);

    let changed = run_session(&mut model, &mut store, |table, _| table.drag(0, 2));

    assert!(changed);
    assert_eq!(store.save_count(), 0);
    assert_eq!(model.columns().find_by_id(ColumnId(1)).unwrap().index(), 2);
}

#[test]
fn test_hidden_column_closes_index_gap() {
    let mut store = MemoryLayoutStore::new();
    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store)
        .with_user_can_disable_columns(true);

    assert!(model.set_column_displayed(ColumnId(2), false));
    assert!(run_session(&mut model, &mut store, |_, _| {}));
    assert!(model.columns().validate().is_empty());
    assert_eq!(model.columns().find_by_id(ColumnId(3)).unwrap().index(), 1);

    // Shown again at the end
    assert!(model.set_column_displayed(ColumnId(2), true));
    let mut table = MemoryTable::for_columns(model.columns_mut());
    let mut sorter = MemorySorter::new();
    model.init_table(&mut TableTopology::Single(&mut table), &mut sorter);
    assert_eq!(order(&table), vec![1, 3, 4, 5, 2]);
}

#[test]
fn test_split_view_session() {
    let mut store = MemoryLayoutStore::new();
    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    let split = FixedColumnsLayout::new(MODEL, 2);

    let (mut fixed, mut scroll) = MemoryTable::split_for(model.columns_mut(), split.fixed_count());
    let mut sorter = MemorySorter::new();
    model.init_table(&mut split.topology(&mut fixed, &mut scroll), &mut sorter);

    scroll.drag(2, 0);
    let changed = model.store_user_settings(&split.topology(&mut fixed, &mut scroll), &sorter, &mut store);
    assert!(changed);

    let mut reopened = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    let (mut fixed, mut scroll) = MemoryTable::split_for(reopened.columns_mut(), split.fixed_count());
    reopened.init_table(&mut split.topology(&mut fixed, &mut scroll), &mut MemorySorter::new());

    assert_eq!(order(&fixed), vec![1, 2]);
    assert_eq!(order(&scroll), vec![5, 3, 4]);
}

#[test]
fn test_json_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layouts.json");

    let mut store = JsonLayoutStore::new(path.clone());
    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    assert!(run_session(&mut model, &mut store, |table, sorter| {
        table.drag(1, 3);
        sorter.toggle(ColumnId(4));
        sorter.toggle(ColumnId(4));
    }));

    let mut parameters = UserParameters::new();
    let split = FixedColumnsLayout::new(MODEL, 1);
    split.set_divider_location(&mut parameters, 215);
    assert!(parameters.store_parameters(&mut store).unwrap());

    assert!(path.exists());
    let reader = JsonLayoutStore::new(path);
    let reopened = ColumnModel::load(MODEL, "ls.players", create_schema(), &reader);
    assert_eq!(reopened.columns(), model.columns());
    assert_eq!(
        reader.load_parameter("TableDividerLocation_7").unwrap(),
        Some("215".to_string())
    );
    assert_eq!(reader.saved_models().unwrap(), vec![MODEL]);
}

#[test]
fn test_saved_column_missing_from_schema_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonLayoutStore::new(dir.path().join("layouts.json"));

    let mut with_extra = create_schema().columns().to_vec();
    with_extra.push(ColumnDescriptor::new(99, "ls.retired", 30));
    let old_schema = ColumnSet::from_schema(with_extra).unwrap();
    let mut old_model = ColumnModel::new(MODEL, "ls.players", old_schema);
    assert!(run_session(&mut old_model, &mut store, |table, _| table.drag(0, 4)));

    let mut model = ColumnModel::load(MODEL, "ls.players", create_schema(), &store);
    assert!(model.columns().find_by_id(ColumnId(99)).is_none());
    assert_eq!(model.columns().len(), 5);

    let shown: Vec<u32> = model.columns_mut().displayed_ids().iter().map(|id| id.0).collect();
    assert_eq!(shown, vec![2, 3, 4, 5, 1]);
}
