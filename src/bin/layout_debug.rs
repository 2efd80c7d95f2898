// Layout Debug Binary - runs one open/edit/close cycle against a real layout file
// Run with: cargo run --bin layout_debug [path/to/layouts.json]

use anyhow::Result;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use std::path::PathBuf;

use column_layout::column::{ColumnDescriptor, ColumnKind, ColumnSet};
use column_layout::config::{Config, UserParameters};
use column_layout::utils::logging::init_tracing;
use column_layout::{
    ColumnId, ColumnModel, ColumnWidget, FixedColumnsLayout, JsonLayoutStore, MemorySorter,
    MemoryTable, ModelId, SortModel, StaticLabels,
};

const PLAYER_OVERVIEW: ModelId = ModelId(3);

fn player_columns() -> Result<ColumnSet> {
    ColumnSet::from_schema(vec![
        ColumnDescriptor::new(10, "ls.player.name", 160).with_min_width(120),
        ColumnDescriptor::new(11, "ls.player.position", 60)
            .with_tooltip("ls.player.position.tooltip")
            .with_kind(ColumnKind::Text),
        ColumnDescriptor::new(12, "ls.player.age", 40).with_kind(ColumnKind::Integer),
        ColumnDescriptor::new(13, "ls.player.form", 50).with_kind(ColumnKind::Rating),
        ColumnDescriptor::new(14, "ls.player.stamina", 50).with_kind(ColumnKind::Integer),
        ColumnDescriptor::new(15, "ls.player.tsi", 70).with_kind(ColumnKind::Integer),
        ColumnDescriptor::new(16, "ls.player.wage", 70)
            .with_kind(ColumnKind::Integer)
            .hidden(),
    ])
}

fn labels() -> StaticLabels {
    StaticLabels::from_pairs([
        ("ls.player.name", "Name"),
        ("ls.player.position", "Pos"),
        ("ls.player.position.tooltip", "Best position"),
        ("ls.player.age", "Age"),
        ("ls.player.form", "Form"),
        ("ls.player.stamina", "Stamina"),
        ("ls.player.tsi", "TSI"),
        ("ls.player.wage", "Wage"),
        ("ls.players", "Players"),
    ])
}

fn layout_table(title: &str, columns: &ColumnSet, labels: &StaticLabels) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["Id", "Column", "Shown", "Index", "Width", "Sort"]
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for column in columns.iter() {
        let sort = match (column.sort_priority(), column.sort_order()) {
            (Some(priority), Some(order)) => format!("{} {}", priority, order),
            _ => String::new(),
        };
        table.add_row(vec![
            Cell::new(column.id()),
            Cell::new(column.column_name(labels)),
            Cell::new(if column.is_displayed() { "yes" } else { "no" }),
            Cell::new(column.index()),
            Cell::new(column.preferred_width()),
            Cell::new(sort),
        ]);
    }

    println!("{}", title);
    table
}

fn pane_order(pane: &MemoryTable) -> String {
    pane.column_order()
        .iter()
        .map(ColumnId::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Using default config: {:#}", e);
        Config::default()
    });
    let log_buffer = init_tracing(&config.logging.filter);

    let path: PathBuf = match std::env::args().nth(1) {
        Some(path) => path.into(),
        None => config.store_path()?,
    };
    let mut store = JsonLayoutStore::new(path);
    let labels = labels();

    println!("=== Column Layout Debug ===");
    println!("Layout file: {}\n", store.path().display());

    let mut model = ColumnModel::load(PLAYER_OVERVIEW, "ls.players", player_columns()?, &store)
        .with_user_can_disable_columns(true);
    println!("{}\n", layout_table("Loaded layout:", model.columns(), &labels));

    // Open the view: fixed name column plus a scrolling pane
    let split = FixedColumnsLayout::new(PLAYER_OVERVIEW, 1)
        .with_fallback_divider(config.layout.fixed_divider_default);
    let (mut fixed, mut scroll) = MemoryTable::split_for(model.columns_mut(), split.fixed_count());
    let mut sorter = MemorySorter::new();

    let outcome = {
        let mut topology = split.topology(&mut fixed, &mut scroll);
        model.init_table(&mut topology, &mut sorter)
    };
    println!(
        "Applied: {} moves, {} widths, sort installed: {}",
        outcome.moves, outcome.widths_set, outcome.sort_installed
    );
    println!("  fixed:  {}", pane_order(&fixed));
    println!("  scroll: {}\n", pane_order(&scroll));

    let mut parameters = UserParameters::new();
    let divider = split.divider_location(model.columns_mut(), &mut parameters, &store);
    println!("Divider at {}\n", divider);

    // Simulated user session
    if scroll.column_count() > 1 {
        scroll.drag(scroll.column_count() - 1, 0);
    }
    scroll.resize(ColumnId(15), 95);
    sorter.toggle(ColumnId(12));
    sorter.toggle(ColumnId(12));
    split.set_divider_location(&mut parameters, divider + 20);

    println!("After edits:");
    println!("  scroll: {}", pane_order(&scroll));
    println!("  sort:   {:?}\n", sorter.sort_keys().unwrap_or_default());

    // Close the view
    let changed = {
        let topology = split.topology(&mut fixed, &mut scroll);
        model.store_user_settings(&topology, &sorter, &mut store)
    };
    if config.layout.save_on_close {
        parameters.store_parameters(&mut store)?;
    }
    println!("Layout changed: {}", changed);
    println!("{}\n", layout_table("Stored layout:", model.columns(), &labels));
    println!("Headers: {:?}", model.column_names(&labels));

    for issue in model.columns().validate() {
        println!("  ⚠ {}", issue);
    }

    println!("\nRecent log:");
    for entry in log_buffer.get_recent(20) {
        println!("  {}", entry.format_for_display());
    }

    Ok(())
}
