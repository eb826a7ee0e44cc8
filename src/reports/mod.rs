use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fretforge::resolver::{Resolution, TabEvent, TabNote};

fn note_cell(note: &TabNote) -> String {
    match (&note.string_id, note.fret) {
        (Some(s), Some(f)) => format!("{} {}:{}", note.label, s, f),
        _ => format!("{} --", note.label),
    }
}

pub fn print_events<M>(title: &str, events: &[TabEvent<M>]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Notes").add_attribute(Attribute::Bold),
        Cell::new("Open").fg(Color::Green),
        Cell::new("Missing").fg(Color::Red),
    ]);

    for (i, event) in events.iter().enumerate() {
        let notes: Vec<String> = event.notes.iter().map(note_cell).collect();
        let open = event.notes.iter().filter(|n| n.fret == Some(0)).count();
        let missing = event.notes.iter().filter(|n| !n.has_position()).count();

        let mut missing_cell = Cell::new(missing).set_alignment(CellAlignment::Right);
        if missing > 0 {
            missing_cell = missing_cell.fg(Color::Red);
        }

        table.add_row(vec![
            Cell::new(i).set_alignment(CellAlignment::Right),
            Cell::new(notes.join("  ")),
            Cell::new(open).set_alignment(CellAlignment::Right),
            missing_cell,
        ]);
    }

    eprintln!("\n{}\n{}", title, table);
}

pub fn print_resolution_summary<M>(resolution: &Resolution<M>) {
    let total: usize = resolution.events.iter().map(|e| e.notes.len()).sum();

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Events"),
        Cell::new("Notes"),
        Cell::new("Filled").fg(Color::Green),
        Cell::new("Unresolved").fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new(resolution.events.len()),
        Cell::new(total),
        Cell::new(resolution.filled_count),
        Cell::new(resolution.unresolved_count),
    ]);
    eprintln!("{}", table);
}

pub fn print_shift_summary(requested: i32, applied: i32, feasible: bool) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Requested"),
        Cell::new("Applied"),
        Cell::new("Feasible"),
    ]);
    let status = if feasible {
        Cell::new("yes").fg(Color::Green)
    } else {
        Cell::new("no").fg(Color::Red)
    };
    table.add_row(vec![Cell::new(requested), Cell::new(applied), status]);
    eprintln!("{}", table);
}
