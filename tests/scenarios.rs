//! End-to-end scenarios through the public API.

use std::time::Duration;

use console_controls::{
    Control, ControlEvent, ControlId, ControlTree, EventKind, FrameBuffer, Host, Key, KeyboardState, MouseButton,
    MouseState, Orientation, Point, Table, Ui,
};

fn redraw(tree: &mut ControlTree, root: ControlId, width: i32, height: i32) {
    let mut surface = FrameBuffer::new(width as u16, height as u16);
    tree.update_and_redraw(root, Duration::ZERO, &mut surface).unwrap();
}

fn raised(events: &[ControlEvent], id: ControlId, kind: &EventKind) -> bool {
    events.iter().any(|event| event.source == id && &event.kind == kind)
}

// =============================================================================
// Scenario A: scroll bar mapping
// =============================================================================

#[test]
fn scenario_a_vertical_bar_of_ten() {
    let mut bar = Control::scroll_bar(Orientation::Vertical, 10).unwrap();
    assert_eq!(bar.as_scroll_bar().unwrap().maximum(), 9);

    bar.set_value(9).unwrap();
    assert_eq!(bar.as_scroll_bar().unwrap().slider_position(), 7);

    bar.set_value(0).unwrap();
    assert_eq!(bar.as_scroll_bar().unwrap().slider_position(), 0);
}

#[test]
fn scroll_bar_shorter_than_two_is_rejected() {
    assert!(Control::scroll_bar(Orientation::Horizontal, 1).is_err());
    let bar = Control::scroll_bar(Orientation::Horizontal, 2).unwrap();
    assert_eq!(bar.as_scroll_bar().unwrap().track_length(), 0);
}

// =============================================================================
// Scenario B: dirty propagation through nested panels
// =============================================================================

#[test]
fn scenario_b_toggling_marks_ancestors_dirty() {
    let mut tree = ControlTree::new();
    let mut host = Host::new();
    let outer = tree.insert(Control::panel(20, 10));
    let inner = tree.add(outer, Control::panel(15, 5).with_position(2, 2)).unwrap();
    let check = tree.add(inner, Control::check_box("Wrap").with_position(1, 1)).unwrap();

    redraw(&mut tree, outer, 20, 10);
    for id in [outer, inner, check] {
        assert!(!tree.is_dirty(id).unwrap());
    }

    // Check box sits at (3, 3) on the surface
    tree.process_mouse(outer, &MouseState::at(4, 3).left_click(), &mut host).unwrap();
    assert!(tree.control(check).unwrap().is_selected());
    for id in [outer, inner, check] {
        assert!(tree.is_dirty(id).unwrap());
    }
}

// =============================================================================
// Scenario C: sparse cells
// =============================================================================

#[test]
fn scenario_c_reads_do_not_store() {
    let mut table = Table::new(10, 10);
    let cell = table.cells().get(0, 0);
    assert_eq!(cell.text, "");
    assert!(table.cells().is_empty());

    table.cells_mut().set_text(5, 5, "x");
    assert_eq!(table.cells().len(), 1);
    assert_eq!(table.cells().get(5, 5).text, "x");
}

// =============================================================================
// Scenario D: one capture per host
// =============================================================================

#[test]
fn scenario_d_second_bar_is_blocked_while_first_captured() {
    let mut tree = ControlTree::new();
    let mut host = Host::new();
    let root = tree.insert(Control::panel(20, 12));
    let first = tree.add(root, Control::scroll_bar(Orientation::Vertical, 10).unwrap()).unwrap();
    let second = tree
        .add(root, Control::scroll_bar(Orientation::Vertical, 10).unwrap().with_position(5, 0))
        .unwrap();

    // Press on the first bar's slider
    tree.process_mouse(first, &MouseState::at(0, 1).pressed(MouseButton::Left), &mut host).unwrap();
    assert_eq!(host.captured_control(), Some(first));

    let over_second = MouseState::at(5, 1).pressed(MouseButton::Left);
    assert!(!tree.process_mouse(second, &over_second, &mut host).unwrap());

    tree.process_mouse(first, &MouseState::at(0, 1).left_click(), &mut host).unwrap();
    assert_eq!(host.captured_control(), None);
}

// =============================================================================
// Input routing
// =============================================================================

#[test]
fn overlap_resolves_to_later_control() {
    let mut ui = Ui::new(20, 5);
    let below = ui.add(Control::button("Below")).unwrap();
    let above = ui.add(Control::button("Above")).unwrap();

    ui.process_mouse(&MouseState::at(2, 0)).unwrap();
    ui.process_mouse(&MouseState::at(2, 0).left_click()).unwrap();

    let events = ui.drain_events();
    assert!(raised(&events, above, &EventKind::Click));
    assert!(raised(&events, above, &EventKind::MouseEnter));
    assert!(!raised(&events, below, &EventKind::MouseEnter));
}

#[test]
fn moving_between_controls_raises_exit_then_enter() {
    let mut ui = Ui::new(20, 5);
    let left = ui.add(Control::button("L")).unwrap();
    let right = ui.add(Control::button("R").with_position(10, 0)).unwrap();

    ui.process_mouse(&MouseState::at(1, 0)).unwrap();
    ui.drain_events();
    ui.process_mouse(&MouseState::at(11, 0)).unwrap();

    let events = ui.drain_events();
    assert!(raised(&events, left, &EventKind::MouseExit));
    assert!(raised(&events, right, &EventKind::MouseEnter));
}

#[test]
fn disabled_container_blocks_children() {
    let mut ui = Ui::new(20, 5);
    let panel = ui.add(Control::panel(10, 3)).unwrap();
    let button = ui.add_to(panel, Control::button("OK")).unwrap();
    ui.tree_mut().set_enabled(panel, false).unwrap();

    ui.process_mouse(&MouseState::at(1, 0).left_click()).unwrap();
    assert!(!raised(&ui.drain_events(), button, &EventKind::Click));
}

// =============================================================================
// List box
// =============================================================================

#[test]
fn list_box_keyboard_keeps_selection_visible() {
    let mut ui = Ui::new(20, 10);
    let list = ui.add(Control::list_box(10, 3)).unwrap();
    ui.tree_mut()
        .update(list, |control| {
            for i in 0..8 {
                control.add_item(format!("row {i}")).unwrap();
            }
        })
        .unwrap();
    ui.focus(list).unwrap();

    let down = KeyboardState::new().release(Key::Down);
    for _ in 0..5 {
        ui.process_keyboard(&down).unwrap();
    }
    let view = ui.tree().control(list).unwrap().as_list_box().unwrap();
    assert_eq!(view.selected_index(), Some(4));
    assert_eq!(view.scroll_offset(), 2);

    let bar = view.scroll_bar().unwrap();
    assert_eq!(ui.tree().control(bar).unwrap().as_scroll_bar().unwrap().value(), 2);
}

#[test]
fn list_box_double_click_executes() {
    let mut ui = Ui::new(20, 10);
    let list = ui.add(Control::list_box(10, 5)).unwrap();
    ui.tree_mut()
        .update(list, |control| {
            control.add_item("alpha").unwrap();
            control.add_item("beta").unwrap();
        })
        .unwrap();

    let at = |ms| MouseState::at(1, 1).at_time(Duration::from_millis(ms));
    ui.process_mouse(&at(0)).unwrap();
    ui.process_mouse(&at(5).pressed(MouseButton::Left)).unwrap();
    ui.process_mouse(&at(10).left_click()).unwrap();
    ui.process_mouse(&at(100).pressed(MouseButton::Left)).unwrap();
    ui.process_mouse(&at(120).left_click()).unwrap();

    let events = ui.drain_events();
    assert!(raised(&events, list, &EventKind::SelectedItemChanged { index: Some(1) }));
    assert!(raised(&events, list, &EventKind::SelectedItemExecuted { index: 1 }));
}

// =============================================================================
// Table
// =============================================================================

fn filled_table(ui: &mut Ui, rows: usize, columns: usize) -> ControlId {
    let table = ui.add(Control::table(5, 4)).unwrap();
    ui.tree_mut()
        .update(table, |control| {
            let cells = control.table_mut().unwrap().cells_mut();
            for row in 0..rows {
                for column in 0..columns {
                    cells.set_text(row, column, "x");
                }
            }
        })
        .unwrap();
    table
}

#[test]
fn table_shows_bars_only_when_content_overflows() {
    let mut ui = Ui::new(20, 10);
    let table = filled_table(&mut ui, 10, 3);
    let view = ui.tree().control(table).unwrap().as_table().unwrap();

    assert!(view.is_scroll_bar_visible(Orientation::Vertical));
    assert!(!view.is_scroll_bar_visible(Orientation::Horizontal));
    assert_eq!(view.viewport(), (4, 4));
    assert_eq!(view.scroll_stops(Orientation::Vertical).len(), 7);

    let bar = view.vertical_scroll_bar().unwrap();
    assert_eq!(ui.tree().control(bar).unwrap().as_scroll_bar().unwrap().maximum(), 6);
}

#[test]
fn table_bar_value_moves_viewport_to_stop() {
    let mut ui = Ui::new(20, 10);
    let table = filled_table(&mut ui, 10, 3);
    let bar = ui.tree().control(table).unwrap().as_table().unwrap().vertical_scroll_bar().unwrap();

    ui.tree_mut().update(bar, |control| control.set_value(6)).unwrap().unwrap();
    let view = ui.tree().control(table).unwrap().as_table().unwrap();
    assert_eq!(view.start_render_y(), 6);
    assert_eq!(view.cell_at(Point::new(0, 3)), Some((9, 0)));
}

#[test]
fn table_selection_scrolls_into_view() {
    let mut ui = Ui::new(20, 10);
    let table = filled_table(&mut ui, 10, 3);

    ui.tree_mut().update(table, |control| control.select_cell(Some((9, 1)))).unwrap().unwrap();
    let view = ui.tree().control(table).unwrap().as_table().unwrap();
    assert_eq!(view.selected(), Some((9, 1)));
    assert_eq!(view.start_render_y(), 6);
}

#[test]
fn table_wheel_scrolls_one_stop() {
    let mut ui = Ui::new(20, 10);
    let table = filled_table(&mut ui, 10, 3);

    ui.process_mouse(&MouseState::at(1, 1).scrolled(1)).unwrap();
    assert_eq!(ui.tree().control(table).unwrap().as_table().unwrap().start_render_y(), 1);
}

#[test]
fn table_cell_clicks_raise_cell_events() {
    let mut ui = Ui::new(20, 10);
    let table = filled_table(&mut ui, 3, 3);

    ui.process_mouse(&MouseState::at(1, 2)).unwrap();
    ui.process_mouse(&MouseState::at(1, 2).left_click()).unwrap();
    let events = ui.drain_events();
    assert!(raised(&events, table, &EventKind::CellEnter { row: 2, column: 1 }));
    assert!(raised(&events, table, &EventKind::CellLeftClick { row: 2, column: 1 }));
    assert!(raised(
        &events,
        table,
        &EventKind::SelectedCellChanged {
            previous: None,
            current: Some((2, 1)),
        }
    ));
}

#[test]
fn table_with_far_sparse_row_scrolls_to_it() {
    let mut ui = Ui::new(20, 10);
    let table = filled_table(&mut ui, 1, 1);
    for _ in 0..3 {
        ui.tree_mut()
            .update(table, |control| control.table_mut().map(|t| t.cells_mut().set_text(100_000, 0, "far")))
            .unwrap()
            .unwrap();
    }

    let view = ui.tree().control(table).unwrap().as_table().unwrap();
    assert!(view.is_scroll_bar_visible(Orientation::Vertical));
    // 100 001 rows of height 1 in a viewport 4 high
    assert_eq!(view.scroll_stops(Orientation::Vertical).len(), 99_998);

    ui.tree_mut()
        .update(table, |control| control.select_cell(Some((100_000, 0))))
        .unwrap()
        .unwrap();
    let view = ui.tree().control(table).unwrap().as_table().unwrap();
    assert_eq!(view.start_render_y(), 99_997);
    assert_eq!(view.cell_at(Point::new(0, 3)), Some((100_000, 0)));
}

// =============================================================================
// Tabs
// =============================================================================

#[test]
fn tab_header_click_switches_pages() {
    let mut ui = Ui::new(30, 10);
    let tabs = ui.add(Control::tab_control(20, 6)).unwrap();
    let first = ui.tree_mut().add_tab(tabs, "One").unwrap();
    let second = ui.tree_mut().add_tab(tabs, "Two").unwrap();
    let inside = ui.add_to(second, Control::button("Go")).unwrap();

    // "One" spans columns 0..5, "Two" 5..10
    ui.process_mouse(&MouseState::at(6, 0)).unwrap();
    ui.process_mouse(&MouseState::at(6, 0).left_click()).unwrap();

    assert!(!ui.tree().control(first).unwrap().base().is_visible());
    assert!(ui.tree().control(second).unwrap().base().is_visible());
    assert_eq!(ui.tree().absolute_position(inside).unwrap(), Point::new(0, 1));
}
