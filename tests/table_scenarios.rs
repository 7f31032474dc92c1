//! End-to-end behavior of the table engine and the table shell.

use clinic_table::table::filter::{filter_with, MatchMode};
use clinic_table::table::paginate::page_count;
use clinic_table::{
    display_string, filter, handle_event, paginate, sort, Action, ColumnDef, ColumnKind, Event,
    Record, SortDirection, SortSpec, TableProps, TableState, Theme,
};

fn numbered_rows(count: usize) -> Vec<Record> {
    (1..=count)
        .map(|n| Record::new().with("n", n).with("name", format!("Patient {n}")))
        .collect()
}

fn numbered_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("n", "#").with_kind(ColumnKind::Number),
        ColumnDef::new("name", "Name"),
    ]
}

fn table(rows: Vec<Record>, columns: Vec<ColumnDef>) -> TableState {
    TableState::new(TableProps::new(rows, columns), Theme::default())
}

fn page_numbers(state: &TableState) -> Vec<u64> {
    state
        .page_records()
        .iter()
        .filter_map(|r| r.value("n").as_u64())
        .collect()
}

#[test]
fn twenty_five_rows_make_three_pages_and_next_stops_at_the_last() {
    let mut state = table(numbered_rows(25), numbered_columns());
    assert_eq!(state.current_page().page_count, 3);

    assert!(state.next_page());
    assert!(state.next_page());
    assert_eq!(page_numbers(&state), vec![21, 22, 23, 24, 25]);

    assert!(!state.next_page());
    assert_eq!(state.pagination.page_index, 2);
}

#[test]
fn search_matches_substrings_case_insensitively() {
    let rows = vec![
        Record::new().with("name", "John Doe"),
        Record::new().with("name", "Mary Jane"),
        Record::new().with("name", "Jolene Smith"),
    ];
    let columns = vec![ColumnDef::new("name", "Name")];

    let names: Vec<String> = filter(&rows, &columns, "jo")
        .iter()
        .map(|r| display_string(r.value("name")))
        .collect();
    assert_eq!(names, vec!["John Doe", "Jolene Smith"]);
}

#[test]
fn numeric_descending_sort_keeps_ties_in_original_order() {
    let rows: Vec<Record> = [100, 50, 100, 25]
        .iter()
        .enumerate()
        .map(|(i, budget)| Record::new().with("id", i).with("budget", *budget))
        .collect();
    let budget = ColumnDef::new("budget", "Budget");

    let sorted = sort(rows.iter().collect(), &budget, SortDirection::Descending);
    let pairs: Vec<(u64, u64)> = sorted
        .iter()
        .filter_map(|r| Some((r.value("budget").as_u64()?, r.value("id").as_u64()?)))
        .collect();
    assert_eq!(pairs, vec![(100, 0), (100, 2), (50, 1), (25, 3)]);
}

#[test]
fn shrinking_rows_keeps_valid_page_and_clamps_invalid_one() {
    let mut state = table(numbered_rows(22), numbered_columns());
    assert!(state.last_page());
    assert_eq!(state.pagination.page_index, 2);

    state.set_rows(numbered_rows(21));
    assert_eq!(state.pagination.page_index, 2);
    assert_eq!(page_numbers(&state), vec![21]);

    state.set_rows(numbered_rows(8));
    assert_eq!(state.pagination.page_index, 0);
    assert_eq!(state.current_page().page_count, 1);
}

#[test]
fn forced_page_size_change_returns_to_first_page() {
    let props = TableProps {
        forced_page_size: Some(10),
        ..TableProps::new(numbered_rows(45), numbered_columns())
    };
    let mut state = TableState::new(props, Theme::default());
    assert!(state.next_page());
    assert_eq!(page_numbers(&state).first(), Some(&11));

    let (render, _) = handle_event(&mut state, &Event::SetForcedPageSize(Some(20))).unwrap();
    assert!(render);
    assert_eq!(state.pagination.page_index, 0);
    assert_eq!(page_numbers(&state), (1..=20).collect::<Vec<u64>>());
}

#[test]
fn header_clicks_cycle_none_ascending_descending_none() {
    let rows = vec![
        Record::new().with("n", 2),
        Record::new().with("n", 3),
        Record::new().with("n", 1),
    ];
    let mut state = table(rows, vec![ColumnDef::new("n", "#")]);
    let order = |s: &TableState| -> Vec<u64> {
        s.visible_records().filter_map(|r| r.value("n").as_u64()).collect()
    };

    assert_eq!(order(&state), vec![2, 3, 1]);

    let (_, actions) = handle_event(&mut state, &Event::SortColumn(0)).unwrap();
    assert_eq!(order(&state), vec![1, 2, 3]);
    assert!(matches!(actions.as_slice(), [Action::PersistPreferences(p)] if p.sort == Some(SortSpec::ascending("n"))));

    handle_event(&mut state, &Event::SortColumn(0)).unwrap();
    assert_eq!(order(&state), vec![3, 2, 1]);

    handle_event(&mut state, &Event::SortColumn(0)).unwrap();
    assert_eq!(order(&state), vec![2, 3, 1]);
    assert!(state.sort.is_none());
}

#[test]
fn typing_a_query_filters_and_clamps_the_page() {
    let mut state = table(numbered_rows(30), numbered_columns());
    state.last_page();

    handle_event(&mut state, &Event::SearchMode).unwrap();
    for c in "patient 1".chars() {
        handle_event(&mut state, &Event::Char(c)).unwrap();
    }

    // "Patient 1" and "Patient 10".."Patient 19"
    assert_eq!(state.visible_len(), 11);
    assert_eq!(state.pagination.page_index, 0);

    handle_event(&mut state, &Event::ExitSearch).unwrap();
    assert_eq!(state.visible_len(), 30);
}

#[test]
fn empty_rows_show_one_page_and_the_empty_message() {
    let props = TableProps {
        empty_message: "No patients yet.".to_string(),
        ..TableProps::new(Vec::new(), numbered_columns())
    };
    let state = TableState::new(props, Theme::default());

    let page = state.current_page();
    assert_eq!(page.page_count, 1);
    assert!(page.is_empty());

    let vm = state.compute_viewmodel(24, 80);
    assert!(vm.rows.is_empty());
    assert_eq!(vm.empty_state.map(|e| e.message), Some("No patients yet.".to_string()));
}

#[test]
fn filter_never_grows_and_only_keeps_matching_rows() {
    let rows = numbered_rows(40);
    let columns = numbered_columns();

    for query in ["", "1", "patient 3", "PATIENT 40", "zzz", " "] {
        let kept = filter_with(&rows, &columns, query, MatchMode::Substring);
        assert!(kept.len() <= rows.len());

        let needle = query.to_lowercase();
        for row in &rows {
            let matches = columns
                .iter()
                .any(|c| c.display_value(row).to_lowercase().contains(&needle));
            let included = kept.iter().any(|k| std::ptr::eq(*k, row));
            assert_eq!(included, matches, "query {query:?}");
        }
    }
}

#[test]
fn sorting_twice_in_the_same_direction_is_idempotent() {
    let rows: Vec<Record> = ["b", "a", "C", "a", "B"]
        .iter()
        .enumerate()
        .map(|(i, s)| Record::new().with("id", i).with("s", *s))
        .collect();
    let column = ColumnDef::new("s", "S");

    let once = sort(rows.iter().collect(), &column, SortDirection::Ascending);
    let twice = sort(once.clone(), &column, SortDirection::Ascending);
    assert_eq!(once, twice);
}

#[test]
fn pages_cover_every_row_exactly_once() {
    let rows: Vec<u32> = (0..47).collect();
    for size in [1, 5, 10, 47, 50] {
        let pages = page_count(rows.len(), size);
        let joined: Vec<u32> = (0..pages)
            .flat_map(|i| paginate(&rows, i, size).rows.to_vec())
            .collect();
        assert_eq!(joined, rows, "page size {size}");
    }
}

#[test]
fn page_index_stays_in_range_as_rows_shrink() {
    let mut state = table(numbered_rows(95), numbered_columns());
    state.last_page();

    for count in (0..95).rev().step_by(7) {
        state.set_rows(numbered_rows(count));
        let page = state.current_page();
        assert!(page.page_index < page.page_count, "{count} rows");
    }
}
