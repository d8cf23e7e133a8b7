//! Tests for pagination module

use super::*;

// ============================================================================
// NextPage Tests
// ============================================================================

#[test]
fn test_next_page_done() {
    let next = NextPage::Done;
    assert!(next.is_done());
    assert!(!next.is_continue());
}

#[test]
fn test_next_page_continue() {
    let next = NextPage::Continue {
        query_params: vec![("offset".to_string(), "100".to_string())],
    };
    assert!(next.is_continue());
    assert!(!next.is_done());
}

// ============================================================================
// PaginationState Tests
// ============================================================================

#[test]
fn test_pagination_state_default() {
    let state = PaginationState::new();
    assert_eq!(state.page, 0);
    assert_eq!(state.offset, 0);
    assert_eq!(state.total_fetched, 0);
    assert!(!state.done);
}

#[test]
fn test_pagination_state_mutations() {
    let mut state = PaginationState::new();

    state.advance(100);
    assert_eq!(state.page, 1);
    assert_eq!(state.offset, 100);

    state.add_fetched(100);
    assert_eq!(state.total_fetched, 100);

    state.mark_done();
    assert!(state.done);
}

// ============================================================================
// Offset Paginator Tests
// ============================================================================

#[test]
fn test_offset_paginator_first_page() {
    let paginator = OffsetPaginator::default();
    let params = paginator.query_params(&PaginationState::new());

    assert_eq!(
        params,
        vec![
            ("offset".to_string(), "0".to_string()),
            ("count".to_string(), "100".to_string()),
        ]
    );
}

#[test]
fn test_offset_paginator_advances_by_page_size() {
    let paginator = OffsetPaginator::new(100);
    let mut state = PaginationState::new();

    let next = paginator.process_response(100, &mut state);
    assert_eq!(
        next,
        NextPage::Continue {
            query_params: vec![
                ("offset".to_string(), "100".to_string()),
                ("count".to_string(), "100".to_string()),
            ],
        }
    );

    paginator.process_response(100, &mut state);
    assert_eq!(state.page, 2);
    assert_eq!(state.offset, 200);
    assert_eq!(state.total_fetched, 200);
}

#[test]
fn test_offset_paginator_continues_after_short_page() {
    let paginator = OffsetPaginator::new(100);
    let mut state = PaginationState::new();

    let next = paginator.process_response(3, &mut state);
    assert!(next.is_continue());
    assert!(!state.done);
    assert_eq!(state.offset, 100);
}

#[test]
fn test_offset_paginator_stops_on_empty() {
    let paginator = OffsetPaginator::new(100);
    let mut state = PaginationState::new();
    paginator.process_response(100, &mut state);

    let next = paginator.process_response(0, &mut state);
    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.page, 1);
    assert_eq!(state.total_fetched, 100);
}
