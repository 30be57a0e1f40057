// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MockTransport, bimester, cell, eval_key, grid_json, section, server_error};
use crate::{
    ApiRequest, CampusClient, EvaluationGridEditor, GridScope, Method, SaveReport,
};
use campus::{GridPattern, UNACKNOWLEDGED_REASON};
use campus_domain::{CategoryId, EvaluationKey, ScaleCode, TeacherId, TopicId};
use serde_json::{Value, json};

const GRID: &str = "GET /api/erica-evaluations/grid?topicId=4&sectionId=30&bimesterId=10";
const SAVE: &str = "POST /api/erica-evaluations/grid/save";

fn scope() -> GridScope {
    GridScope {
        topic_id: TopicId::new(4).unwrap(),
        section_id: section(30),
        bimester_id: bimester(10),
        teacher_id: TeacherId::new(7).unwrap(),
    }
}

fn editor(mock: &MockTransport) -> EvaluationGridEditor<MockTransport> {
    CampusClient::with_default_cache(mock.clone()).grid_editor(scope())
}

fn evaluation(enrollment: i64, category: i64, code: &str) -> Value {
    json!({ "enrollmentId": enrollment, "categoryId": category, "scaleCode": code })
}

fn last_save_body(mock: &MockTransport) -> Value {
    let request: ApiRequest = mock
        .requests()
        .into_iter()
        .rev()
        .find(|r| r.method == Method::Post)
        .unwrap();
    request.body.unwrap()
}

#[tokio::test]
async fn test_save_scenario_clears_key_and_shows_refreshed_value() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_ok(SAVE, json!({ "saved": [{ "enrollmentId": 5, "categoryId": 2 }] }));
    mock.reply_ok(GRID, grid_json(&json!([evaluation(5, 2, "E")])));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("E"));
    assert_eq!(editor.get_value(&eval_key(5, 2)), Some(&cell("E")));
    assert_eq!(editor.buffer().server_value(&eval_key(5, 2)), None);

    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert!(report.is_complete_success());
    assert!(report.refreshed);
    assert_eq!(report.result.succeeded, vec![eval_key(5, 2)]);
    assert!(!editor.buffer().is_pending(&eval_key(5, 2)));
    assert_eq!(editor.get_value(&eval_key(5, 2)), Some(&cell("E")));
    assert_eq!(editor.buffer().server_value(&eval_key(5, 2)), Some(&cell("E")));
    assert_eq!(mock.count(GRID), 2);

    let body: Value = last_save_body(&mock);
    assert_eq!(body["topicId"], 4);
    assert_eq!(body["teacherId"], 7);
    assert_eq!(body["evaluations"], json!([evaluation(5, 2, "E")]));
}

#[tokio::test]
async fn test_partial_failure_keeps_only_the_refused_entry() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_ok(
        SAVE,
        json!({
            "saved": [
                { "enrollmentId": 5, "categoryId": 2 },
                { "enrollmentId": 6, "categoryId": 2 }
            ],
            "failed": [
                { "enrollmentId": 5, "categoryId": 3, "error": "Escala no valida" }
            ]
        }),
    );
    mock.reply_ok(
        GRID,
        grid_json(&json!([evaluation(5, 2, "A"), evaluation(6, 2, "C")])),
    );
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("A"));
    editor.set_value(eval_key(5, 3), cell("B"));
    editor.set_value(eval_key(6, 2), cell("C"));
    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert_eq!(report.result.succeeded, vec![eval_key(5, 2), eval_key(6, 2)]);
    assert_eq!(report.result.failed.len(), 1);
    assert_eq!(
        report.banner.as_deref(),
        Some("1 of 3 changes could not be saved")
    );
    assert_eq!(editor.pending_count(), 1);
    assert_eq!(editor.failure(&eval_key(5, 3)), Some("Escala no valida"));
    assert_eq!(editor.get_value(&eval_key(5, 3)), Some(&cell("B")));
    assert_eq!(editor.buffer().server_value(&eval_key(5, 2)), Some(&cell("A")));
    assert_eq!(editor.buffer().server_value(&eval_key(6, 2)), Some(&cell("C")));
    assert!(editor.has_pending(eval_key(5, 3).enrollment_id));
    assert!(!editor.has_pending(eval_key(6, 2).enrollment_id));
}

#[tokio::test]
async fn test_request_failure_leaves_buffer_untouched() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_err(SAVE, server_error());
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("A"));
    editor.set_value(eval_key(6, 3), cell("B"));
    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert_eq!(
        report.banner.as_deref(),
        Some("Could not save changes: HTTP 500: Internal Server Error")
    );
    assert!(!report.refreshed);
    assert_eq!(report.result.failed.len(), 2);
    assert_eq!(editor.pending_count(), 2);
    assert_eq!(editor.failure(&eval_key(5, 2)), None);
    assert_eq!(mock.count(GRID), 1);
}

#[tokio::test]
async fn test_unlisted_entries_are_reported_as_failed() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_ok(SAVE, json!({ "saved": [{ "enrollmentId": 5, "categoryId": 2 }] }));
    mock.reply_ok(GRID, grid_json(&json!([evaluation(5, 2, "A")])));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("A"));
    editor.set_value(eval_key(6, 2), cell("B"));
    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert_eq!(report.result.failed[0].key, eval_key(6, 2));
    assert_eq!(editor.failure(&eval_key(6, 2)), Some(UNACKNOWLEDGED_REASON));
}

#[tokio::test]
async fn test_empty_response_acknowledges_the_whole_batch() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_ok(SAVE, json!({}));
    mock.reply_ok(GRID, grid_json(&json!([])));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("A"));
    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert!(report.is_complete_success());
    assert_eq!(editor.pending_count(), 0);
}

#[tokio::test]
async fn test_success_without_data_acknowledges_and_reloads() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_body(
        SAVE,
        json!({ "success": true, "message": "Evaluaciones guardadas" }),
    );
    mock.reply_ok(GRID, grid_json(&json!([evaluation(5, 2, "B")])));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("B"));
    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert!(report.is_complete_success());
    assert_eq!(report.banner, None);
    assert!(report.refreshed);
    assert_eq!(editor.pending_count(), 0);
    assert_eq!(editor.buffer().server_value(&eval_key(5, 2)), Some(&cell("B")));
    assert_eq!(mock.count(GRID), 2);
}

#[tokio::test]
async fn test_unsuccessful_save_without_data_is_a_request_failure() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([])));
    mock.reply_body(SAVE, json!({ "success": false, "message": "Periodo cerrado" }));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("B"));
    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert_eq!(
        report.banner.as_deref(),
        Some("Could not save changes: Periodo cerrado")
    );
    assert!(editor.buffer().is_pending(&eval_key(5, 2)));
}

#[tokio::test]
async fn test_save_with_nothing_pending_sends_nothing() {
    let mock: MockTransport = MockTransport::new();
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);

    let report: SaveReport<EvaluationKey> = editor.save().await;

    assert!(report.result.is_empty());
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_reload_keeps_pending_edits() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([evaluation(5, 2, "C")])));
    mock.reply_ok(GRID, grid_json(&json!([evaluation(5, 2, "B")])));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);
    editor.load().await.unwrap();

    editor.set_value(eval_key(5, 2), cell("A"));
    editor.load().await.unwrap();

    assert_eq!(editor.get_value(&eval_key(5, 2)), Some(&cell("A")));
    assert_eq!(editor.buffer().server_value(&eval_key(5, 2)), Some(&cell("B")));
    assert_eq!(editor.discard(), 1);
    assert_eq!(editor.get_value(&eval_key(5, 2)), Some(&cell("B")));
}

#[tokio::test]
async fn test_patterns_fill_through_the_buffer() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(GRID, grid_json(&json!([evaluation(5, 2, "A")])));
    let mut editor: EvaluationGridEditor<MockTransport> = editor(&mock);

    let before_load: usize = editor.apply_pattern(&GridPattern::FillEmpty {
        scale_code: ScaleCode::new("B").unwrap(),
    });
    assert_eq!(before_load, 0);

    editor.load().await.unwrap();
    let column: usize = editor.apply_pattern(&GridPattern::Column {
        category_id: CategoryId::new(2).unwrap(),
        scale_code: ScaleCode::new("A").unwrap(),
    });
    assert_eq!(column, 1);
    assert_eq!(editor.get_value(&eval_key(6, 2)), Some(&cell("A")));

    let filled: usize = editor.apply_pattern(&GridPattern::FillEmpty {
        scale_code: ScaleCode::new("C").unwrap(),
    });
    assert_eq!(filled, 2);
    assert_eq!(editor.get_value(&eval_key(5, 3)), Some(&cell("C")));
    assert_eq!(editor.get_value(&eval_key(6, 3)), Some(&cell("C")));
    assert_eq!(editor.pending_count(), 3);
}
