// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MockTransport, grade_json};
use crate::{
    AttendanceService, CacheEnvelope, GRADES_CACHE_KEY, LookupCache, ManualClock, MemoryCache,
    STATUSES_CACHE_KEY,
};
use campus_domain::{AttendanceStatus, Grade, StatusCategory};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

const TTL: Duration = Duration::from_secs(60);

#[test]
fn test_envelope_expires_strictly_after_ttl() {
    let envelope: CacheEnvelope = CacheEnvelope {
        data: json!([]),
        timestamp: 1_000,
        ttl: 500,
    };

    assert!(!envelope.is_expired(1_000));
    assert!(!envelope.is_expired(1_500));
    assert!(envelope.is_expired(1_501));
}

#[test]
fn test_fresh_entry_is_returned() {
    let cache: MemoryCache<ManualClock> = MemoryCache::with_clock(ManualClock::new(0));
    cache.set("lookup", json!([1, 2, 3]), TTL);
    cache.clock().advance(Duration::from_secs(59));

    assert_eq!(cache.get("lookup"), Some(json!([1, 2, 3])));
}

#[test]
fn test_expired_entry_is_evicted_on_read() {
    let cache: MemoryCache<ManualClock> = MemoryCache::with_clock(ManualClock::new(0));
    cache.set("lookup", json!([1]), TTL);
    cache.clock().advance(Duration::from_secs(61));

    assert_eq!(cache.get("lookup"), None);
    assert!(!cache.contains("lookup"));
}

#[test]
fn test_unreadable_entry_is_evicted_on_read() {
    let cache: MemoryCache<ManualClock> = MemoryCache::with_clock(ManualClock::new(0));
    cache.set_raw("lookup", "{not json");

    assert_eq!(cache.get("lookup"), None);
    assert!(!cache.contains("lookup"));
}

#[test]
fn test_clear_removes_entry() {
    let cache: MemoryCache<ManualClock> = MemoryCache::with_clock(ManualClock::new(0));
    cache.set("lookup", json!(true), TTL);
    cache.clear("lookup");

    assert_eq!(cache.get("lookup"), None);
}

#[test]
fn test_entry_is_stored_in_envelope_form() {
    let cache: MemoryCache<ManualClock> = MemoryCache::with_clock(ManualClock::new(42));
    cache.set("lookup", json!({"a": 1}), Duration::from_millis(250));
    cache.set_raw(
        "copy",
        &serde_json::to_string(&CacheEnvelope {
            data: json!({"a": 1}),
            timestamp: 42,
            ttl: 250,
        })
        .unwrap(),
    );

    assert_eq!(cache.get("copy"), cache.get("lookup"));
}

fn attendance_service(
    mock: &MockTransport,
    cache: Arc<MemoryCache<ManualClock>>,
) -> AttendanceService<MockTransport> {
    AttendanceService::new(Arc::new(mock.clone()), cache, TTL)
}

#[tokio::test]
async fn test_grades_are_served_from_cache_until_expiry() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok("GET /api/attendance/grades", json!([grade_json(1)]));
    mock.reply_ok("GET /api/attendance/grades", json!([grade_json(1), grade_json(2)]));
    let cache: Arc<MemoryCache<ManualClock>> =
        Arc::new(MemoryCache::with_clock(ManualClock::new(0)));
    let service: AttendanceService<MockTransport> = attendance_service(&mock, Arc::clone(&cache));

    let first: Vec<Grade> = service.grades().await.unwrap();
    let second: Vec<Grade> = service.grades().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(mock.count("GET /api/attendance/grades"), 1);
    assert!(cache.contains(GRADES_CACHE_KEY));

    cache.clock().advance(Duration::from_secs(61));
    let third: Vec<Grade> = service.grades().await.unwrap();
    assert_eq!(third.len(), 2);
    assert_eq!(mock.count("GET /api/attendance/grades"), 2);
}

#[tokio::test]
async fn test_statuses_cached_in_wrong_shape_are_refetched() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok(
        "GET /api/attendance/statuses",
        json!([{ "id": 1, "code": "P", "name": "Presente", "category": "present" }]),
    );
    let cache: Arc<MemoryCache<ManualClock>> =
        Arc::new(MemoryCache::with_clock(ManualClock::new(0)));
    cache.set(STATUSES_CACHE_KEY, json!({"unexpected": true}), TTL);
    let service: AttendanceService<MockTransport> = attendance_service(&mock, Arc::clone(&cache));

    let statuses: Vec<AttendanceStatus> = service.statuses().await.unwrap();

    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].category, StatusCategory::Present);
    assert_eq!(mock.count("GET /api/attendance/statuses"), 1);
    let cached: Value = cache.get(STATUSES_CACHE_KEY).unwrap();
    assert_eq!(cached[0]["code"], "P");
}

#[tokio::test]
async fn test_failed_lookup_is_not_cached() {
    let mock: MockTransport = MockTransport::new();
    let cache: Arc<MemoryCache<ManualClock>> =
        Arc::new(MemoryCache::with_clock(ManualClock::new(0)));
    let service: AttendanceService<MockTransport> = attendance_service(&mock, Arc::clone(&cache));

    assert!(service.grades().await.unwrap_err().is_not_found());
    assert!(!cache.contains(GRADES_CACHE_KEY));
}

#[tokio::test]
async fn test_invalidate_lookups_forces_a_refetch() {
    let mock: MockTransport = MockTransport::new();
    mock.reply_ok("GET /api/attendance/grades", json!([grade_json(1)]));
    mock.reply_ok("GET /api/attendance/grades", json!([grade_json(1)]));
    let cache: Arc<MemoryCache<ManualClock>> =
        Arc::new(MemoryCache::with_clock(ManualClock::new(0)));
    let service: AttendanceService<MockTransport> = attendance_service(&mock, cache);

    service.grades().await.unwrap();
    service.invalidate_lookups();
    service.grades().await.unwrap();

    assert_eq!(mock.count("GET /api/attendance/grades"), 2);
}
