// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scripted transport and fixtures.

use crate::{ApiRequest, ClientError, Transport};
use campus_domain::{
    AttendanceKey, BimesterId, CategoryId, CourseId, CycleId, EnrollmentId, EvaluationKey,
    GradeId, GridCell, ScaleCode, SectionId, StudentId,
};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use time::Date;
use time::macros::date;
use tokio::sync::oneshot;

type Reply = Result<Value, ClientError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

#[derive(Default)]
struct MockState {
    requests: Vec<ApiRequest>,
    replies: HashMap<String, VecDeque<Scripted>>,
}

/// A transport answering from a script keyed by `ApiRequest::describe`.
///
/// Replies for the same request are consumed in order. Requests without a
/// scripted reply answer 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, described: &str, scripted: Scripted) {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(described.to_string())
            .or_default()
            .push_back(scripted);
    }

    /// Answers with a successful envelope around `data`.
    pub fn reply_ok(&self, described: &str, data: Value) {
        self.push(described, Scripted::Ready(Ok(ok_body(data))));
    }

    /// Answers with `body` as is, without wrapping it in an envelope.
    pub fn reply_body(&self, described: &str, body: Value) {
        self.push(described, Scripted::Ready(Ok(body)));
    }

    /// Answers with an error.
    pub fn reply_err(&self, described: &str, err: ClientError) {
        self.push(described, Scripted::Ready(Err(err)));
    }

    /// Holds the reply until the returned sender fires.
    pub fn gate(&self, described: &str) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.push(described, Scripted::Gated(receiver));
        sender
    }

    /// Every request seen so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Every request seen so far, described.
    pub fn described(&self) -> Vec<String> {
        self.requests().iter().map(ApiRequest::describe).collect()
    }

    /// How many times a request was seen.
    pub fn count(&self, described: &str) -> usize {
        self.described().iter().filter(|d| *d == described).count()
    }

    /// Yields to spawned tasks until `count` requests have been seen.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..1_000 {
            if self.requests().len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!(
            "expected {count} requests, saw {:?}",
            self.described()
        );
    }

    fn take(&self, request: ApiRequest) -> Option<Scripted> {
        let mut state = self.state.lock().unwrap();
        let described: String = request.describe();
        state.requests.push(request);
        state
            .replies
            .get_mut(&described)
            .and_then(VecDeque::pop_front)
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value, ClientError> {
        match self.take(request) {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(receiver)) => receiver.await.unwrap_or(Err(ClientError::Cancelled)),
            None => Err(not_found()),
        }
    }
}

pub fn ok_body(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn not_found() -> ClientError {
    ClientError::Http {
        status: 404,
        message: String::from("Not Found"),
    }
}

pub fn server_error() -> ClientError {
    ClientError::Http {
        status: 500,
        message: String::from("Internal Server Error"),
    }
}

pub fn cycle(id: i64) -> CycleId {
    CycleId::new(id).unwrap()
}

pub fn bimester(id: i64) -> BimesterId {
    BimesterId::new(id).unwrap()
}

pub fn grade(id: i64) -> GradeId {
    GradeId::new(id).unwrap()
}

pub fn section(id: i64) -> SectionId {
    SectionId::new(id).unwrap()
}

pub fn eval_key(enrollment: i64, category: i64) -> EvaluationKey {
    EvaluationKey::new(
        EnrollmentId::new(enrollment).unwrap(),
        CategoryId::new(category).unwrap(),
    )
}

pub fn attendance_key(student: i64, course: i64) -> AttendanceKey {
    AttendanceKey::new(StudentId::new(student).unwrap(), CourseId::new(course).unwrap())
}

pub fn cell(code: &str) -> GridCell {
    GridCell::new(ScaleCode::new(code).unwrap())
}

pub const SHEET_DATE: Date = date!(2026 - 03 - 10);

pub fn bimester_json(id: i64, cycle_id: i64) -> Value {
    json!({ "id": id, "cycleId": cycle_id, "name": format!("Bimestre {id}"), "isActive": true })
}

pub fn grade_json(id: i64) -> Value {
    json!({ "id": id, "name": format!("Grado {id}") })
}

pub fn section_json(id: i64, grade_id: i64) -> Value {
    json!({ "id": id, "name": "A", "gradeId": grade_id })
}

pub fn week_json(id: i64, number: u8) -> Value {
    json!({ "id": id, "number": number, "startDate": "2026-03-09", "endDate": "2026-03-13" })
}

/// A grid with two students and two categories.
pub fn grid_json(evaluations: &Value) -> Value {
    json!({
        "topicId": 4,
        "sectionId": 30,
        "bimesterId": 10,
        "categories": [
            { "id": 2, "name": "Comprension", "order": 1 },
            { "id": 3, "name": "Expresion", "order": 2 }
        ],
        "students": [
            { "enrollmentId": 5, "studentId": 50, "fullName": "Ana Quispe" },
            { "enrollmentId": 6, "studentId": 60, "fullName": "Luis Mamani" }
        ],
        "evaluations": evaluations
    })
}

pub fn record_json(id: i64, student: i64, course: i64, status: i64) -> Value {
    json!({
        "id": id,
        "studentId": student,
        "courseId": course,
        "date": "2026-03-10",
        "statusId": status
    })
}
