// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_domain::{
    AttendanceKey, BimesterId, CategoryId, CourseId, CycleId, EnrollmentId, EvaluationKey,
    GradeId, GridCell, ScaleCode, SectionId, StudentId, WeekId,
};

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

pub fn week(id: i64) -> WeekId {
    WeekId::new(id).unwrap()
}

pub fn eval_key(enrollment: i64, category: i64) -> EvaluationKey {
    EvaluationKey::new(
        EnrollmentId::new(enrollment).unwrap(),
        CategoryId::new(category).unwrap(),
    )
}

pub fn attendance_key(student: i64, course: i64) -> AttendanceKey {
    AttendanceKey::new(
        StudentId::new(student).unwrap(),
        CourseId::new(course).unwrap(),
    )
}

pub fn cell(code: &str) -> GridCell {
    GridCell::new(ScaleCode::new(code).unwrap())
}
