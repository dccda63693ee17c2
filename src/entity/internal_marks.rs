//! 内部评估（CIE）成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "internal_marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub subject_type: String,
    pub test1: Option<f64>,
    pub test2: Option<f64>,
    pub assignment1: Option<f64>,
    pub seminar2: Option<f64>,
    pub theory_test1: Option<f64>,
    pub theory_test2: Option<f64>,
    pub theory_assignment1: Option<f64>,
    pub theory_seminar: Option<f64>,
    pub conduction: Option<f64>,
    pub record: Option<f64>,
    pub lab_test: Option<f64>,
    pub conduction_viva: Option<f64>,
    pub record_journal: Option<f64>,
    pub lab_test_only: Option<f64>,
    pub calculated_cie: f64,
    pub uploaded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_internal_marks(self) -> crate::models::internal_marks::entities::InternalMarks {
        use crate::models::courses::entities::SubjectType;
        use crate::models::internal_marks::entities::{CieComponents, InternalMarks};
        use chrono::{DateTime, Utc};

        InternalMarks {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            subject_type: self.subject_type.parse().unwrap_or(SubjectType::Theory),
            components: CieComponents {
                test1: self.test1,
                test2: self.test2,
                assignment1: self.assignment1,
                seminar2: self.seminar2,
                theory_test1: self.theory_test1,
                theory_test2: self.theory_test2,
                theory_assignment1: self.theory_assignment1,
                theory_seminar: self.theory_seminar,
                conduction: self.conduction,
                record: self.record,
                lab_test: self.lab_test,
                conduction_viva: self.conduction_viva,
                record_journal: self.record_journal,
                lab_test_only: self.lab_test_only,
            },
            calculated_cie: self.calculated_cie,
            uploaded_by: self.uploaded_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
