//! 课程资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "course_materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub original_name: String,
    pub stored_name: String,
    pub url: String,
    pub file_size: i64,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_material(self) -> crate::models::courses::entities::CourseMaterial {
        use crate::models::courses::entities::CourseMaterial;
        use chrono::{DateTime, Utc};

        CourseMaterial {
            id: self.id,
            course_id: self.course_id,
            title: self.title,
            original_name: self.original_name,
            filename: self.stored_name,
            url: self.url,
            file_size: self.file_size,
            uploaded_by: self.uploaded_by,
            uploaded_at: DateTime::<Utc>::from_timestamp(self.uploaded_at, 0).unwrap_or_default(),
        }
    }
}
