//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Gender, Product};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(unique)]
    pub slug: String,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub gender: String,
    pub tags: Vec<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_image::Entity")]
    ProductImage,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::product_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductImage.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert the bare row; images and owner are attached by the repository.
impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            title: model.title,
            price: model.price,
            description: model.description,
            slug: model.slug,
            stock: model.stock,
            sizes: model.sizes,
            gender: Gender::from(model.gender.as_str()),
            tags: model.tags,
            user_id: model.user_id,
            images: Vec::new(),
            user: None,
        }
    }
}
