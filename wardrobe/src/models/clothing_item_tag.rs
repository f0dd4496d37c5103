use sea_orm::entity::prelude::*;

/// Join row between a clothing item and a tag
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "clothing_item_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub clothing_item_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clothing_item::Entity",
        from = "Column::ClothingItemId",
        to = "super::clothing_item::Column::Id",
        on_delete = "Cascade"
    )]
    ClothingItem,
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagId",
        to = "super::tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::clothing_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClothingItem.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
