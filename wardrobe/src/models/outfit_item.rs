use sea_orm::entity::prelude::*;

/// Join row between an outfit and one of its clothing items
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "outfit_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub outfit_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub clothing_item_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::outfit::Entity",
        from = "Column::OutfitId",
        to = "super::outfit::Column::Id",
        on_delete = "Cascade"
    )]
    Outfit,
    #[sea_orm(
        belongs_to = "super::clothing_item::Entity",
        from = "Column::ClothingItemId",
        to = "super::clothing_item::Column::Id",
        on_delete = "Cascade"
    )]
    ClothingItem,
}

impl Related<super::outfit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Outfit.def()
    }
}

impl Related<super::clothing_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClothingItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
