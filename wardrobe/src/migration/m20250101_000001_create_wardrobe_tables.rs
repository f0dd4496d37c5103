use sea_orm_migration::prelude::*;

use crate::models::{category, clothing_item, clothing_item_tag, outfit, outfit_item, tag, user};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp_column<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn cascade(
    name: &str,
    from: (impl IntoIden + 'static, impl IntoIden + 'static),
    to: (impl IntoIden + 'static, impl IntoIden + 'static),
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from.0, from.1)
        .to(to.0, to.1)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(user::Entity)
                    .if_not_exists()
                    .col(id_column(user::Column::Id))
                    .col(ColumnDef::new(user::Column::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(user::Column::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(user::Column::EmailVerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(user::Column::Password).string_len(255).not_null())
                    .col(timestamp_column(user::Column::CreatedAt))
                    .col(timestamp_column(user::Column::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(category::Entity)
                    .if_not_exists()
                    .col(id_column(category::Column::Id))
                    .col(ColumnDef::new(category::Column::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(category::Column::Slug)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(category::Column::Description).text().null())
                    .col(ColumnDef::new(category::Column::Image).string_len(255).null())
                    .col(ColumnDef::new(category::Column::Icon).string_len(255).null())
                    .col(ColumnDef::new(category::Column::Color).string_len(7).null())
                    .col(
                        ColumnDef::new(category::Column::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(category::Column::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp_column(category::Column::CreatedAt))
                    .col(timestamp_column(category::Column::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(tag::Entity)
                    .if_not_exists()
                    .col(id_column(tag::Column::Id))
                    .col(
                        ColumnDef::new(tag::Column::Name)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp_column(tag::Column::CreatedAt))
                    .col(timestamp_column(tag::Column::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(clothing_item::Entity)
                    .if_not_exists()
                    .col(id_column(clothing_item::Column::Id))
                    .col(ColumnDef::new(clothing_item::Column::UserId).integer().not_null())
                    .col(ColumnDef::new(clothing_item::Column::CategoryId).integer().not_null())
                    .col(ColumnDef::new(clothing_item::Column::Name).string_len(255).not_null())
                    .col(ColumnDef::new(clothing_item::Column::Description).text().null())
                    .col(ColumnDef::new(clothing_item::Column::Color).string_len(50).null())
                    .col(ColumnDef::new(clothing_item::Column::Brand).string_len(100).null())
                    .col(ColumnDef::new(clothing_item::Column::Size).string_len(20).null())
                    .col(ColumnDef::new(clothing_item::Column::Image).string_len(255).null())
                    .col(ColumnDef::new(clothing_item::Column::Price).decimal_len(10, 2).null())
                    .col(ColumnDef::new(clothing_item::Column::Season).string_len(20).null())
                    .col(ColumnDef::new(clothing_item::Column::Condition).string_len(20).null())
                    .col(ColumnDef::new(clothing_item::Column::PurchaseDate).date().null())
                    .col(
                        ColumnDef::new(clothing_item::Column::IsFavorite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp_column(clothing_item::Column::CreatedAt))
                    .col(timestamp_column(clothing_item::Column::UpdatedAt))
                    .foreign_key(&mut cascade(
                        "fk_clothing_items_user_id",
                        (clothing_item::Entity, clothing_item::Column::UserId),
                        (user::Entity, user::Column::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_clothing_items_category_id",
                        (clothing_item::Entity, clothing_item::Column::CategoryId),
                        (category::Entity, category::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(outfit::Entity)
                    .if_not_exists()
                    .col(id_column(outfit::Column::Id))
                    .col(ColumnDef::new(outfit::Column::UserId).integer().not_null())
                    .col(ColumnDef::new(outfit::Column::Name).string_len(255).not_null())
                    .col(ColumnDef::new(outfit::Column::Description).text().null())
                    .col(ColumnDef::new(outfit::Column::Occasion).string_len(100).null())
                    .col(ColumnDef::new(outfit::Column::Season).string_len(50).null())
                    .col(ColumnDef::new(outfit::Column::ImageUrl).string_len(500).null())
                    .col(timestamp_column(outfit::Column::CreatedAt))
                    .col(timestamp_column(outfit::Column::UpdatedAt))
                    .foreign_key(&mut cascade(
                        "fk_outfits_user_id",
                        (outfit::Entity, outfit::Column::UserId),
                        (user::Entity, user::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(outfit_item::Entity)
                    .if_not_exists()
                    .col(ColumnDef::new(outfit_item::Column::OutfitId).integer().not_null())
                    .col(ColumnDef::new(outfit_item::Column::ClothingItemId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(outfit_item::Column::OutfitId)
                            .col(outfit_item::Column::ClothingItemId),
                    )
                    .foreign_key(&mut cascade(
                        "fk_outfit_items_outfit_id",
                        (outfit_item::Entity, outfit_item::Column::OutfitId),
                        (outfit::Entity, outfit::Column::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_outfit_items_clothing_item_id",
                        (outfit_item::Entity, outfit_item::Column::ClothingItemId),
                        (clothing_item::Entity, clothing_item::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(clothing_item_tag::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(clothing_item_tag::Column::ClothingItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(clothing_item_tag::Column::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(clothing_item_tag::Column::ClothingItemId)
                            .col(clothing_item_tag::Column::TagId),
                    )
                    .foreign_key(&mut cascade(
                        "fk_clothing_item_tag_clothing_item_id",
                        (clothing_item_tag::Entity, clothing_item_tag::Column::ClothingItemId),
                        (clothing_item::Entity, clothing_item::Column::Id),
                    ))
                    .foreign_key(&mut cascade(
                        "fk_clothing_item_tag_tag_id",
                        (clothing_item_tag::Entity, clothing_item_tag::Column::TagId),
                        (tag::Entity, tag::Column::Id),
                    ))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(clothing_item_tag::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(outfit_item::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(outfit::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(clothing_item::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(tag::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(category::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(user::Entity).to_owned())
            .await?;
        Ok(())
    }
}
