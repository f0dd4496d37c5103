/// Generate the five REST handlers and an `OpenApiRouter` for a [`CRUDResource`].
///
/// Invoke inside the resource's module:
///
/// ```rust,ignore
/// crud_handlers!(Tag, TagCreate, TagUpdate);
/// // or, with extra routes sharing the same state:
/// crud_handlers!(ClothingItem, ClothingItemCreate, ClothingItemUpdate,
///     routes!(list_tags_handler, attach_tag_handler));
/// ```
///
/// The generated `router(db)` serves `/` (list, create) and `/{id}` (show,
/// update, delete) and is meant to be nested under `/api/<plural>`.
///
/// [`CRUDResource`]: crate::core::CRUDResource
#[macro_export]
macro_rules! crud_handlers {
    ($resource:ty, $create_model:ty, $update_model:ty $(, $extra_routes:expr)* $(,)?) => {
        #[utoipa::path(
            get,
            path = "/{id}",
            params(("id" = i32, Path, description = "Record ID")),
            responses(
                (status = axum::http::StatusCode::OK, description = "The requested resource", body = $resource),
                (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
                (status = axum::http::StatusCode::NOT_FOUND, description = "Resource not found"),
                (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
            ),
            security(("bearer_auth" = [])),
            operation_id = format!("get_one_{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Get one {}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = format!("Retrieves one {} by its ID, with its relations loaded.\n\n{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR, <$resource as $crate::core::CRUDResource>::RESOURCE_DESCRIPTION)
        )]
        pub async fn get_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::extract::Path(id): axum::extract::Path<i32>,
        ) -> Result<axum::Json<$resource>, $crate::errors::ApiError> {
            <$resource as $crate::core::CRUDResource>::get_one(&db, id)
                .await
                .map(axum::Json)
        }

        #[utoipa::path(
            get,
            path = "/",
            params($crate::filtering::FilterOptions),
            responses(
                (status = axum::http::StatusCode::OK, description = "List of resources", body = [$resource]),
                (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
                (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
            ),
            security(("bearer_auth" = [])),
            operation_id = format!("get_all_{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_PLURAL),
            summary = format!("Get all {}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_PLURAL),
            description = format!(
                "Retrieves all {}.\n\n{}\n\nSortable columns: {}.\n\nFilterable columns: {}.",
                <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_PLURAL,
                <$resource as $crate::core::CRUDResource>::RESOURCE_DESCRIPTION,
                <$resource as $crate::core::CRUDResource>::sortable_columns()
                    .iter()
                    .map(|(name, _)| format!("\n- {name}"))
                    .collect::<String>(),
                <$resource as $crate::core::CRUDResource>::filterable_columns()
                    .iter()
                    .map(|(name, _)| format!("\n- {name}"))
                    .collect::<String>()
            )
        )]
        pub async fn get_all_handler(
            axum::extract::Query(params): axum::extract::Query<$crate::filtering::FilterOptions>,
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
        ) -> Result<(axum::http::HeaderMap, axum::Json<Vec<$resource>>), $crate::errors::ApiError> {
            let condition = $crate::filtering::apply_filters::<$resource>(params.filter.as_deref());
            let order = $crate::filtering::parse_sorting(
                &params,
                &<$resource as $crate::core::CRUDResource>::sortable_columns(),
            )
            .map_or_else(<$resource as $crate::core::CRUDResource>::default_sort, |sort| vec![sort]);
            let page = $crate::filtering::parse_pagination(&params);

            let items = <$resource as $crate::core::CRUDResource>::get_all(&db, &condition, &order, page).await?;
            let total_count = <$resource as $crate::core::CRUDResource>::total_count(&db, &condition).await?;
            let headers = $crate::filtering::calculate_content_range(
                page.map_or(0, |(offset, _)| offset),
                items.len() as u64,
                total_count,
                <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_PLURAL,
            );
            Ok((headers, axum::Json(items)))
        }

        #[utoipa::path(
            post,
            path = "/",
            request_body = $create_model,
            responses(
                (status = axum::http::StatusCode::CREATED, description = "Resource created successfully", body = $resource),
                (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
                (status = axum::http::StatusCode::CONFLICT, description = "Duplicate record"),
                (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed")
            ),
            security(("bearer_auth" = [])),
            operation_id = format!("create_one_{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Create one {}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = format!("Creates a new {}.\n\n{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR, <$resource as $crate::core::CRUDResource>::RESOURCE_DESCRIPTION)
        )]
        pub async fn create_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            $crate::core::Payload(payload): $crate::core::Payload<$create_model>,
        ) -> Result<(axum::http::StatusCode, axum::Json<$resource>), $crate::errors::ApiError> {
            $crate::validation::Validatable::validate(&payload)?;
            let created = <$resource as $crate::core::CRUDResource>::create(&db, payload).await?;
            Ok((axum::http::StatusCode::CREATED, axum::Json(created)))
        }

        #[utoipa::path(
            put,
            path = "/{id}",
            params(("id" = i32, Path, description = "Record ID")),
            request_body = $update_model,
            responses(
                (status = axum::http::StatusCode::OK, description = "Resource updated successfully", body = $resource),
                (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
                (status = axum::http::StatusCode::NOT_FOUND, description = "Resource not found"),
                (status = axum::http::StatusCode::CONFLICT, description = "Duplicate record"),
                (status = axum::http::StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed")
            ),
            security(("bearer_auth" = [])),
            operation_id = format!("update_one_{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Update one {}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = format!("Updates one {} by its ID. Absent fields are left untouched.\n\n{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR, <$resource as $crate::core::CRUDResource>::RESOURCE_DESCRIPTION)
        )]
        pub async fn update_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::extract::Path(id): axum::extract::Path<i32>,
            $crate::core::Payload(payload): $crate::core::Payload<$update_model>,
        ) -> Result<axum::Json<$resource>, $crate::errors::ApiError> {
            $crate::validation::Validatable::validate(&payload)?;
            <$resource as $crate::core::CRUDResource>::update(&db, id, payload)
                .await
                .map(axum::Json)
        }

        #[utoipa::path(
            delete,
            path = "/{id}",
            params(("id" = i32, Path, description = "Record ID")),
            responses(
                (status = axum::http::StatusCode::NO_CONTENT, description = "Resource deleted successfully"),
                (status = axum::http::StatusCode::UNAUTHORIZED, description = "Missing or invalid token"),
                (status = axum::http::StatusCode::NOT_FOUND, description = "Resource not found"),
                (status = axum::http::StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error")
            ),
            security(("bearer_auth" = [])),
            operation_id = format!("delete_one_{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            summary = format!("Delete one {}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR),
            description = format!("Deletes one {} by its ID.\n\n{}", <$resource as $crate::core::CRUDResource>::RESOURCE_NAME_SINGULAR, <$resource as $crate::core::CRUDResource>::RESOURCE_DESCRIPTION)
        )]
        pub async fn delete_one_handler(
            axum::extract::State(db): axum::extract::State<sea_orm::DatabaseConnection>,
            axum::extract::Path(id): axum::extract::Path<i32>,
        ) -> Result<axum::http::StatusCode, $crate::errors::ApiError> {
            <$resource as $crate::core::CRUDResource>::delete(&db, id)
                .await
                .map(|_| axum::http::StatusCode::NO_CONTENT)
        }

        pub fn router(db: &sea_orm::DatabaseConnection) -> utoipa_axum::router::OpenApiRouter {
            utoipa_axum::router::OpenApiRouter::new()
                .routes(utoipa_axum::routes!(get_all_handler, create_one_handler))
                .routes(utoipa_axum::routes!(get_one_handler, update_one_handler, delete_one_handler))
                $(
                    .routes($extra_routes)
                )*
                .with_state(db.clone())
        }
    };
}
