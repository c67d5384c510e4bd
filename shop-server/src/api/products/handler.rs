//! Product API Handlers

use axum::extract::{Multipart, Path, State};
use serde::Serialize;
use shared::models::{Product, ProductCreate, ProductDetails, ProductList, ProductUpdate};

use crate::auth::CurrentAdmin;
use crate::core::ServerState;
use crate::orders::money::is_valid_price;
use crate::utils::validation::{
    MAX_NAME_LEN, MIN_NAME_LEN, validate_optional_url, validate_required_text,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub id: String,
}

/// Text and file fields of the product form
#[derive(Debug, Default)]
struct ProductForm {
    name: Option<String>,
    price: Option<String>,
    quantity: Option<String>,
    image_url: Option<String>,
    /// (file name, bytes)
    image: Option<(String, Vec<u8>)>,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::validation(format!("Invalid multipart request: {}", e))
}

async fn read_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let Some(file_name) = field.file_name().map(str::to_string) else {
                return Err(AppError::validation("No filename provided in image field"));
            };
            let data = field.bytes().await.map_err(multipart_error)?.to_vec();
            if !data.is_empty() {
                form.image = Some((file_name, data));
            }
            continue;
        }

        let slot = match name.as_str() {
            "name" => &mut form.name,
            "price" => &mut form.price,
            "quantity" => &mut form.quantity,
            "imageUrl" => &mut form.image_url,
            // unknown fields are ignored
            _ => continue,
        };
        let text = field.text().await.map_err(multipart_error)?;
        let text = text.trim();
        if !text.is_empty() {
            *slot = Some(text.to_string());
        }
    }

    Ok(form)
}

fn parse_price(raw: &str) -> AppResult<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|p| is_valid_price(*p))
        .ok_or_else(|| AppError::new(ErrorCode::ProductInvalidPrice).with_detail("price", raw))
}

fn parse_quantity(raw: &str) -> AppResult<i64> {
    match raw.parse::<i64>() {
        Ok(q) if q >= 0 => Ok(q),
        _ => Err(AppError::validation("Product quantity must be a whole number of at least 0")
            .with_detail("field", "quantity")),
    }
}

/// Unique index violations on `product.name`
fn name_conflict(err: AppError) -> AppError {
    if err.code == ErrorCode::AlreadyExists {
        AppError::new(ErrorCode::ProductNameExists)
    } else {
        err
    }
}

/// Reject a name held by another product before any upload is stored
async fn ensure_name_free(state: &ServerState, name: &str, own_id: Option<&str>) -> AppResult<()> {
    match state.products().find_by_name(name).await? {
        Some(existing) if Some(existing.id.as_str()) != own_id => {
            Err(AppError::new(ErrorCode::ProductNameExists))
        }
        _ => Ok(()),
    }
}

impl ProductForm {
    /// Store the uploaded file, falling back to the `imageUrl` field
    async fn resolve_image(&mut self, state: &ServerState) -> AppResult<Option<String>> {
        validate_optional_url(&self.image_url, "imageUrl")?;
        match self.image.take() {
            Some((file_name, data)) => Ok(Some(state.images.put(data, &file_name).await?)),
            None => Ok(self.image_url.take()),
        }
    }
}

/// GET /products/all - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<ProductList>> {
    let products = state.products().find_all().await?;
    if products.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::ProductNotFound,
            "No Product Currently available",
        ));
    }

    Ok(ApiResponse::success(ProductList {
        products: products.into_iter().map(Product::from).collect(),
    }))
}

/// GET /products/details/{id} - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProductDetails>> {
    let product = state
        .products()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound).with_detail("productId", id))?;

    Ok(ApiResponse::success(ProductDetails {
        product: product.into(),
    }))
}

/// POST /products/add - 新建商品
pub async fn create(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
    multipart: Multipart,
) -> AppResult<ApiResponse<ProductCreated>> {
    let mut form = read_form(multipart).await?;

    let name = form.name.clone().unwrap_or_default();
    validate_required_text(&name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    let price = parse_price(form.price.as_deref().ok_or_else(|| AppError::required("price"))?)?;
    let quantity = match form.quantity.as_deref() {
        Some(raw) => parse_quantity(raw)?,
        None => 0,
    };
    ensure_name_free(&state, &name, None).await?;
    let image_url = form.resolve_image(&state).await?;

    let product = state
        .products()
        .create(ProductCreate {
            name,
            price,
            quantity,
            image_url,
        })
        .await
        .map_err(|e| name_conflict(e.into()))?;

    tracing::info!(
        product_id = %product.id,
        admin_id = %admin.id,
        quantity,
        "Product created"
    );

    Ok(ApiResponse::success_with_message(
        "New Product Added",
        ProductCreated { id: product.id },
    ))
}

/// PUT /products/update/{id} - 更新商品，未提供的字段保持不变
pub async fn update(
    State(state): State<ServerState>,
    _admin: CurrentAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<ApiResponse<ProductDetails>> {
    let mut form = read_form(multipart).await?;

    if let Some(name) = &form.name {
        validate_required_text(name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    }
    let price = form.price.as_deref().map(parse_price).transpose()?;
    let quantity = form.quantity.as_deref().map(parse_quantity).transpose()?;
    if let Some(name) = &form.name {
        ensure_name_free(&state, name, Some(id.as_str())).await?;
    }
    let image_url = form.resolve_image(&state).await?;

    let product = state
        .ledger
        .update_product(
            &id,
            ProductUpdate {
                name: form.name.take(),
                price,
                quantity,
                image_url,
            },
        )
        .await
        .map_err(|e| name_conflict(e.into()))?;

    Ok(ApiResponse::success_with_message(
        "Product Information Updated",
        ProductDetails {
            product: product.into(),
        },
    ))
}

/// DELETE /products/delete/{id} - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    admin: CurrentAdmin,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.ledger.guard_delete(&id).await?;
    tracing::info!(product_id = %id, admin_id = %admin.id, "Product removed from catalogue");
    Ok(ApiResponse::ok("Product Deleted"))
}
