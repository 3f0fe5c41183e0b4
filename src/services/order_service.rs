use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, PaymentInfo, ShippingInfo, order_status},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = payload.into_valid().map_err(AppError::Validation)?;

    let txn = state.orm.begin().await?;

    let order_id = Uuid::new_v4();
    let saved = OrderActive {
        id: Set(order_id),
        user_id: Set(order.user),
        address: Set(order.address),
        city: Set(order.city),
        state: Set(order.state),
        pincode: Set(order.pincode),
        phone_no: Set(order.phone_no),
        payment_id: Set(order.payment_id),
        payment_status: Set(order.payment_status),
        payment_mode: Set(order.payment_mode.to_string()),
        items_price: Set(order.items_price),
        tax_price: Set(order.tax_price),
        shipping_price: Set(order.shipping_price),
        total_price: Set(order.total_price),
        order_status: Set(order_status::PROCESSING.to_string()),
        paid_at: Set(order.paid_at.into()),
        delivered_at: Set(None),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(order.items.len());
    for (position, item) in order.items.into_iter().enumerate() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(saved.id),
            product_id: Set(item.product),
            name: Set(item.name),
            price: Set(item.price),
            quantity: Set(item.quantity),
            image: Set(item.image),
            position: Set(position as i32),
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));
    }

    txn.commit().await?;

    tracing::info!(order_id = %saved.id, items = items.len(), "order created");
    audit::record(
        &state.pool,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": saved.id, "user_id": saved.user_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: order_from_entity(saved),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::OrderStatus.eq(status.clone()));
    }
    if let Some(user) = query.user {
        condition = condition.add(OrderCol::UserId.eq(user));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Position)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Applies a fulfillment step. Only `order_status` and `delivered_at` ever
/// change after an order is created.
pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let status = payload.order_status.trim();
    if status.is_empty() {
        return Err(AppError::BadRequest("orderStatus must not be empty".into()));
    }

    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let stamp_delivery = status == order_status::DELIVERED && existing.delivered_at.is_none();
    let mut active: OrderActive = existing.into();
    active.order_status = Set(status.to_string());
    if stamp_delivery {
        active.delivered_at = Set(Some(Utc::now().into()));
    }
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, status = %order.order_status, "order status updated");
    audit::record(
        &state.pool,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.order_status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user: model.user_id,
        shipping_info: ShippingInfo {
            address: model.address,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            phone_no: model.phone_no,
        },
        payment_info: PaymentInfo {
            id: model.payment_id,
            status: model.payment_status,
            mode: model.payment_mode.parse().unwrap_or_default(),
        },
        items_price: model.items_price,
        tax_price: model.tax_price,
        shipping_price: model.shipping_price,
        total_price: model.total_price,
        order_status: model.order_status,
        paid_at: model.paid_at.with_timezone(&Utc),
        delivered_at: model.delivered_at.map(|dt| dt.with_timezone(&Utc)),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        product: model.product_id,
        name: model.name,
        price: model.price,
        quantity: model.quantity,
        image: model.image,
    }
}
