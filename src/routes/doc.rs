use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::{CategoryList, CategoryRequest},
        orders::{
            CreateOrderRequest, OrderItemInput, OrderList, OrderWithItems, PaymentInfoInput,
            ShippingInfoInput, UpdateOrderStatusRequest,
        },
    },
    models::{Category, Order, OrderItem, PaymentInfo, PaymentMode, ShippingInfo},
    response::{ApiResponse, Meta},
    routes::{categories, health, orders, params},
    validation::FieldViolation,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
    ),
    components(
        schemas(
            Category,
            CategoryList,
            CategoryRequest,
            Order,
            OrderItem,
            ShippingInfo,
            PaymentInfo,
            PaymentMode,
            CreateOrderRequest,
            ShippingInfoInput,
            OrderItemInput,
            PaymentInfoInput,
            UpdateOrderStatusRequest,
            OrderList,
            OrderWithItems,
            FieldViolation,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Category>,
            ApiResponse<CategoryList>,
            ApiResponse<Order>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Categories", description = "Category management endpoints"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
