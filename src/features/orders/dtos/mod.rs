pub mod order_dto;

pub use order_dto::{
    CreateOrderDto, CreateOrderItemDto, OrderFilterQuery, OrderItemDto, OrderResponseDto,
    OrderSummaryDto, UpdateOrderStatusDto,
};
