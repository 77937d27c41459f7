pub mod order;

pub use order::{Order, OrderItem, OrderStatus, PaymentStatus};
