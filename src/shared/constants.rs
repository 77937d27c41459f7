/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full back-office access
pub const ROLE_ADMIN: &str = "admin";

/// Moderator role - catalog and order management, no user administration
pub const ROLE_MODERATOR: &str = "moderator";

/// Customer role - default for registered shoppers
pub const ROLE_CUSTOMER: &str = "customer";

// =============================================================================
// ORDER POLICY
// =============================================================================

/// An order may be cancelled by its owner for this long after creation.
pub const ORDER_CANCELLATION_WINDOW_MINUTES: i64 = 30;

// =============================================================================
// CLIENT STATE
// =============================================================================

/// Maximum number of products in a compare list
pub const COMPARE_LIST_CAPACITY: usize = 4;

/// Storage key prefixes for client-state collections. The full key is
/// "<prefix>-guest" or "<prefix>-<user id>".
pub const CART_STORAGE_PREFIX: &str = "cart-storage";
pub const COMPARE_STORAGE_PREFIX: &str = "compare-storage";
pub const WISHLIST_STORAGE_PREFIX: &str = "wishlist-storage";
