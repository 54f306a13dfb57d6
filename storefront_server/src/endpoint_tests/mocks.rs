use mockall::mock;
use storefront_engine::{
    db_types::{
        CartItem,
        CartLine,
        NewCartLine,
        NewOrder,
        NewTrackingEvent,
        Order,
        OrderLineDetail,
        OrderStatus,
        OrderSummary,
        PaymentMethod,
        Product,
        TrackingEntry,
        TrackingEvent,
    },
    traits::{CartManagement, CatalogManagement, OrderManagement, StoreError, TrackingManagement},
    TransitionPolicy,
};

mock! {
    pub Store {}
    impl Clone for Store {
        fn clone(&self) -> Self;
    }
    impl OrderManagement for Store {
        fn url(&self) -> &str;
        async fn place_order(&self, order: NewOrder) -> Result<(Order, bool), StoreError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderSummary>, StoreError>;
        async fn fetch_order_lines(&self, order_id: i64) -> Result<Vec<OrderLineDetail>, StoreError>;
        async fn fetch_orders_for_client(&self, client_id: i64) -> Result<Vec<OrderSummary>, StoreError>;
    }
    impl TrackingManagement for Store {
        async fn append_tracking_event(&self, event: NewTrackingEvent, policy: TransitionPolicy) -> Result<TrackingEvent, StoreError>;
        async fn fetch_tracking(&self, order_id: i64) -> Result<Vec<TrackingEntry>, StoreError>;
    }
    impl CartManagement for Store {
        async fn fetch_cart(&self, client_id: i64) -> Result<Vec<CartItem>, StoreError>;
        async fn add_to_cart(&self, line: NewCartLine, max_quantity: i64) -> Result<CartLine, StoreError>;
        async fn remove_cart_line(&self, line_id: i64) -> Result<Option<CartLine>, StoreError>;
        async fn clear_cart(&self, client_id: i64) -> Result<u64, StoreError>;
    }
    impl CatalogManagement for Store {
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StoreError>;
        async fn fetch_order_statuses(&self) -> Result<Vec<OrderStatus>, StoreError>;
        async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>, StoreError>;
    }
}
