use log::trace;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};

use crate::db_types::{Cents, NewOrderLine, OrderLine, OrderLineDetail, ProductSnapshot};

/// Inserts all the lines for an order in one statement. The supplied unit price is stored as the historical price.
pub async fn insert_lines(
    order_id: i64,
    lines: &[NewOrderLine],
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderLine>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO order_lines (order_id, product_id, quantity, historical_price) ");
    builder.push_values(lines, |mut row, line| {
        row.push_bind(order_id).push_bind(line.product_id).push_bind(line.quantity).push_bind(line.price);
    });
    builder.push(" RETURNING *");
    let mut inserted: Vec<OrderLine> = builder.build_query_as::<OrderLine>().fetch_all(conn).await?;
    inserted.sort_by_key(|l| l.id);
    trace!("🗃️ {} lines inserted for order #{order_id}", inserted.len());
    Ok(inserted)
}

#[derive(FromRow)]
struct LineWithProduct {
    #[sqlx(flatten)]
    line: OrderLine,
    product_name: Option<String>,
    product_price: Option<Cents>,
    product_image_url: Option<String>,
}

impl From<LineWithProduct> for OrderLineDetail {
    fn from(row: LineWithProduct) -> Self {
        let product = match (row.product_name, row.product_price) {
            (Some(name), Some(price)) => {
                Some(ProductSnapshot { id: row.line.product_id, name, price, image_url: row.product_image_url })
            },
            _ => None,
        };
        Self { line: row.line, product }
    }
}

/// Fetches the lines of an order, each joined with the live catalog entry for its product.
pub async fn fetch_lines_with_products(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderLineDetail>, sqlx::Error> {
    let rows: Vec<LineWithProduct> = sqlx::query_as(
        r#"
            SELECT
                order_lines.*,
                products.name AS product_name,
                products.price AS product_price,
                products.image_url AS product_image_url
            FROM order_lines LEFT JOIN products ON products.id = order_lines.product_id
            WHERE order_lines.order_id = $1
            ORDER BY order_lines.id
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(OrderLineDetail::from).collect())
}
