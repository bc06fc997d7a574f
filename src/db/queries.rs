use rusqlite::{Connection, types::Value as SqlValue};
use serde_json::Value;

use super::collection::{self, Collection, Document, Filter, document_from_row, from_sql_value};
use crate::error::Result;
use crate::models::{AdminStats, DeleteResult, InsertManyResult, InsertOneResult, User, payment_cart_ids};

// ============ Users ============

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    let doc = collection::find_one(conn, Collection::Users, &Filter::new().eq("email", email))?;
    Ok(doc.as_ref().map(User::from_document))
}

/// Insert a user unless one with the same email exists.
/// Returns None when the email is taken.
pub fn create_user_if_absent(
    conn: &Connection,
    email: &str,
    doc: Document,
) -> Result<Option<InsertOneResult>> {
    if get_user_by_email(conn, email)?.is_some() {
        return Ok(None);
    }

    match collection::insert_one(conn, Collection::Users, doc) {
        Ok(result) => Ok(Some(result)),
        // Lost a race with a concurrent insert for the same email
        Err(_) if get_user_by_email(conn, email)?.is_some() => Ok(None),
        Err(e) => Err(e),
    }
}

// ============ Payments ============

/// Record a payment and clear the cart items it consumed, in one transaction.
pub fn record_payment(
    conn: &mut Connection,
    payment: Document,
) -> Result<(InsertOneResult, DeleteResult)> {
    let cart_ids = payment_cart_ids(&payment);

    let tx = conn.transaction()?;
    let inserted = collection::insert_one(&tx, Collection::Payments, payment)?;
    let deleted = collection::delete_many(&tx, Collection::Carts, &Filter::id_in(cart_ids))?;
    tx.commit()?;

    Ok((inserted, deleted))
}

// ============ Stats ============

pub fn admin_stats(conn: &Connection) -> Result<AdminStats> {
    // TOTAL() is 0.0 over an empty table; non-numeric prices count as 0
    let revenue: f64 = conn.query_row(
        "SELECT TOTAL(CASE WHEN json_type(doc, '$.price') IN ('integer', 'real')
                           THEN json_extract(doc, '$.price') ELSE 0 END)
         FROM payments",
        [],
        |row| row.get(0),
    )?;

    Ok(AdminStats {
        users: collection::count(conn, Collection::Users)?,
        menu_items: collection::count(conn, Collection::Menus)?,
        orders: collection::count(conn, Collection::Payments)?,
        revenue,
    })
}

/// One row per (payment, menu item id): the payment with `menuItemIds` replaced
/// by that single id, and `menuItems` holding the matching menu item (empty
/// if it no longer exists).
pub fn order_stats(conn: &Connection) -> Result<Vec<Document>> {
    // Arrays unwind element by element; any other non-null value is a single element
    let mut stmt = conn.prepare(
        "SELECT p.id, p.doc, item.type, item.value, m.id, m.doc
         FROM payments p, json_each(
             CASE json_type(p.doc, '$.menuItemIds')
                 WHEN 'array' THEN p.doc -> '$.menuItemIds'
                 ELSE json_array(json(p.doc -> '$.menuItemIds'))
             END) AS item
         LEFT JOIN menus m ON m.id = item.value
         WHERE json_type(p.doc, '$.menuItemIds') NOT IN ('null')
         ORDER BY p.rowid, item.key",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, SqlValue>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(payment_id, payment_doc, item_type, item_id, menu_id, menu_doc)| {
            let mut row = document_from_row(payment_id, &payment_doc)?;
            row.insert("menuItemIds".to_string(), json_each_value(&item_type, item_id)?);

            let menu_items = match (menu_id, menu_doc) {
                (Some(id), Some(doc)) => vec![Value::Object(document_from_row(id, &doc)?)],
                _ => Vec::new(),
            };
            row.insert("menuItems".to_string(), Value::Array(menu_items));
            Ok(row)
        })
        .collect()
}

/// Rebuild a `json_each` element. Containers come back as JSON text and
/// booleans as integers, so both are restored from the element type.
fn json_each_value(item_type: &str, value: SqlValue) -> Result<Value> {
    match (item_type, value) {
        ("object" | "array", SqlValue::Text(json)) => Ok(serde_json::from_str(&json)?),
        ("true", _) => Ok(Value::Bool(true)),
        ("false", _) => Ok(Value::Bool(false)),
        (_, value) => Ok(from_sql_value(value)),
    }
}

// ============ Seeding ============

/// Load a JSON array of documents into a collection.
pub fn seed_collection(
    conn: &mut Connection,
    coll: Collection,
    json: &str,
) -> Result<InsertManyResult> {
    let docs: Vec<Document> = serde_json::from_str(json)?;
    collection::insert_many(conn, coll, docs)
}
