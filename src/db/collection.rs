//! Schemaless document collections stored as JSON in SQLite.
//!
//! Each collection is a table `(id TEXT PRIMARY KEY, doc TEXT NOT NULL)`.
//! The id is exposed on documents as `_id`; every other field lives in the
//! JSON text and is matched with `json_extract`.
//!
//! Filters are exact-match equality. A missing field compares equal to null.

use rusqlite::{Connection, OptionalExtension, params_from_iter, types::Value as SqlValue};
use serde_json::{Map, Value};
use strum::EnumIter;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};

/// A stored document. `_id` is present on everything read back from a collection.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Collection {
    Users,
    Menus,
    Reviews,
    Carts,
    Payments,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Menus => "menus",
            Collection::Reviews => "reviews",
            Collection::Carts => "carts",
            Collection::Payments => "payments",
        }
    }
}

#[derive(Debug, Clone)]
enum Condition {
    Eq(String, Value),
    IdIn(Vec<String>),
}

/// Conjunction of equality conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    /// Match documents whose `_id` is one of `ids`. An empty list matches nothing.
    pub fn id_in(ids: Vec<String>) -> Self {
        Self {
            conditions: vec![Condition::IdIn(ids)],
        }
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Eq(field.to_string(), value.into()));
        self
    }

    /// Build the WHERE clause and its bound values.
    fn to_sql(&self) -> Result<(String, Vec<SqlValue>)> {
        if self.conditions.is_empty() {
            return Ok(("1".to_string(), Vec::new()));
        }

        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut values = Vec::new();
        for condition in &self.conditions {
            match condition {
                Condition::Eq(field, value) if field == ID_FIELD => {
                    clauses.push("id IS ?".to_string());
                    values.push(to_sql_value(value));
                }
                Condition::Eq(field, value) => {
                    clauses.push(format!("json_extract(doc, '{}') IS ?", json_path(field)?));
                    values.push(to_sql_value(value));
                }
                Condition::IdIn(ids) if ids.is_empty() => clauses.push("0".to_string()),
                Condition::IdIn(ids) => {
                    let placeholders = vec!["?"; ids.len()].join(", ");
                    clauses.push(format!("id IN ({})", placeholders));
                    values.extend(ids.iter().cloned().map(SqlValue::Text));
                }
            }
        }
        Ok((clauses.join(" AND "), values))
    }

    /// Equality fields used to seed a document created by an upsert.
    fn equality_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().filter_map(|c| match c {
            Condition::Eq(field, value) => Some((field.as_str(), value)),
            Condition::IdIn(_) => None,
        })
    }
}

/// Field names are interpolated into SQL, so only plain identifiers are accepted.
fn json_path(field: &str) -> Result<String> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(AppError::Internal(format!("invalid filter field: {:?}", field)));
    }
    Ok(format!("$.{}", field))
}

/// Convert a JSON scalar into the value `json_extract` would return for it.
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

/// Convert a value read back from SQLite (e.g. a `json_each` element) into JSON.
pub(crate) fn from_sql_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => Value::from(f),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(_) => Value::Null,
    }
}

/// Rebuild a document from its stored row, restoring `_id`.
pub(crate) fn document_from_row(id: String, doc: &str) -> Result<Document> {
    let mut document = Document::new();
    document.insert(ID_FIELD.to_string(), Value::String(id));
    match serde_json::from_str::<Value>(doc)? {
        Value::Object(fields) => {
            document.extend(fields.into_iter().filter(|(k, _)| k != ID_FIELD));
        }
        other => {
            return Err(AppError::Internal(format!(
                "stored document is not an object: {}",
                other
            )));
        }
    }
    Ok(document)
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Split a document into the id to store it under and the remaining fields.
/// A client-supplied string `_id` is kept; anything else gets a fresh id.
fn take_id(mut doc: Document) -> (String, Document) {
    let id = match doc.remove(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => gen_id(),
    };
    (id, doc)
}

pub fn find_all(conn: &Connection, coll: Collection) -> Result<Vec<Document>> {
    find_many(conn, coll, &Filter::new())
}

pub fn find_many(conn: &Connection, coll: Collection, filter: &Filter) -> Result<Vec<Document>> {
    let (clause, values) = filter.to_sql()?;
    let sql = format!(
        "SELECT id, doc FROM {} WHERE {} ORDER BY rowid",
        coll.table(),
        clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, doc)| document_from_row(id, &doc))
        .collect()
}

pub fn find_one(conn: &Connection, coll: Collection, filter: &Filter) -> Result<Option<Document>> {
    let (clause, values) = filter.to_sql()?;
    let sql = format!(
        "SELECT id, doc FROM {} WHERE {} ORDER BY rowid LIMIT 1",
        coll.table(),
        clause
    );
    let row = conn
        .query_row(&sql, params_from_iter(values), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .optional()?;

    row.map(|(id, doc)| document_from_row(id, &doc)).transpose()
}

pub fn insert_one(conn: &Connection, coll: Collection, doc: Document) -> Result<InsertOneResult> {
    let (id, fields) = take_id(doc);
    let json = serde_json::to_string(&fields)?;
    conn.execute(
        &format!("INSERT INTO {} (id, doc) VALUES (?1, ?2)", coll.table()),
        rusqlite::params![id, json],
    )?;
    Ok(InsertOneResult::inserted(id))
}

/// Insert several documents atomically.
pub fn insert_many(
    conn: &mut Connection,
    coll: Collection,
    docs: Vec<Document>,
) -> Result<InsertManyResult> {
    let tx = conn.transaction()?;
    let mut inserted_ids = Vec::with_capacity(docs.len());
    for doc in docs {
        let result = insert_one(&tx, coll, doc)?;
        if let Some(id) = result.inserted_id {
            inserted_ids.push(id);
        }
    }
    tx.commit()?;
    Ok(InsertManyResult::new(inserted_ids))
}

/// Apply `set` to the first document matching `filter`.
///
/// With `upsert`, a miss inserts a new document made of the filter's equality
/// fields plus `set`; an `_id` in the filter becomes the new document's id.
pub fn update_one(
    conn: &Connection,
    coll: Collection,
    filter: &Filter,
    set: Document,
    upsert: bool,
) -> Result<UpdateResult> {
    match find_one(conn, coll, filter)? {
        Some(existing) => {
            let (id, mut fields) = take_id(existing);
            let before = fields.clone();
            for (key, value) in set {
                if key != ID_FIELD {
                    fields.insert(key, value);
                }
            }
            if fields == before {
                return Ok(UpdateResult::matched(false));
            }
            conn.execute(
                &format!("UPDATE {} SET doc = ?1 WHERE id = ?2", coll.table()),
                rusqlite::params![serde_json::to_string(&fields)?, id],
            )?;
            Ok(UpdateResult::matched(true))
        }
        None if upsert => {
            let mut doc = Document::new();
            for (field, value) in filter.equality_fields() {
                doc.insert(field.to_string(), value.clone());
            }
            for (key, value) in set {
                if key != ID_FIELD {
                    doc.insert(key, value);
                }
            }
            let inserted = insert_one(conn, coll, doc)?;
            Ok(UpdateResult::upserted(inserted.inserted_id))
        }
        None => Ok(UpdateResult::unmatched()),
    }
}

pub fn delete_one(conn: &Connection, coll: Collection, filter: &Filter) -> Result<DeleteResult> {
    let (clause, values) = filter.to_sql()?;
    let table = coll.table();
    let sql = format!(
        "DELETE FROM {table} WHERE id = (SELECT id FROM {table} WHERE {clause} ORDER BY rowid LIMIT 1)"
    );
    let deleted = conn.execute(&sql, params_from_iter(values))?;
    Ok(DeleteResult::new(deleted as u64))
}

pub fn delete_many(conn: &Connection, coll: Collection, filter: &Filter) -> Result<DeleteResult> {
    let (clause, values) = filter.to_sql()?;
    let sql = format!("DELETE FROM {} WHERE {}", coll.table(), clause);
    let deleted = conn.execute(&sql, params_from_iter(values))?;
    Ok(DeleteResult::new(deleted as u64))
}

pub fn count(conn: &Connection, coll: Collection) -> Result<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", coll.table()),
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
