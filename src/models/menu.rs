use serde::Deserialize;
use serde_json::Value;

use crate::db::Document;

/// Editable menu item fields. Only the fields present are written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMenuItem {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub recipe: Option<String>,
    pub category: Option<String>,
}

impl UpdateMenuItem {
    /// The `$set` document for this update.
    pub fn into_set(self) -> Document {
        let mut set = Document::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                set.insert(key.to_string(), value);
            }
        };
        put("name", self.name.map(Value::from));
        put("image", self.image.map(Value::from));
        put("price", self.price.map(Value::from));
        put("recipe", self.recipe.map(Value::from));
        put("category", self.category.map(Value::from));
        set
    }
}
