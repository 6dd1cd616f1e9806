//! Product catalog types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::null_default;
use crate::error::{Error, Result};

/// Target audience of a product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Men,
    Women,
    #[default]
    Unisex,
}

impl Gender {
    /// Wire name of the gender
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Men => "MEN",
            Gender::Women => "WOMEN",
            Gender::Unisex => "UNISEX",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MEN" => Ok(Gender::Men),
            "WOMEN" => Ok(Gender::Women),
            "UNISEX" => Ok(Gender::Unisex),
            _ => Err(Error::validation(format!("unknown gender: {}", s))),
        }
    }
}

/// Descriptive attributes of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributes {
    pub fit: String,
    pub sleeve: String,
    pub neck: String,
    pub material: String,
    pub pattern: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ProductAttributes {
    fn default() -> Self {
        Self {
            fit: "REGULAR".to_string(),
            sleeve: "SHORT".to_string(),
            neck: "CREW".to_string(),
            material: "BLEND".to_string(),
            pattern: "SOLID".to_string(),
            extra: Map::new(),
        }
    }
}

/// A purchasable size/color configuration of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub size: String,
    #[serde(default, deserialize_with = "null_default")]
    pub color: String,
    #[serde(default, deserialize_with = "null_default")]
    pub color_code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub sku: String,
    /// Maximum retail price in rupees
    #[serde(default, deserialize_with = "null_default")]
    pub mrp: f64,
    /// Selling price in rupees
    #[serde(default, deserialize_with = "null_default")]
    pub price: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Variant {
    fn default() -> Self {
        Self {
            id: None,
            size: "M".to_string(),
            color: "Black".to_string(),
            color_code: "#000000".to_string(),
            sku: String::new(),
            mrp: 0.0,
            price: 0.0,
            stock: 0,
            images: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A catalog product.
///
/// Fields the console does not know about are kept in `extra` so an edited
/// product is sent back without losing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_default")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_default")]
    pub gender: Gender,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub attributes: ProductAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "null_default")]
    pub variants: Vec<Variant>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Product {
    /// A new-product draft with one default variant
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            slug: String::new(),
            brand: String::new(),
            gender: Gender::default(),
            category: String::new(),
            description: String::new(),
            tags: Vec::new(),
            images: Vec::new(),
            attributes: ProductAttributes::default(),
            is_active: None,
            variants: vec![Variant::default()],
            extra: Map::new(),
        }
    }
}

impl Product {
    /// Check the fields the catalog requires before a create or update.
    ///
    /// Name, slug and category must be non-blank, and every variant needs a
    /// size, color and SKU.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("slug", &self.slug),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("{} is required", field)));
            }
        }

        for (idx, variant) in self.variants.iter().enumerate() {
            let required = [
                ("size", &variant.size),
                ("color", &variant.color),
                ("sku", &variant.sku),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    return Err(Error::validation(format!(
                        "variant {}: {} is required",
                        idx + 1,
                        field
                    )));
                }
            }
        }
        Ok(())
    }

    /// Copy one MRP and price to every variant
    pub fn sync_pricing(&mut self, mrp: f64, price: f64) {
        for variant in &mut self.variants {
            variant.mrp = mrp;
            variant.price = price;
        }
    }

    /// Trim image URLs and drop blank ones, on the product and its variants
    pub fn clean_images(&mut self) {
        clean(&mut self.images);
        for variant in &mut self.variants {
            clean(&mut variant.images);
        }
    }

    /// Stock summed over all variants
    pub fn total_stock(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.stock)).sum()
    }
}

fn clean(urls: &mut Vec<String>) {
    urls.retain(|url| !url.trim().is_empty());
    for url in urls.iter_mut() {
        *url = url.trim().to_string();
    }
}
